use once_cell::sync::Lazy;

use crate::gf;

/// The size in bytes of the homohash checksum.
pub const DIGEST_SIZE: usize = 32;

/// Block size, in bytes, consumed by one compression.
pub const DIGEST_BLOCK_SIZE: usize = 64;

/// Number of 32-bit words in the running state.
pub const STATE_WORDS: usize = DIGEST_SIZE / 4;

/// PERMUTATION maps an output byte position to the block offset it reads from.
pub const PERMUTATION: [u8; DIGEST_BLOCK_SIZE] = [
    40, 37, 56, 15, 50, 32, 61, 62, 8, 43, 20, 7, 25, 51, 1, 26, //
    38, 21, 13, 45, 57, 23, 6, 16, 17, 31, 35, 42, 55, 9, 59, 36, //
    2, 19, 58, 29, 44, 63, 0, 48, 33, 11, 34, 4, 54, 46, 39, 52, //
    18, 47, 10, 41, 53, 28, 49, 5, 30, 12, 60, 14, 27, 22, 24, 3,
];

/// COEFFICIENTS holds the field element each output byte position is scaled by.
pub const COEFFICIENTS: [u8; DIGEST_BLOCK_SIZE] = [
    96, 213, 79, 9, 42, 123, 77, 11, 93, 116, 105, 29, 79, 67, 24, 71, //
    49, 153, 106, 45, 133, 180, 111, 231, 92, 27, 95, 222, 40, 85, 13, 125, //
    165, 176, 41, 206, 7, 96, 171, 113, 26, 134, 61, 213, 143, 127, 47, 180, //
    14, 152, 149, 204, 17, 177, 116, 195, 77, 248, 255, 72, 127, 213, 55, 129,
];

/// Compressor folds input blocks into the running state.
///
/// Output byte position `i` lives in word `i / 4` at bit offset `8 * (i % 4)`.
pub trait Compressor: Clone {
    /// compress adds the schedule applied to one block into h.
    fn compress(&self, h: &mut [u32; STATE_WORDS], block: &[u8]);
    /// seed overwrites h with the coefficients scaled by the first byte of the stream.
    fn seed(&self, h: &mut [u32; STATE_WORDS], first: u8);
}

/// Schedule evaluates the field multiplications directly.
#[derive(Clone, Copy, Debug, Default)]
pub struct Schedule;

fn check_block(block: &[u8]) {
    if block.len() != DIGEST_BLOCK_SIZE {
        panic!(
            "could not compress block. size is {:?}, expected {:?}",
            block.len(),
            DIGEST_BLOCK_SIZE
        );
    }
}

impl Compressor for Schedule {
    fn compress(&self, h: &mut [u32; STATE_WORDS], block: &[u8]) {
        check_block(block);

        h.iter_mut().enumerate().for_each(|(w, word)| {
            *word ^= (0..4).fold(0u32, |x, k| {
                let i = 4 * w + k;
                x | u32::from(gf::mul(block[PERMUTATION[i] as usize], COEFFICIENTS[i])) << (8 * k)
            });
        });
    }

    fn seed(&self, h: &mut [u32; STATE_WORDS], first: u8) {
        h.iter_mut().enumerate().for_each(|(w, word)| {
            *word = (0..4).fold(0u32, |x, k| {
                x | u32::from(gf::mul(first, COEFFICIENTS[4 * w + k])) << (8 * k)
            });
        });
    }
}

// table[i][b] is coefficient i times b, already shifted into its place in the word.
static LOOKUP_TABLE: Lazy<[[u32; 256]; DIGEST_SIZE]> = Lazy::new(|| {
    let mut table = [[0u32; 256]; DIGEST_SIZE];
    table.iter_mut().enumerate().for_each(|(i, row)| {
        row.iter_mut().enumerate().for_each(|(b, entry)| {
            *entry = u32::from(gf::mul(b as u8, COEFFICIENTS[i])) << (8 * (i % 4));
        });
    });
    table
});

/// LookupTable is the precomputed product of every coefficient with every possible byte.
/// The table is built once per process and shared, so cloning is free.
#[derive(Clone, Copy)]
pub struct LookupTable {
    lookup_table: &'static [[u32; 256]; DIGEST_SIZE],
}

impl Default for LookupTable {
    fn default() -> Self {
        Self {
            lookup_table: &*LOOKUP_TABLE,
        }
    }
}

impl std::fmt::Debug for LookupTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LookupTable").finish_non_exhaustive()
    }
}

impl Compressor for LookupTable {
    fn compress(&self, h: &mut [u32; STATE_WORDS], block: &[u8]) {
        check_block(block);

        h.iter_mut().enumerate().for_each(|(w, word)| {
            *word ^= (4 * w..4 * w + 4).fold(0u32, |x, i| {
                x ^ self.lookup_table[i][block[PERMUTATION[i] as usize] as usize]
            });
        });
    }

    fn seed(&self, h: &mut [u32; STATE_WORDS], first: u8) {
        h.iter_mut().enumerate().for_each(|(w, word)| {
            *word = (4 * w..4 * w + 4).fold(0u32, |x, i| x ^ self.lookup_table[i][first as usize]);
        });
    }
}
