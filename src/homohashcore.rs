use std::fmt;

use digest::{
    block_buffer::Eager,
    core_api::{
        AlgorithmName, Buffer, BufferKindUser, CoreWrapper, FixedOutputCore, UpdateCore,
    },
    crypto_common::{Block, BlockSizeUser},
    typenum::{U32, U64},
    HashMarker, Output, OutputSizeUser, Reset,
};

use byteorder::{BigEndian, ByteOrder};

use crate::compress::{Compressor, LookupTable, STATE_WORDS};

/// HomoHashCore is the lookup table backed core, to be wrapped in a [`CoreWrapper`].
pub type HomoHashCore = HomoCore<LookupTable>;

/// HomoHasher implements [`digest::Digest`] for homohash.
pub type HomoHasher = CoreWrapper<HomoHashCore>;

/// HomoCore is the block level implementation of homohash for the RustCrypto traits.
///
/// Blocks only reach the core once they are complete, so the first byte seed is applied
/// right before the first compression. The state at that point is still zero, which makes
/// this equivalent to seeding on the first write.
#[derive(Clone, Default)]
pub struct HomoCore<C: Compressor> {
    c: C,
    h: [u32; STATE_WORDS],
    len: u64, // number of bytes compressed so far
}

impl<C: Compressor> HomoCore<C> {
    /// new returns an empty core folding blocks with c.
    pub fn new(c: C) -> Self {
        Self {
            c,
            h: [0; STATE_WORDS],
            len: 0,
        }
    }

    fn compress_block(&mut self, data: &[u8]) {
        if self.len == 0 {
            self.c.seed(&mut self.h, data[0]);
        }
        self.len = self.len.wrapping_add(data.len() as u64);
        self.c.compress(&mut self.h, data);
    }
}

impl<C: Compressor> Reset for HomoCore<C> {
    fn reset(&mut self) {
        self.h = [0; STATE_WORDS];
        self.len = 0;
    }
}

impl<C: Compressor> HashMarker for HomoCore<C> {}

impl<C: Compressor> BlockSizeUser for HomoCore<C> {
    type BlockSize = U64;
}

impl<C: Compressor> BufferKindUser for HomoCore<C> {
    type BufferKind = Eager;
}

impl<C: Compressor> OutputSizeUser for HomoCore<C> {
    type OutputSize = U32;
}

impl<C: Compressor> AlgorithmName for HomoCore<C> {
    fn write_alg_name(f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("HomoHash")
    }
}

impl<C: Compressor> fmt::Debug for HomoCore<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("HomoCore { ... }")
    }
}

impl<C: Compressor> FixedOutputCore for HomoCore<C> {
    fn finalize_fixed_core(&mut self, buffer: &mut Buffer<Self>, out: &mut Output<Self>) {
        // Zero padding only; a length suffix would break linearity.
        let pos = buffer.get_pos();
        if pos != 0 {
            let mut block = Block::<Self>::default();
            block[..pos].copy_from_slice(buffer.get_data());
            self.compress_block(&block);
        }

        BigEndian::write_u32_into(&self.h, out.as_mut_slice());
    }
}

impl<C: Compressor> UpdateCore for HomoCore<C> {
    fn update_blocks(&mut self, blocks: &[Block<Self>]) {
        for b in blocks {
            self.compress_block(b)
        }
    }
}
