use crate::compress::{self, DIGEST_BLOCK_SIZE, DIGEST_SIZE, STATE_WORDS};
use byteorder::{BigEndian, ByteOrder};
use std::{fmt, io};

/// StreamingHash accepts bytes incrementally and produces a fixed-size digest.
pub trait StreamingHash {
    /// write absorbs p and returns how many bytes were consumed, which is always p.len().
    fn write(&mut self, p: &[u8]) -> usize;
    /// sum appends the digest of everything written so far to prefix.
    /// It does not change the underlying state.
    fn sum(&self, prefix: Vec<u8>) -> Vec<u8>;
    /// reset returns the hash to its initial state.
    fn reset(&mut self);
    /// size is the number of bytes sum appends.
    fn size(&self) -> usize;
    /// block_size is the number of bytes consumed per compression.
    fn block_size(&self) -> usize;
}

/// Accumulator is the streaming homohash state.
///
/// It is not internally synchronized: shared use needs external locking, though the
/// usual pattern is one instance per stream.
#[derive(Clone)]
pub struct Accumulator<C: compress::Compressor> {
    pub(crate) c: C,
    pub(crate) h: [u32; STATE_WORDS], // running state, zero until the first write
    pub(crate) x: [u8; DIGEST_BLOCK_SIZE], // data written since last compression
    pub(crate) nx: usize, // number of valid bytes in x
    pub(crate) len: u64, // total number of input bytes written overall
}

impl<C: compress::Compressor> Accumulator<C> {
    /// new returns an empty accumulator folding blocks with c.
    pub fn new(c: C) -> Self {
        Accumulator {
            c,
            h: [0; STATE_WORDS],
            x: [0; DIGEST_BLOCK_SIZE],
            nx: 0,
            len: 0,
        }
    }

    /// reset restores the state of a freshly created accumulator.
    pub fn reset(&mut self) {
        tracing::trace!(written = self.len, "resetting homohash");
        self.h = [0; STATE_WORDS];
        self.x = [0; DIGEST_BLOCK_SIZE];
        self.nx = 0;
        self.len = 0;
    }

    /// size is the digest size in bytes.
    pub fn size(&self) -> usize {
        DIGEST_SIZE
    }

    /// block_size is the compression block size in bytes.
    pub fn block_size(&self) -> usize {
        DIGEST_BLOCK_SIZE
    }

    /// write absorbs p. It never fails and always consumes all of p.
    pub fn write(&mut self, mut p: &[u8]) -> usize {
        let nn = p.len();

        if self.len == 0 {
            if let Some(&first) = p.first() {
                self.c.seed(&mut self.h, first);
            }
        }

        self.len = self.len.wrapping_add(nn as u64);
        if self.nx > 0 {
            // continue with existing buffer, if nonempty
            let n = (DIGEST_BLOCK_SIZE - self.nx).min(p.len());
            self.x[self.nx..self.nx + n].copy_from_slice(&p[..n]);
            self.nx += n;
            if self.nx == DIGEST_BLOCK_SIZE {
                self.c.compress(&mut self.h, &self.x);
                self.nx = 0;
            }
            p = &p[n..];
        }

        // handle any remaining full input blocks
        let mut blocks = p.chunks_exact(DIGEST_BLOCK_SIZE);
        for block in &mut blocks {
            self.c.compress(&mut self.h, block);
        }

        let rest = blocks.remainder();
        if !rest.is_empty() {
            self.x[..rest.len()].copy_from_slice(rest);
            self.nx = rest.len();
        }

        nn
    }

    /// sum appends the current digest to prefix. The accumulator can keep being written to.
    pub fn sum(&self, mut prefix: Vec<u8>) -> Vec<u8> {
        prefix.extend_from_slice(&self.checksum());
        prefix
    }

    /// checksum returns the current digest as an array.
    pub fn checksum(&self) -> [u8; DIGEST_SIZE] {
        // Make a copy so that the caller can keep writing and summing.
        let mut d0 = self.clone();
        d0.finish()
    }

    fn finish(&mut self) -> [u8; DIGEST_SIZE] {
        // Padding. Zeros up to the next block boundary, no length suffix.
        let rem = (self.len % DIGEST_BLOCK_SIZE as u64) as usize;
        if rem != 0 {
            let tmp = [0u8; DIGEST_BLOCK_SIZE];
            self.write(&tmp[..DIGEST_BLOCK_SIZE - rem]);
        }
        debug_assert_eq!(self.nx, 0, "buffer must be empty after padding");

        let mut out = [0u8; DIGEST_SIZE];
        BigEndian::write_u32_into(&self.h, &mut out);
        out
    }
}

impl<C: compress::Compressor + Default> Default for Accumulator<C> {
    fn default() -> Self {
        Self::new(C::default())
    }
}

impl<C: compress::Compressor> fmt::Debug for Accumulator<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Accumulator")
            .field("h", &self.h)
            .field("nx", &self.nx)
            .field("len", &self.len)
            .finish_non_exhaustive()
    }
}

impl<C: compress::Compressor> StreamingHash for Accumulator<C> {
    fn write(&mut self, p: &[u8]) -> usize {
        Accumulator::write(self, p)
    }

    fn sum(&self, prefix: Vec<u8>) -> Vec<u8> {
        Accumulator::sum(self, prefix)
    }

    fn reset(&mut self) {
        Accumulator::reset(self)
    }

    fn size(&self) -> usize {
        DIGEST_SIZE
    }

    fn block_size(&self) -> usize {
        DIGEST_BLOCK_SIZE
    }
}

impl<C: compress::Compressor> io::Write for Accumulator<C> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(Accumulator::write(self, buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
