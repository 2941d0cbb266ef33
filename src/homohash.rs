use crate::accumulator::Accumulator;
use crate::compress::LookupTable;

pub use crate::compress::{DIGEST_BLOCK_SIZE, DIGEST_SIZE};

/// HomoHash is the accumulator backed by the shared lookup table.
pub type HomoHash = Accumulator<LookupTable>;

/// new creates an empty homohash context.
pub fn new() -> HomoHash {
    Accumulator::new(LookupTable::default())
}
