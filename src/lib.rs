#![warn(missing_docs)]
//! A streaming hash over GF(256) that commutes with linear erasure codes.
//!
//! Every digest byte is a GF(256)-linear function of the input, so for a systematic
//! Reed-Solomon style code over the same field, encoding the digests of the data shards
//! gives the digests of the parity shards. Parity integrity data can be derived without
//! re-hashing the coded shards.
//!
//! This is not a cryptographic hash. Padding is zero fill only, so a message and the same
//! message followed by zeros up to the next 64-byte boundary have the same digest.
//!
//! The hash state can be marshaled to a fixed 108-byte blob and resumed later.
//!
//! # Example
//! ```
//! use anyhow::Result;
//!
//! fn main() -> Result<()> {
//!   use homohash::homohash;
//!   let mut h = homohash::new();
//!   let bytes_written = h.write("hello world".as_bytes());
//!   println!("Bytes written: {}", bytes_written);
//!
//!   let state = h.marshal();
//!   let resumed = homohash::HomoHash::unmarshal(&state)?;
//!
//!   let output = h.sum(vec![]);
//!   assert_eq!(output, resumed.sum(vec![]));
//!   println!("Result: {}", hex::encode(&output));
//!
//!   Ok(())
//! }
//! ```
/// `accumulator` is the streaming state machine and the `StreamingHash` trait.
pub mod accumulator;
/// `compress` folds 64-byte blocks into the running state.
pub mod compress;
/// `error` lists the ways restoring a hash state can fail.
pub mod error;
/// `gf` is arithmetic in GF(2^8).
pub mod gf;
/// `homohash` is the default homohash context.
pub mod homohash;
/// `homohashcore` adapts homohash to the RustCrypto `digest` traits.
pub mod homohashcore;
/// `state` marshals and restores an accumulator.
pub mod state;

pub use accumulator::{Accumulator, StreamingHash};
pub use error::Error;
