use crate::accumulator::Accumulator;
use crate::compress::{Compressor, DIGEST_BLOCK_SIZE, STATE_WORDS};
use crate::error::Error;
use byteorder::{BigEndian, ByteOrder};

/// Tag every marshaled state starts with.
pub const MAGIC: &[u8; 4] = b"homo";

/// Size of a marshaled state: tag, state words, block buffer and byte counter.
pub const MARSHALED_SIZE: usize = MAGIC.len() + STATE_WORDS * 4 + DIGEST_BLOCK_SIZE + 8;

const STATE_OFFSET: usize = MAGIC.len();
const BUFFER_OFFSET: usize = STATE_OFFSET + STATE_WORDS * 4;
const LEN_OFFSET: usize = BUFFER_OFFSET + DIGEST_BLOCK_SIZE;

impl<C: Compressor> Accumulator<C> {
    /// marshal snapshots the accumulator so it can be resumed later with [`Accumulator::restore`].
    /// Unused buffer bytes are written as zeros, so equal states marshal to equal blobs.
    pub fn marshal(&self) -> [u8; MARSHALED_SIZE] {
        let mut b = [0u8; MARSHALED_SIZE];
        b[..STATE_OFFSET].copy_from_slice(MAGIC);
        BigEndian::write_u32_into(&self.h, &mut b[STATE_OFFSET..BUFFER_OFFSET]);
        b[BUFFER_OFFSET..BUFFER_OFFSET + self.nx].copy_from_slice(&self.x[..self.nx]);
        BigEndian::write_u64(&mut b[LEN_OFFSET..], self.len);
        b
    }

    /// restore overwrites the accumulator with a state produced by [`Accumulator::marshal`].
    ///
    /// The buffer fill is derived from the byte counter and is not checked against the
    /// buffer contents. On error the accumulator is left untouched.
    pub fn restore(&mut self, b: &[u8]) -> Result<(), Error> {
        if b.len() < MAGIC.len() || &b[..MAGIC.len()] != MAGIC {
            tracing::debug!(len = b.len(), "rejecting hash state with unknown identifier");
            return Err(Error::InvalidTag);
        }
        if b.len() != MARSHALED_SIZE {
            tracing::debug!(len = b.len(), "rejecting hash state with bad size");
            return Err(Error::InvalidLength {
                expected: MARSHALED_SIZE,
                actual: b.len(),
            });
        }

        BigEndian::read_u32_into(&b[STATE_OFFSET..BUFFER_OFFSET], &mut self.h);
        self.x.copy_from_slice(&b[BUFFER_OFFSET..LEN_OFFSET]);
        self.len = BigEndian::read_u64(&b[LEN_OFFSET..]);
        self.nx = (self.len % DIGEST_BLOCK_SIZE as u64) as usize;

        tracing::trace!(written = self.len, buffered = self.nx, "restored homohash state");
        Ok(())
    }
}

impl<C: Compressor + Default> Accumulator<C> {
    /// unmarshal builds a new accumulator from a marshaled state.
    pub fn unmarshal(b: &[u8]) -> Result<Self, Error> {
        let mut d = Self::default();
        d.restore(b)?;
        Ok(d)
    }
}

#[cfg(test)]
pub mod test {
    use super::*;
    use crate::compress::{LookupTable, Schedule};
    use anyhow::Result;
    use proptest::prelude::*;

    type Homo = Accumulator<LookupTable>;

    #[test]
    fn layout() {
        assert_eq!(MARSHALED_SIZE, 108);

        let mut h = Homo::default();
        h.write(b"hello world");
        let expected = "686f6d6f0f7d3a9edfad8f367c91ed631aa9a77d3329ff27a5fcccebe5b3110be2b204e6\
                        68656c6c6f20776f726c64000000000000000000000000000000000000000000\
                        0000000000000000000000000000000000000000000000000000000000000000\
                        000000000000000b";
        assert_eq!(hex::encode(h.marshal()), expected);
    }

    #[test]
    fn fresh_state() {
        let b = Homo::default().marshal();
        assert_eq!(&b[..4], b"homo");
        assert!(b[4..].iter().all(|&v| v == 0));
    }

    #[test]
    fn round_trip() -> Result<()> {
        for n in [0, 1, 63, 64, 65, 200] {
            let msg: Vec<u8> = (0..n + 50).map(|i| (i * 7 + 3) as u8).collect();

            let mut h = Homo::default();
            h.write(&msg[..n]);
            let state = h.marshal();

            let mut resumed = Homo::unmarshal(&state)?;
            assert_eq!(resumed.marshal(), state);
            assert_eq!(resumed.nx, n % 64);
            assert_eq!(resumed.checksum(), h.checksum());

            h.write(&msg[n..]);
            resumed.write(&msg[n..]);
            assert_eq!(resumed.checksum(), h.checksum(), "diverged after resuming at {}", n);
        }
        Ok(())
    }

    #[test]
    fn restore_across_compressors() -> Result<()> {
        let mut h = Accumulator::new(Schedule);
        h.write(b"The quick brown fox jumps over the lazy dog");

        let mut other = Homo::default();
        other.write(b"something else entirely");
        other.restore(&h.marshal())?;

        assert_eq!(other.checksum(), h.checksum());
        Ok(())
    }

    #[test]
    fn invalid_tag() {
        let mut state = Homo::default().marshal();
        state[0] = b'H';
        assert_eq!(Homo::unmarshal(&state).unwrap_err(), Error::InvalidTag);
        assert_eq!(Homo::unmarshal(b"ho").unwrap_err(), Error::InvalidTag);
        assert_eq!(Homo::unmarshal(&[]).unwrap_err(), Error::InvalidTag);
    }

    #[test]
    fn invalid_length() {
        let state = Homo::default().marshal();

        assert_eq!(
            Homo::unmarshal(&state[..107]).unwrap_err(),
            Error::InvalidLength {
                expected: 108,
                actual: 107
            }
        );

        let mut long = state.to_vec();
        long.push(0);
        assert_eq!(
            Homo::unmarshal(&long).unwrap_err(),
            Error::InvalidLength {
                expected: 108,
                actual: 109
            }
        );
    }

    #[test]
    fn failed_restore_keeps_state() {
        let mut h = Homo::default();
        h.write(b"keep me");
        let before = h.marshal();
        assert!(h.restore(b"nope").is_err());
        assert!(h.restore(&before[..100]).is_err());
        assert_eq!(h.marshal(), before);
    }

    #[test]
    fn fill_comes_from_counter() -> Result<()> {
        let mut h = Homo::default();
        h.write(&[1; 10]);
        let mut state = h.marshal();
        // claim 3 buffered bytes instead of 10
        state[LEN_OFFSET..].copy_from_slice(&3u64.to_be_bytes());

        let resumed = Homo::unmarshal(&state)?;
        assert_eq!(resumed.nx, 3);
        assert_eq!(resumed.len, 3);
        Ok(())
    }

    #[test]
    fn counter_wraps_after_restore() -> Result<()> {
        let mut h = Homo::default();
        h.write(&[7; 10]);
        let mut state = h.marshal();
        state[LEN_OFFSET..].copy_from_slice(&u64::MAX.to_be_bytes());

        let mut resumed = Homo::unmarshal(&state)?;
        assert_eq!(resumed.nx, 63);
        assert_eq!(resumed.write(&[1, 2]), 2);
        assert_eq!(resumed.len, 1);
        assert_eq!(resumed.nx, 1);
        assert_eq!(resumed.checksum().len(), 32);
        Ok(())
    }

    proptest! {
        #[test]
        fn resume_anywhere(
            data in prop::collection::vec(any::<u8>(), 0..400),
            at in any::<prop::sample::Index>(),
        ) {
            let at = at.index(data.len() + 1);

            let mut h = Homo::default();
            h.write(&data[..at]);
            let mut resumed = Homo::unmarshal(&h.marshal()).unwrap();
            resumed.write(&data[at..]);

            let mut whole = Homo::default();
            whole.write(&data);

            prop_assert_eq!(resumed.checksum(), whole.checksum());
        }
    }
}
