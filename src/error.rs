/// Errors returned when restoring a marshaled hash state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The blob does not start with the `homo` tag.
    #[error("homohash: invalid hash state identifier")]
    InvalidTag,
    /// The blob is tagged correctly but has the wrong size.
    #[error("homohash: invalid hash state size: want {expected} bytes, got {actual}")]
    InvalidLength {
        /// Size of a well-formed blob.
        expected: usize,
        /// Size of the rejected blob.
        actual: usize,
    },
}
