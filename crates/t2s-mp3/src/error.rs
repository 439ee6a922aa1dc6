//! Error types for t2s-mp3

/// Reasons a byte sequence is not a usable MPEG audio frame header
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Mp3Error {
    /// The 11-bit frame sync pattern is missing
    #[error("No frame sync")]
    NoSync,

    /// Version bits use the reserved value
    #[error("Reserved MPEG version")]
    ReservedVersion,

    /// Layer bits use the reserved value
    #[error("Reserved MPEG layer")]
    ReservedLayer,

    /// Free-format or invalid bitrate index
    #[error("Unsupported bitrate index: {0}")]
    UnsupportedBitrate(u8),

    /// Sample rate bits use the reserved value
    #[error("Reserved sample rate index")]
    ReservedSampleRate,

    /// Fewer bytes available than the structure requires
    #[error("Truncated data: need {needed} bytes, have {available}")]
    Truncated {
        /// Bytes required
        needed: usize,
        /// Bytes available
        available: usize,
    },
}
