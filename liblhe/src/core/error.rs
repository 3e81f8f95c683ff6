//! error types for the lhe codec

use thiserror::Error;

/// result type for lhe stuff
pub type LheResult<T> = Result<T, LheError>;

/// Everything that can abort an encode or decode pass.
///
/// The pure transforms (quantizer, reconstructor, symbol codec) never fail on
/// valid configuration; errors come from configuration checks and from the
/// collaborators around them (container, entropy coder, audio I/O).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LheError {
    /// Rejected before any sample is processed
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Truncated or inconsistent .lhe container
    #[error("container format error: {0}")]
    ContainerFormat(String),

    /// Huffman table or bitstream could not be decoded
    #[error("entropy codec error: {0}")]
    EntropyCodec(String),

    /// Byte outside the priority/meta-symbol alphabet
    #[error("invalid symbol {symbol:#04x} at position {position}")]
    InvalidSymbol { symbol: u8, position: usize },

    /// Audio file could not be read or written
    #[error("audio I/O error: {0}")]
    AudioIo(String),
}

impl LheError {
    pub fn config(msg: impl Into<String>) -> Self {
        LheError::Config(msg.into())
    }

    pub fn container(msg: impl Into<String>) -> Self {
        LheError::ContainerFormat(msg.into())
    }

    pub fn entropy(msg: impl Into<String>) -> Self {
        LheError::EntropyCodec(msg.into())
    }

    pub fn audio_io(msg: impl Into<String>) -> Self {
        LheError::AudioIo(msg.into())
    }
}
