use crate::encoding::Encoding;
use std::io;
use thiserror::Error;

/// Raised while building a [`CompressConfig`](crate::CompressConfig), never per request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {encoding} compression level: {level}, expected a value in [{min}, {max}]")]
    InvalidLevel { encoding: Encoding, level: i32, min: i32, max: i32 },
}

impl ConfigError {
    pub fn invalid_level(encoding: Encoding, level: i32, min: i32, max: i32) -> Self {
        Self::InvalidLevel { encoding, level, min, max }
    }
}

/// Returned when parsing a string that is not one of the four canonical tokens.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown content encoding: {0}")]
pub struct UnknownEncoding(pub String);

/// Raised by a codec adapter when the encoder could not be created, written or finished.
///
/// The middleware recovers from it locally by keeping the original response.
#[derive(Error, Debug)]
pub enum CompressionError {
    #[error("{encoding} encoder io error: {source}")]
    Io {
        encoding: Encoding,
        #[source]
        source: io::Error,
    },
}

impl CompressionError {
    pub fn io<E: Into<io::Error>>(encoding: Encoding, e: E) -> Self {
        Self::Io { encoding, source: e.into() }
    }

    pub fn encoding(&self) -> Encoding {
        match self {
            Self::Io { encoding, .. } => *encoding,
        }
    }
}
