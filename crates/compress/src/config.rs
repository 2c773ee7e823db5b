//! Construction-time configuration of the compression middleware.
//!
//! A [`CompressConfig`] is produced once by [`CompressConfigBuilder::build`] (or from
//! deserialized [`CompressSettings`]) and is never mutated afterwards, so a single value can
//! be read by every in-flight request without locking.
//!
//! Valid levels:
//! - brotli: `0..=11`
//! - deflate / gzip: `-2..=9`, where `-1` selects the library default and `-2` the fastest
//!   setting
//! - zstd: not configurable, always [`ZSTD_LEVEL`]

use crate::encoding::Encoding;
use crate::error::ConfigError;
use serde::Deserialize;
use std::ops::RangeInclusive;

pub const BROTLI_LEVELS: RangeInclusive<i32> = 0..=11;
pub const FLATE_LEVELS: RangeInclusive<i32> = -2..=9;

pub const DEFAULT_BROTLI_LEVEL: i32 = 6;
pub const DEFAULT_FLATE_LEVEL: i32 = -1;
pub const ZSTD_LEVEL: i32 = zstd::DEFAULT_COMPRESSION_LEVEL;

/// Immutable per-middleware configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressConfig {
    brotli_level: i32,
    deflate_level: i32,
    gzip_level: i32,
    min_size: usize,
}

impl Default for CompressConfig {
    fn default() -> Self {
        Self { brotli_level: DEFAULT_BROTLI_LEVEL, deflate_level: DEFAULT_FLATE_LEVEL, gzip_level: DEFAULT_FLATE_LEVEL, min_size: 0 }
    }
}

impl CompressConfig {
    pub fn builder() -> CompressConfigBuilder {
        CompressConfigBuilder::new()
    }

    /// Returns the level handed to the codec adapter of `encoding`.
    ///
    /// zstd always reports [`ZSTD_LEVEL`] because its level is not configurable.
    pub fn level(&self, encoding: Encoding) -> i32 {
        match encoding {
            Encoding::Br => self.brotli_level,
            Encoding::Deflate => self.deflate_level,
            Encoding::Gzip => self.gzip_level,
            Encoding::Zstd => ZSTD_LEVEL,
        }
    }

    /// Bodies shorter than this are passed through untouched.
    pub fn min_size(&self) -> usize {
        self.min_size
    }

    /// Skips validation, so tests can drive a codec into failing.
    #[cfg(test)]
    pub(crate) fn with_unchecked_brotli_level(mut self, level: i32) -> Self {
        self.brotli_level = level;
        self
    }

    fn validate(self) -> Result<Self, ConfigError> {
        check_level(Encoding::Br, self.brotli_level, &BROTLI_LEVELS)?;
        check_level(Encoding::Deflate, self.deflate_level, &FLATE_LEVELS)?;
        check_level(Encoding::Gzip, self.gzip_level, &FLATE_LEVELS)?;
        Ok(self)
    }
}

fn check_level(encoding: Encoding, level: i32, range: &RangeInclusive<i32>) -> Result<(), ConfigError> {
    if range.contains(&level) {
        Ok(())
    } else {
        Err(ConfigError::invalid_level(encoding, level, *range.start(), *range.end()))
    }
}

/// Collects configuration options on top of [`CompressConfig::default`].
///
/// Each setter touches exactly one field; nothing is checked until [`build`](Self::build).
#[derive(Debug, Clone, Default)]
pub struct CompressConfigBuilder {
    config: CompressConfig,
}

impl CompressConfigBuilder {
    fn new() -> Self {
        Self { config: CompressConfig::default() }
    }

    pub fn brotli_level(mut self, level: i32) -> Self {
        self.config.brotli_level = level;
        self
    }

    pub fn deflate_level(mut self, level: i32) -> Self {
        self.config.deflate_level = level;
        self
    }

    pub fn gzip_level(mut self, level: i32) -> Self {
        self.config.gzip_level = level;
        self
    }

    pub fn min_size(mut self, min_size: usize) -> Self {
        self.config.min_size = min_size;
        self
    }

    /// Validates every level, failing on the first one out of range.
    pub fn build(self) -> Result<CompressConfig, ConfigError> {
        self.config.validate()
    }
}

/// Deserializable form of the options, e.g. a `[compress]` table in an application's
/// config file. Missing fields keep their defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompressSettings {
    pub brotli_level: Option<i32>,
    pub deflate_level: Option<i32>,
    pub gzip_level: Option<i32>,
    pub min_size: Option<usize>,
}

impl TryFrom<CompressSettings> for CompressConfig {
    type Error = ConfigError;

    fn try_from(settings: CompressSettings) -> Result<Self, Self::Error> {
        let mut builder = CompressConfig::builder();
        if let Some(level) = settings.brotli_level {
            builder = builder.brotli_level(level);
        }
        if let Some(level) = settings.deflate_level {
            builder = builder.deflate_level(level);
        }
        if let Some(level) = settings.gzip_level {
            builder = builder.gzip_level(level);
        }
        if let Some(min_size) = settings.min_size {
            builder = builder.min_size(min_size);
        }
        builder.build()
    }
}
