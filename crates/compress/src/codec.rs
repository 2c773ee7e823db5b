//! Per-algorithm codec adapters.
//!
//! Every call to [`Codec::compress`] builds its own encoder over its own [`Writer`], so no
//! compression state is ever shared between requests.

use crate::encoding::Encoding;
use crate::error::CompressionError;
use bytes::{Bytes, BytesMut};
use flate2::Compression;
use flate2::write::{GzEncoder, ZlibEncoder};
use std::io;
use std::io::Write;
use tracing::trace;
use zstd::stream::write::Encoder as ZstdEncoder;

const BROTLI_BUFFER_SIZE: usize = 32 * 1024;
const BROTLI_LGWIN: u32 = 22;

// inspired by actix-http, infallible: writes only grow the buffer
pub(crate) struct Writer {
    buf: BytesMut,
}

impl Writer {
    fn with_capacity(capacity: usize) -> Self {
        Self { buf: BytesMut::with_capacity(capacity) }
    }

    fn freeze(self) -> Bytes {
        self.buf.freeze()
    }
}

impl io::Write for Writer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// A codec adapter, one variant per [`Encoding`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Codec {
    Br,
    /// DEFLATE in the zlib container (RFC 1950), not a raw DEFLATE stream.
    Deflate,
    Gzip,
    Zstd,
}

impl From<Encoding> for Codec {
    fn from(encoding: Encoding) -> Self {
        match encoding {
            Encoding::Br => Codec::Br,
            Encoding::Deflate => Codec::Deflate,
            Encoding::Gzip => Codec::Gzip,
            Encoding::Zstd => Codec::Zstd,
        }
    }
}

impl Codec {
    pub fn encoding(&self) -> Encoding {
        match self {
            Codec::Br => Encoding::Br,
            Codec::Deflate => Encoding::Deflate,
            Codec::Gzip => Encoding::Gzip,
            Codec::Zstd => Encoding::Zstd,
        }
    }

    /// Compresses `data` into a complete, finished stream.
    ///
    /// `level` must already be valid for this codec, see [`CompressConfig`](crate::CompressConfig).
    /// The zstd adapter ignores it and always uses [`ZSTD_LEVEL`](crate::config::ZSTD_LEVEL).
    pub fn compress(&self, data: &[u8], level: i32) -> Result<Bytes, CompressionError> {
        // compressed output is rarely larger than the input, the header overhead aside
        let writer = Writer::with_capacity(data.len() / 2 + 64);

        let result = match self {
            Codec::Br => brotli(writer, data, level),
            Codec::Deflate => deflate(writer, data, level),
            Codec::Gzip => gzip(writer, data, level),
            Codec::Zstd => zstd(writer, data),
        };

        result.map(Writer::freeze).map_err(|e| {
            trace!("Error encoding {} encoding: {}", self.encoding(), e);
            CompressionError::io(self.encoding(), e)
        })
    }
}

fn flate_level(level: i32) -> Compression {
    match level {
        -2 => Compression::fast(),
        // 0..=9 has been validated by the config
        0..=9 => Compression::new(level.unsigned_abs()),
        _ => Compression::default(),
    }
}

fn brotli(writer: Writer, data: &[u8], level: i32) -> io::Result<Writer> {
    let quality = u32::try_from(level).map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    let mut encoder = brotli::CompressorWriter::new(writer, BROTLI_BUFFER_SIZE, quality, BROTLI_LGWIN);
    encoder.write_all(data)?;
    encoder.flush()?;
    // `into_inner` emits the final meta-block and discards any error of that last write,
    // which is fine as long as `Writer` never fails
    Ok(encoder.into_inner())
}

fn deflate(writer: Writer, data: &[u8], level: i32) -> io::Result<Writer> {
    let mut encoder = ZlibEncoder::new(writer, flate_level(level));
    encoder.write_all(data)?;
    encoder.finish()
}

fn gzip(writer: Writer, data: &[u8], level: i32) -> io::Result<Writer> {
    let mut encoder = GzEncoder::new(writer, flate_level(level));
    encoder.write_all(data)?;
    encoder.finish()
}

fn zstd(writer: Writer, data: &[u8]) -> io::Result<Writer> {
    let mut encoder = ZstdEncoder::new(writer, crate::config::ZSTD_LEVEL)?;
    encoder.write_all(data)?;
    encoder.finish()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::config::{BROTLI_LEVELS, FLATE_LEVELS, ZSTD_LEVEL};
    use flate2::read::{GzDecoder, ZlibDecoder};
    use proptest::prelude::*;
    use std::io::Read;

    /// Decodes `data` with the reference decoder of `encoding`.
    pub(crate) fn decompress(encoding: Encoding, data: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        match encoding {
            Encoding::Br => {
                brotli::Decompressor::new(data, 4096).read_to_end(&mut out).unwrap();
            }
            Encoding::Deflate => {
                ZlibDecoder::new(data).read_to_end(&mut out).unwrap();
            }
            Encoding::Gzip => {
                GzDecoder::new(data).read_to_end(&mut out).unwrap();
            }
            Encoding::Zstd => out = zstd::decode_all(data).unwrap(),
        }
        out
    }

    fn levels(codec: Codec) -> Vec<i32> {
        match codec {
            Codec::Br => BROTLI_LEVELS.collect(),
            Codec::Deflate | Codec::Gzip => FLATE_LEVELS.collect(),
            Codec::Zstd => vec![ZSTD_LEVEL],
        }
    }

    #[test]
    fn codec_matches_encoding() {
        for encoding in Encoding::PRIORITY {
            assert_eq!(Codec::from(encoding).encoding(), encoding);
        }
    }

    #[test]
    fn hello_world_every_level() {
        for encoding in Encoding::PRIORITY {
            let codec = Codec::from(encoding);
            for level in levels(codec) {
                let compressed = codec.compress(b"hello world", level).unwrap();
                assert_eq!(decompress(encoding, &compressed), b"hello world", "{encoding} level {level}");
            }
        }
    }

    #[test]
    fn empty_input_is_a_valid_stream() {
        for encoding in Encoding::PRIORITY {
            let compressed = Codec::from(encoding).compress(b"", 6).unwrap();
            assert!(!compressed.is_empty(), "{encoding} should still emit framing");
            assert!(decompress(encoding, &compressed).is_empty());
        }
    }

    #[test]
    fn gzip_header_and_trailer() {
        let compressed = Codec::Gzip.compress(b"hello world", 6).unwrap();
        assert_eq!(&compressed[..2], &[0x1f, 0x8b]);
        // ISIZE trailer holds the uncompressed length
        assert_eq!(&compressed[compressed.len() - 4..], &11u32.to_le_bytes());
    }

    #[test]
    fn zstd_ignores_level() {
        let a = Codec::Zstd.compress(b"hello hello hello world", 1).unwrap();
        let b = Codec::Zstd.compress(b"hello hello hello world", 19).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn compressible_payload_shrinks() {
        let data = "micro-compress ".repeat(1024);
        for encoding in Encoding::PRIORITY {
            let compressed = Codec::from(encoding).compress(data.as_bytes(), 6).unwrap();
            assert!(compressed.len() < data.len() / 10, "{encoding}: {}", compressed.len());
        }
    }

    #[test]
    fn invalid_brotli_quality_is_an_error() {
        let err = Codec::Br.compress(b"hello world", -1).unwrap_err();
        assert_eq!(err.encoding(), Encoding::Br);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn round_trip(data in proptest::collection::vec(any::<u8>(), 0..4096), index in 0usize..4, pick in any::<prop::sample::Index>()) {
            let encoding = Encoding::PRIORITY[index];
            let codec = Codec::from(encoding);
            let levels = levels(codec);
            let level = levels[pick.index(levels.len())];

            let compressed = codec.compress(&data, level).unwrap();
            prop_assert_eq!(decompress(encoding, &compressed), data);
        }
    }
}
