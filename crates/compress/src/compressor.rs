//! The post-processing step that compresses a finished response.

use crate::codec::Codec;
use crate::config::CompressConfig;
use crate::encoding::{Encoding, EncodingSelector, PrioritySelector};
use crate::error::CompressionError;
use bytes::Bytes;
use http::header::{ACCEPT_ENCODING, CONTENT_ENCODING};
use http::{HeaderMap, Response, StatusCode};
use tracing::{debug, trace, warn};

/// Compresses response bodies according to the request's `Accept-Encoding`.
///
/// Holds only the immutable [`CompressConfig`] and a selector, so one instance can serve
/// any number of concurrent requests.
#[derive(Debug, Clone)]
pub struct Compressor<S = PrioritySelector> {
    config: CompressConfig,
    selector: S,
}

impl Compressor<PrioritySelector> {
    pub fn new(config: CompressConfig) -> Self {
        Self { config, selector: PrioritySelector }
    }
}

impl Default for Compressor<PrioritySelector> {
    fn default() -> Self {
        Self::new(CompressConfig::default())
    }
}

impl<S: EncodingSelector> Compressor<S> {
    /// Replaces the encoding selector, keeping the configuration.
    pub fn with_selector<T: EncodingSelector>(self, selector: T) -> Compressor<T> {
        Compressor { config: self.config, selector }
    }

    pub fn config(&self) -> &CompressConfig {
        &self.config
    }

    /// Compresses the body of `resp` in place, when the client accepts one of our encodings.
    ///
    /// Only the body and the `Content-Encoding` header are ever modified, and only when
    /// compression succeeded. Failures are logged and leave `resp` as it was.
    pub fn compress_response(&self, req_headers: &HeaderMap, resp: &mut Response<Bytes>) {
        let Some(encoding) = self.select(req_headers, resp) else {
            return;
        };

        let level = self.config.level(encoding);
        let result = Codec::from(encoding).compress(resp.body(), level);
        apply(resp, encoding, result);
    }

    fn select(&self, req_headers: &HeaderMap, resp: &Response<Bytes>) -> Option<Encoding> {
        let status_code = resp.status();
        if status_code == StatusCode::NO_CONTENT || status_code == StatusCode::SWITCHING_PROTOCOLS {
            return None;
        }

        // response has already encoded
        if resp.headers().contains_key(CONTENT_ENCODING) {
            trace!("response already has content-encoding, skip compress");
            return None;
        }

        let accept_encodings = accept_encodings(req_headers)?;

        let encoding = self.selector.select(&accept_encodings);
        if encoding.is_none() {
            trace!(accept_encodings = %accept_encodings, "no supported encoding accepted");
            return None;
        }

        let body_len = resp.body().len();
        if body_len < self.config.min_size() {
            trace!(body_len, min_size = self.config.min_size(), "body too small, skip compress");
            return None;
        }

        encoding
    }
}

/// Joins every `Accept-Encoding` line into one string.
///
/// Returns `None` when the header is absent or one of its values isn't visible ASCII.
fn accept_encodings(req_headers: &HeaderMap) -> Option<String> {
    let mut values = req_headers.get_all(ACCEPT_ENCODING).iter();
    let first = values.next()?.to_str().ok()?;

    let mut joined = first.to_owned();
    for value in values {
        joined.push_str(", ");
        joined.push_str(value.to_str().ok()?);
    }
    Some(joined)
}

/// Moves the response to its final state given the outcome of the codec.
fn apply(resp: &mut Response<Bytes>, encoding: Encoding, result: Result<Bytes, CompressionError>) {
    match result {
        Ok(compressed) => {
            debug!(%encoding, original = resp.body().len(), compressed = compressed.len(), "response compressed");
            *resp.body_mut() = compressed;
            resp.headers_mut().insert(CONTENT_ENCODING, encoding.header_value());
        }
        Err(e) => {
            warn!(%encoding, error = %e, "compress response failed, fall back to the original body");
        }
    }
}
