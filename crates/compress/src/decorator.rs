//! Hooks the [`Compressor`] into a handler chain.
//!
//! [`CompressDecorator`] wraps any [`RequestHandler`] into a [`CompressRequestHandler`]
//! which first awaits the downstream handler and then compresses its response inline.

use crate::compressor::Compressor;
use crate::config::{CompressConfig, CompressSettings};
use crate::encoding::{EncodingSelector, PrioritySelector};
use crate::error::ConfigError;
use crate::handler::{HandlerDecorator, RequestHandler};
use async_trait::async_trait;
use bytes::Bytes;
use http::{Request, Response};

/// A request handler that compresses the response body of the handler it wraps.
#[derive(Debug)]
pub struct CompressRequestHandler<H: RequestHandler, S = PrioritySelector> {
    handler: H,
    compressor: Compressor<S>,
}

/// A decorator that creates [`CompressRequestHandler`]s sharing one configuration.
#[derive(Debug, Clone)]
pub struct CompressDecorator<S = PrioritySelector> {
    compressor: Compressor<S>,
}

impl CompressDecorator<PrioritySelector> {
    pub fn new(config: CompressConfig) -> Self {
        Self { compressor: Compressor::new(config) }
    }

    /// Validates deserialized settings and builds the decorator from them.
    pub fn from_settings(settings: CompressSettings) -> Result<Self, ConfigError> {
        CompressConfig::try_from(settings).map(Self::new)
    }
}

impl Default for CompressDecorator<PrioritySelector> {
    fn default() -> Self {
        Self::new(CompressConfig::default())
    }
}

impl<S> From<Compressor<S>> for CompressDecorator<S> {
    fn from(compressor: Compressor<S>) -> Self {
        Self { compressor }
    }
}

impl<H, S> HandlerDecorator<H> for CompressDecorator<S>
where
    H: RequestHandler,
    S: EncodingSelector + Clone,
{
    type Output = CompressRequestHandler<H, S>;

    fn decorate(&self, raw: H) -> Self::Output {
        CompressRequestHandler { handler: raw, compressor: self.compressor.clone() }
    }
}

#[async_trait]
impl<H, S> RequestHandler for CompressRequestHandler<H, S>
where
    H: RequestHandler,
    S: EncodingSelector,
{
    async fn invoke(&self, req: &Request<Bytes>) -> Response<Bytes> {
        let mut resp = self.handler.invoke(req).await;
        self.compressor.compress_response(req.headers(), &mut resp);
        resp
    }
}
