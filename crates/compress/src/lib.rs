//! A response compression middleware for the micro web stack
//!
//! This crate compresses the body of a finished response with brotli, deflate, gzip or zstd,
//! depending on what the request's `Accept-Encoding` header allows, and sets the matching
//! `Content-Encoding` header.
//!
//! # Features
//!
//! - Four codecs behind one closed [`Codec`] enum, each call uses a fresh encoder
//! - Fixed priority selection: `br` > `deflate` > `gzip` > `zstd`, by substring match
//! - Per-codec levels validated once, when the middleware is built
//! - Best effort: a failed compression leaves the response exactly as it was
//!
//! # Example
//!
//! ```
//! use bytes::Bytes;
//! use http::{Request, Response};
//! use micro_compress::{CompressConfig, CompressDecorator, HandlerDecorator, RequestHandler, handler_fn};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = CompressConfig::builder().brotli_level(6).gzip_level(-1).build()?;
//! let handler = CompressDecorator::new(config)
//!     .decorate(handler_fn(|_req: &Request<Bytes>| Response::new(Bytes::from_static(b"hello world"))));
//!
//! let req = Request::builder().header("accept-encoding", "gzip, br").body(Bytes::new())?;
//! let resp = handler.invoke(&req).await;
//! assert_eq!(resp.headers()["content-encoding"], "br");
//! # Ok(())
//! # }
//! ```

mod codec;
mod compressor;
mod decorator;
mod encoding;
mod error;
mod handler;

pub mod config;

pub use codec::Codec;
pub use compressor::Compressor;
pub use config::{CompressConfig, CompressConfigBuilder, CompressSettings};
pub use decorator::{CompressDecorator, CompressRequestHandler};
pub use encoding::{Encoding, EncodingSelector, PrioritySelector};
pub use error::{CompressionError, ConfigError, UnknownEncoding};
pub use handler::{FnHandler, HandlerDecorator, RequestHandler, handler_fn};
