//! What the middleware needs from the host framework: a way to run the downstream handler
//! and a way to wrap one handler into another.

use async_trait::async_trait;
use bytes::Bytes;
use http::{Request, Response};
use std::fmt;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RequestHandler: Send + Sync {
    async fn invoke(&self, req: &Request<Bytes>) -> Response<Bytes>;
}

/// a plain `Fn` holder which acts as a [`RequestHandler`]
pub struct FnHandler<F> {
    f: F,
}

impl<F> fmt::Debug for FnHandler<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnHandler").finish_non_exhaustive()
    }
}

pub fn handler_fn<F>(f: F) -> FnHandler<F>
where
    F: Fn(&Request<Bytes>) -> Response<Bytes> + Send + Sync,
{
    FnHandler { f }
}

#[async_trait]
impl<F> RequestHandler for FnHandler<F>
where
    F: Fn(&Request<Bytes>) -> Response<Bytes> + Send + Sync,
{
    async fn invoke(&self, req: &Request<Bytes>) -> Response<Bytes> {
        (self.f)(req)
    }
}

/// Wraps a handler into another one, e.g. to post-process its responses.
pub trait HandlerDecorator<In: RequestHandler> {
    type Output: RequestHandler;

    fn decorate(&self, handler: In) -> Self::Output;
}
