use bytes::Bytes;
use http::header::{ACCEPT_ENCODING, CONTENT_ENCODING};
use http::{Request, Response};
use micro_compress::{CompressConfig, CompressDecorator, HandlerDecorator, RequestHandler, handler_fn};
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

fn hello_world(req: &Request<Bytes>) -> Response<Bytes> {
    let body = format!("hello world from {}\n", req.uri().path()).repeat(64);
    Response::new(Bytes::from(body))
}

#[tokio::main]
async fn main() {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::TRACE).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let config = match CompressConfig::builder().brotli_level(5).gzip_level(9).min_size(256).build() {
        Ok(config) => config,
        Err(e) => {
            error!(cause = %e, "invalid compress config");
            return;
        }
    };

    let handler = CompressDecorator::new(config).decorate(handler_fn(hello_world));

    for accept_encoding in ["gzip, deflate, br, zstd", "gzip", "zstd", "identity"] {
        let req = Request::builder().uri("/demo").header(ACCEPT_ENCODING, accept_encoding).body(Bytes::new()).expect("valid request");

        let resp = handler.invoke(&req).await;
        let content_encoding = resp.headers().get(CONTENT_ENCODING).and_then(|v| v.to_str().ok()).unwrap_or("identity");
        info!(accept_encoding, content_encoding, size = resp.body().len(), "handled request");
    }
}
