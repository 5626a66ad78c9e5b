//! Negotiation and codec middlewares
//!
//! Compression is split in two stages so other middleware can veto it in
//! between: [`EncodingNegotiator`] only *selects* a coding on the response,
//! [`ContentEncoder`] applies whatever coding is still pending when the
//! response reaches it. The encoder must sit outside (earlier in the stack
//! than) the negotiator.

use crate::compressor::{CompressionAlgorithm, Compressor};
use crate::config::CompressionConfig;
use crate::encoding::{complete_encoding, pending_encoding, select_encoding};
use async_trait::async_trait;
use binwire_core::middleware::{Body, Middleware, Next};
use binwire_core::response::responses;
use binwire_core::{Error, Result};
use http::{header, HeaderValue, Request, Response};
use http_body::Body as _;
use http_body_util::BodyExt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Picks a coding from `Accept-Encoding` and marks it pending on the response
#[derive(Debug, Clone)]
pub struct EncodingNegotiator {
    config: Arc<CompressionConfig>,
}

impl EncodingNegotiator {
    /// Create a new negotiator
    pub fn new(config: CompressionConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

#[async_trait]
impl Middleware for EncodingNegotiator {
    async fn call(&self, req: Request<Body>, next: Next) -> Result<Response<Body>> {
        if !self.config.enabled {
            return next.run(req).await;
        }

        let accept_encoding = req
            .headers()
            .get(header::ACCEPT_ENCODING)
            .and_then(|v| v.to_str().ok());
        let algorithm = Compressor::negotiate_algorithm(accept_encoding, &self.config.algorithms);

        let mut response = next.run(req).await?;

        let Some(algorithm) = algorithm else {
            return Ok(response);
        };
        if !should_select(&response, &self.config) {
            return Ok(response);
        }

        select_encoding(&mut response, algorithm);
        debug!(
            algorithm = algorithm.encoding_name(),
            "Content encoding selected"
        );
        Ok(response)
    }
}

/// Check if a coding may be selected for the response
fn should_select(response: &Response<Body>, config: &CompressionConfig) -> bool {
    if response.headers().contains_key(header::CONTENT_ENCODING) {
        return false;
    }

    if !response.status().is_success() {
        return false;
    }

    let size = response.body().size_hint().exact().unwrap_or(u64::MAX);
    config.should_compress(usize::try_from(size).unwrap_or(usize::MAX))
}

/// Compresses the body when an encoding is still pending
#[derive(Debug, Clone)]
pub struct ContentEncoder {
    config: Arc<CompressionConfig>,
}

impl ContentEncoder {
    /// Create a new encoder
    pub fn new(config: CompressionConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

#[async_trait]
impl Middleware for ContentEncoder {
    async fn call(&self, req: Request<Body>, next: Next) -> Result<Response<Body>> {
        let response = next.run(req).await?;

        let Some(algorithm) = pending_encoding(&response) else {
            return Ok(response);
        };

        match encode_response(response, algorithm, self.config.level).await {
            Ok(encoded) => {
                debug!(
                    algorithm = algorithm.encoding_name(),
                    "Response compressed successfully"
                );
                Ok(encoded)
            }
            Err(e) => {
                warn!(error = %e, "Failed to compress response");
                responses::internal_error("Compression error")
            }
        }
    }
}

/// Compress the response body with `algorithm`
async fn encode_response(
    response: Response<Body>,
    algorithm: CompressionAlgorithm,
    level: u32,
) -> Result<Response<Body>> {
    let (parts, body) = response.into_parts();

    let body_bytes = body
        .collect()
        .await
        .map_err(|e| Error::Internal(format!("Failed to read body: {e}")))?
        .to_bytes();

    let compressed = Compressor::compress(&body_bytes, algorithm, level).map_err(Error::encoding)?;

    let mut response = Response::from_parts(parts, Body::new(compressed));
    let length = HeaderValue::from(response.body().size_hint().exact().unwrap_or(0));
    let headers = response.headers_mut();
    headers.insert(header::CONTENT_LENGTH, length);
    headers.remove(header::TRANSFER_ENCODING);
    complete_encoding(&mut response);

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::{is_encoding_pending, PendingEncoding};
    use binwire_core::{endpoint_fn, Endpoint, Pipeline};
    use http::header::{ACCEPT_ENCODING, CONTENT_ENCODING, CONTENT_LENGTH};
    use std::io::Read;

    fn text_endpoint(body: &'static str) -> Arc<dyn Endpoint> {
        Arc::new(endpoint_fn(move |_req| async move {
            responses::ok().text(body)
        }))
    }

    fn request(accept: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri("/");
        if let Some(accept) = accept {
            builder = builder.header(ACCEPT_ENCODING, accept);
        }
        builder.body(Body::from("")).unwrap()
    }

    fn negotiate_only(config: CompressionConfig, body: &'static str) -> Pipeline {
        Pipeline::new(
            Arc::new([Arc::new(EncodingNegotiator::new(config)) as Arc<dyn Middleware>]),
            text_endpoint(body),
        )
    }

    fn full_stack(config: CompressionConfig, body: &'static str) -> Pipeline {
        Pipeline::new(
            Arc::new([
                Arc::new(ContentEncoder::new(config.clone())) as Arc<dyn Middleware>,
                Arc::new(EncodingNegotiator::new(config)) as Arc<dyn Middleware>,
            ]),
            text_endpoint(body),
        )
    }

    #[tokio::test]
    async fn test_negotiator_selects_without_compressing() {
        let pipeline = negotiate_only(CompressionConfig::default(), "hello");

        let response = pipeline.handle(request(Some("gzip"))).await.unwrap();
        assert_eq!(response.headers().get(CONTENT_ENCODING).unwrap(), "gzip");
        assert!(is_encoding_pending(&response));

        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"hello");
    }

    #[tokio::test]
    async fn test_negotiator_disabled() {
        let config = CompressionConfig {
            enabled: false,
            ..Default::default()
        };
        let pipeline = negotiate_only(config, "hello");

        let response = pipeline.handle(request(Some("gzip"))).await.unwrap();
        assert!(!response.headers().contains_key(CONTENT_ENCODING));
    }

    #[tokio::test]
    async fn test_no_accept_encoding() {
        let pipeline = negotiate_only(CompressionConfig::default(), "hello");

        let response = pipeline.handle(request(None)).await.unwrap();
        assert!(!response.headers().contains_key(CONTENT_ENCODING));
        assert!(response.extensions().get::<PendingEncoding>().is_none());
    }

    #[tokio::test]
    async fn test_negotiator_skips_empty_and_small_bodies() {
        let pipeline = negotiate_only(CompressionConfig::default(), "");
        let response = pipeline.handle(request(Some("gzip"))).await.unwrap();
        assert!(!response.headers().contains_key(CONTENT_ENCODING));

        let config = CompressionConfig {
            min_size: 1024,
            ..Default::default()
        };
        let pipeline = negotiate_only(config, "short");
        let response = pipeline.handle(request(Some("gzip"))).await.unwrap();
        assert!(!response.headers().contains_key(CONTENT_ENCODING));
    }

    #[tokio::test]
    async fn test_negotiator_skips_errors() {
        let pipeline = Pipeline::new(
            Arc::new([
                Arc::new(EncodingNegotiator::new(CompressionConfig::default()))
                    as Arc<dyn Middleware>,
            ]),
            Arc::new(endpoint_fn(|_req| async {
                responses::internal_error("broken")
            })),
        );

        let response = pipeline.handle(request(Some("gzip"))).await.unwrap();
        assert!(!response.headers().contains_key(CONTENT_ENCODING));
    }

    #[tokio::test]
    async fn test_full_stack_compresses() {
        let pipeline = full_stack(CompressionConfig::default(), "hello hello hello");

        let response = pipeline.handle(request(Some("gzip"))).await.unwrap();
        assert_eq!(response.headers().get(CONTENT_ENCODING).unwrap(), "gzip");
        assert!(!is_encoding_pending(&response));

        let length: usize = response
            .headers()
            .get(CONTENT_LENGTH)
            .unwrap()
            .to_str()
            .unwrap()
            .parse()
            .unwrap();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(body.len(), length);

        let mut decoded = String::new();
        flate2::read::GzDecoder::new(&body[..])
            .read_to_string(&mut decoded)
            .unwrap();
        assert_eq!(decoded, "hello hello hello");
    }

    #[tokio::test]
    async fn test_encoder_ignores_foreign_content_encoding() {
        let pipeline = Pipeline::new(
            Arc::new([
                Arc::new(ContentEncoder::new(CompressionConfig::default())) as Arc<dyn Middleware>,
            ]),
            Arc::new(endpoint_fn(|_req| async {
                responses::ok()
                    .header(CONTENT_ENCODING, "gzip")
                    .bytes(b"already-encoded".to_vec())
            })),
        );

        let response = pipeline.handle(request(Some("gzip"))).await.unwrap();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"already-encoded");
    }
}
