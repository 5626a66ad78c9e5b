//! The Encoding Indicator
//!
//! An encoding is *pending* on a response when the negotiator has selected
//! a coding for it and the body has not been transformed yet. It is
//! represented by the `Content-Encoding` header together with a
//! [`PendingEncoding`] extension; both must agree for the codec stage to
//! run. Removing either one vetoes compression.

use crate::compressor::CompressionAlgorithm;
use http::header::{CONTENT_ENCODING, VARY};
use http::{HeaderValue, Response};

/// Response extension recording the coding chosen by negotiation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingEncoding(pub CompressionAlgorithm);

/// Mark `algorithm` as the coding to apply to this response
pub fn select_encoding<B>(response: &mut Response<B>, algorithm: CompressionAlgorithm) {
    let headers = response.headers_mut();
    headers.insert(
        CONTENT_ENCODING,
        HeaderValue::from_static(algorithm.encoding_name()),
    );

    let varies = headers.get_all(VARY).iter().any(|value| {
        value.to_str().map_or(false, |v| {
            v.split(',')
                .any(|name| name.trim().eq_ignore_ascii_case("accept-encoding"))
        })
    });
    if !varies {
        headers.append(VARY, HeaderValue::from_static("accept-encoding"));
    }

    response.extensions_mut().insert(PendingEncoding(algorithm));
}

/// The coding still scheduled to run, if any
pub fn pending_encoding<B>(response: &Response<B>) -> Option<CompressionAlgorithm> {
    let PendingEncoding(algorithm) = *response.extensions().get::<PendingEncoding>()?;
    let header = response.headers().get(CONTENT_ENCODING)?;
    header
        .as_bytes()
        .eq_ignore_ascii_case(algorithm.encoding_name().as_bytes())
        .then_some(algorithm)
}

/// Whether a coding is still scheduled to run
pub fn is_encoding_pending<B>(response: &Response<B>) -> bool {
    pending_encoding(response).is_some()
}

/// Withdraw a pending coding so the codec stage leaves the body alone.
///
/// A `Content-Encoding` that was not set by negotiation (the body is
/// already encoded) is left untouched.
pub fn cancel_encoding<B>(response: &mut Response<B>) -> Option<CompressionAlgorithm> {
    let cancelled = pending_encoding(response);
    if cancelled.is_some() {
        response.headers_mut().remove(CONTENT_ENCODING);
    }
    response.extensions_mut().remove::<PendingEncoding>();
    cancelled
}

/// Clear the pending marker once the body has been transformed
pub(crate) fn complete_encoding<B>(response: &mut Response<B>) {
    response.extensions_mut().remove::<PendingEncoding>();
}
