//! Names shared with the transport layer
//!
//! These strings are a stable contract: the gateway integration reads the
//! marker header to decide how to put the body on the wire, and hosts use the
//! property name to configure the policy flag.

use http::{HeaderName, HeaderValue, Response};

/// Header declaring that the body must be transported as binary
pub const BINARY_RESPONSE_HEADER: &str = "x-binwire-binary-response";

/// Value written into [`BINARY_RESPONSE_HEADER`]
pub const BINARY_RESPONSE_VALUE: &str = "true";

/// Configuration property holding the binary-compression-only flag
pub const BINARY_COMPRESSION_ONLY_PROPERTY: &str = "binwire.gateway.binary-compression-only";

/// Policy flag value used when the property is absent or unreadable
pub const DEFAULT_BINARY_COMPRESSION_ONLY: bool = true;

/// Mark the response body as binary. Repeated calls leave a single value.
pub fn mark_binary<B>(response: &mut Response<B>) {
    response.headers_mut().insert(
        HeaderName::from_static(BINARY_RESPONSE_HEADER),
        HeaderValue::from_static(BINARY_RESPONSE_VALUE),
    );
}

/// Whether the response carries the binary marker
pub fn is_marked_binary<B>(response: &Response<B>) -> bool {
    response
        .headers()
        .get(BINARY_RESPONSE_HEADER)
        .and_then(|v| v.to_str().ok())
        .map_or(false, |v| v.eq_ignore_ascii_case(BINARY_RESPONSE_VALUE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_binary_once() {
        let mut response = Response::new(());
        assert!(!is_marked_binary(&response));

        mark_binary(&mut response);
        mark_binary(&mut response);

        assert!(is_marked_binary(&response));
        assert_eq!(
            response.headers().get_all(BINARY_RESPONSE_HEADER).iter().count(),
            1
        );
    }

    #[test]
    fn test_other_values_are_not_marked() {
        let mut response = Response::new(());
        response.headers_mut().insert(
            HeaderName::from_static(BINARY_RESPONSE_HEADER),
            HeaderValue::from_static("false"),
        );
        assert!(!is_marked_binary(&response));
    }
}
