//! Response builder and utilities

use crate::entity::{Entity, EntityKind};
use crate::middleware::Body;
use crate::Result;
use http::{header, Response, StatusCode};
use serde::Serialize;

/// Response builder for convenient response construction
///
/// Every body goes through [`ResponseBuilder::entity`], so built responses
/// always carry an [`EntityKind`] extension.
#[derive(Debug)]
pub struct ResponseBuilder {
    status: StatusCode,
    headers: Vec<(header::HeaderName, String)>,
}

impl ResponseBuilder {
    /// Create a new response builder
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: Vec::new(),
        }
    }

    /// Set a header
    pub fn header(mut self, name: header::HeaderName, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }

    /// Build response with empty body
    pub fn build(self) -> Result<Response<Body>> {
        self.entity(Entity::Empty)
    }

    /// Build response with text body
    pub fn text(self, body: impl Into<String>) -> Result<Response<Body>> {
        self.entity(Entity::Text(body.into()))
    }

    /// Build response with raw bytes
    pub fn bytes(self, body: impl Into<bytes::Bytes>) -> Result<Response<Body>> {
        self.entity(Entity::Bytes(body.into()))
    }

    /// Build response with JSON body
    pub fn json_body<T: Serialize>(self, body: &T) -> Result<Response<Body>> {
        self.entity(Entity::json(body)?)
    }

    /// Build response from a typed entity
    pub fn entity(self, entity: Entity) -> Result<Response<Body>> {
        let kind: EntityKind = entity.kind();
        let default_content_type = entity.default_content_type();

        let mut response = Response::builder().status(self.status);
        let mut has_content_type = false;
        for (name, value) in self.headers {
            has_content_type |= name == header::CONTENT_TYPE;
            response = response.header(name, value);
        }
        if !has_content_type {
            if let Some(content_type) = default_content_type {
                response = response.header(header::CONTENT_TYPE, content_type);
            }
        }

        let body = Body::new(entity.into_bytes()?);
        Ok(response.extension(kind).body(body)?)
    }
}

/// Convenience functions for common responses
pub mod responses {
    use super::*;

    /// 200 OK
    pub fn ok() -> ResponseBuilder {
        ResponseBuilder::new(StatusCode::OK)
    }

    /// 204 No Content
    pub fn no_content() -> Result<Response<Body>> {
        ResponseBuilder::new(StatusCode::NO_CONTENT).build()
    }

    /// 500 Internal Server Error
    pub fn internal_error(message: impl Into<String>) -> Result<Response<Body>> {
        ResponseBuilder::new(StatusCode::INTERNAL_SERVER_ERROR).text(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    #[test]
    fn test_response_builder() {
        let response = ResponseBuilder::new(StatusCode::OK)
            .header(header::HeaderName::from_static("x-custom"), "value")
            .text("Hello, World!")
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get("x-custom").unwrap(), "value");
        assert_eq!(
            response.extensions().get::<EntityKind>(),
            Some(&EntityKind::Text)
        );
    }

    #[test]
    fn test_json_response() {
        use serde_json::json;

        let data = json!({
            "message": "success"
        });

        let response = ResponseBuilder::new(StatusCode::OK)
            .json_body(&data)
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
        assert_eq!(
            response.extensions().get::<EntityKind>(),
            Some(&EntityKind::Json)
        );
    }

    #[test]
    fn test_explicit_content_type_wins() {
        let response = responses::ok()
            .header(header::CONTENT_TYPE, "image/png")
            .bytes(bytes::Bytes::from_static(b"\x89PNG"))
            .unwrap();

        assert_eq!(response.headers().get_all(header::CONTENT_TYPE).iter().count(), 1);
        assert_eq!(response.headers().get(header::CONTENT_TYPE).unwrap(), "image/png");
        assert_eq!(
            response.extensions().get::<EntityKind>(),
            Some(&EntityKind::Bytes)
        );
    }

    #[tokio::test]
    async fn test_bytes_body_round_trips() {
        let response = responses::ok().bytes(b"binary".to_vec()).unwrap();
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/octet-stream"
        );
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"binary");
    }

    #[test]
    fn test_no_content_is_empty() {
        let response = responses::no_content().unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert!(response.headers().get(header::CONTENT_TYPE).is_none());
        assert_eq!(
            response.extensions().get::<EntityKind>(),
            Some(&EntityKind::Empty)
        );
    }
}
