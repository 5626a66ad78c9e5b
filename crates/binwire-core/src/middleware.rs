//! Middleware trait, endpoints and the ordered chain that runs them

use crate::Result;
use async_trait::async_trait;
use bytes::Bytes;
use http::{Request, Response};
use http_body_util::Full;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// Body type alias
pub type Body = Full<Bytes>;

/// Middleware trait for request/response processing
///
/// A middleware sees the request on the way in and the response on the way
/// out. Responses unwind in reverse stack order: the middleware pushed last
/// (innermost) is the first to see the endpoint's response.
#[async_trait]
pub trait Middleware: Send + Sync + fmt::Debug {
    /// Process a request
    ///
    /// # Arguments
    ///
    /// * `req` - The incoming HTTP request
    /// * `next` - The rest of the chain, ending in the endpoint
    async fn call(&self, req: Request<Body>, next: Next) -> Result<Response<Body>>;
}

/// Terminal handler producing the response at the end of a chain
#[async_trait]
pub trait Endpoint: Send + Sync + fmt::Debug {
    /// Produce a response for the request
    async fn handle(&self, req: Request<Body>) -> Result<Response<Body>>;
}

/// [`Endpoint`] backed by an async closure, see [`endpoint_fn`]
pub struct FnEndpoint<F> {
    f: F,
}

/// Wrap an async closure as an [`Endpoint`]
pub fn endpoint_fn<F, Fut>(f: F) -> FnEndpoint<F>
where
    F: Fn(Request<Body>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Response<Body>>> + Send + 'static,
{
    FnEndpoint { f }
}

#[async_trait]
impl<F, Fut> Endpoint for FnEndpoint<F>
where
    F: Fn(Request<Body>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Response<Body>>> + Send + 'static,
{
    async fn handle(&self, req: Request<Body>) -> Result<Response<Body>> {
        (self.f)(req).await
    }
}

impl<F> fmt::Debug for FnEndpoint<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnEndpoint").finish_non_exhaustive()
    }
}

/// Represents the next middleware (or the endpoint) in the chain
pub struct Next {
    middleware_stack: Arc<[Arc<dyn Middleware>]>,
    index: usize,
    endpoint: Arc<dyn Endpoint>,
}

impl Next {
    /// Start a chain at the first middleware of the stack
    pub fn new(middleware_stack: Arc<[Arc<dyn Middleware>]>, endpoint: Arc<dyn Endpoint>) -> Self {
        Self {
            middleware_stack,
            index: 0,
            endpoint,
        }
    }

    /// Run the next middleware, or the endpoint once the stack is exhausted
    pub async fn run(self, req: Request<Body>) -> Result<Response<Body>> {
        match self.middleware_stack.get(self.index) {
            Some(middleware) => {
                let middleware = Arc::clone(middleware);
                let next = Self {
                    middleware_stack: Arc::clone(&self.middleware_stack),
                    index: self.index + 1,
                    endpoint: Arc::clone(&self.endpoint),
                };
                middleware.call(req, next).await
            }
            None => self.endpoint.handle(req).await,
        }
    }
}

impl Clone for Next {
    fn clone(&self) -> Self {
        Self {
            middleware_stack: Arc::clone(&self.middleware_stack),
            index: self.index,
            endpoint: Arc::clone(&self.endpoint),
        }
    }
}

impl fmt::Debug for Next {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Next")
            .field("index", &self.index)
            .field("remaining", &(self.middleware_stack.len() - self.index))
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

/// A fixed middleware stack bound to an endpoint
#[derive(Clone, Debug)]
pub struct Pipeline {
    middleware_stack: Arc<[Arc<dyn Middleware>]>,
    endpoint: Arc<dyn Endpoint>,
}

impl Pipeline {
    /// Bind a stack (outermost first) to an endpoint
    pub fn new(middleware_stack: Arc<[Arc<dyn Middleware>]>, endpoint: Arc<dyn Endpoint>) -> Self {
        Self {
            middleware_stack,
            endpoint,
        }
    }

    /// Run one request through the whole stack
    pub async fn handle(&self, req: Request<Body>) -> Result<Response<Body>> {
        Next::new(Arc::clone(&self.middleware_stack), Arc::clone(&self.endpoint))
            .run(req)
            .await
    }

    /// Number of middlewares in front of the endpoint
    pub fn len(&self) -> usize {
        self.middleware_stack.len()
    }

    /// Whether requests go straight to the endpoint
    pub fn is_empty(&self) -> bool {
        self.middleware_stack.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    #[derive(Debug)]
    struct Tag {
        name: &'static str,
    }

    #[async_trait]
    impl Middleware for Tag {
        async fn call(&self, req: Request<Body>, next: Next) -> Result<Response<Body>> {
            let mut response = next.run(req).await?;
            response
                .headers_mut()
                .append("x-trace", HeaderValue::from_static(self.name));
            Ok(response)
        }
    }

    fn ok_endpoint() -> Arc<dyn Endpoint> {
        Arc::new(endpoint_fn(|_req| async { Ok(Response::new(Body::from("ok"))) }))
    }

    #[tokio::test]
    async fn test_empty_stack_reaches_endpoint() {
        let pipeline = Pipeline::new(Arc::new([]), ok_endpoint());
        assert!(pipeline.is_empty());

        let req = Request::builder().uri("/").body(Body::from("")).unwrap();
        let response = pipeline.handle(req).await.unwrap();
        assert!(response.headers().get("x-trace").is_none());
    }

    #[tokio::test]
    async fn test_responses_unwind_innermost_first() {
        let stack: Arc<[Arc<dyn Middleware>]> = Arc::new([
            Arc::new(Tag { name: "outer" }) as Arc<dyn Middleware>,
            Arc::new(Tag { name: "inner" }) as Arc<dyn Middleware>,
        ]);
        let pipeline = Pipeline::new(stack, ok_endpoint());
        assert_eq!(pipeline.len(), 2);

        let req = Request::builder().uri("/").body(Body::from("")).unwrap();
        let response = pipeline.handle(req).await.unwrap();
        let trace: Vec<_> = response
            .headers()
            .get_all("x-trace")
            .iter()
            .map(|v| v.to_str().unwrap().to_string())
            .collect();
        assert_eq!(trace, vec!["inner", "outer"]);
    }

    #[tokio::test]
    async fn test_endpoint_error_propagates() {
        let endpoint: Arc<dyn Endpoint> = Arc::new(endpoint_fn(|_req| async {
            Err(crate::Error::Internal("boom".to_string()))
        }));
        let stack: Arc<[Arc<dyn Middleware>]> =
            Arc::new([Arc::new(Tag { name: "only" }) as Arc<dyn Middleware>]);

        let req = Request::builder().uri("/").body(Body::from("")).unwrap();
        let result = Next::new(stack, endpoint).run(req).await;
        assert!(result.is_err());
    }
}
