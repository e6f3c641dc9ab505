use async_trait::async_trait;
use bucketwire_domain::{BoxError, TransportError};
use bytes::Bytes;
use http::{Request, Response};
use http_body_util::combinators::BoxBody;
use http_body_util::{BodyExt, Empty, Full};

pub type RequestBody = BoxBody<Bytes, BoxError>;
pub type ResponseBody = BoxBody<Bytes, BoxError>;

/// Single request/response exchange.
#[async_trait]
pub trait RoundTrip: Send + Sync {
    async fn round_trip(
        &self,
        request: Request<RequestBody>,
    ) -> Result<Response<ResponseBody>, TransportError>;
}

pub fn empty_body() -> RequestBody {
    Empty::<Bytes>::new()
        .map_err(|never| match never {})
        .boxed()
}

pub fn full_body(bytes: impl Into<Bytes>) -> RequestBody {
    Full::new(bytes.into())
        .map_err(|never| match never {})
        .boxed()
}
