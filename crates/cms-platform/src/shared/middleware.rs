//! Request principal extraction
//!
//! Authorization is enforced upstream of this service; handlers only need
//! to know who is acting so writes can be stamped and audited.

use std::convert::Infallible;

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::usecase::ExecutionContext;

pub const PRINCIPAL_HEADER: &str = "x-principal-id";
pub const CORRELATION_HEADER: &str = "x-correlation-id";

/// Principal used when the caller did not identify itself.
pub const ANONYMOUS_PRINCIPAL: &str = "anonymous";

/// Principal and correlation id taken from request headers.
#[derive(Debug, Clone)]
pub struct RequestPrincipal {
    pub principal_id: String,
    pub correlation_id: Option<String>,
}

impl RequestPrincipal {
    pub fn context(&self) -> ExecutionContext {
        match &self.correlation_id {
            Some(correlation_id) => {
                ExecutionContext::with_correlation(self.principal_id.clone(), correlation_id.clone())
            }
            None => ExecutionContext::create(self.principal_id.clone()),
        }
    }
}

fn header_value(parts: &Parts, name: &str) -> Option<String> {
    parts
        .headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}

#[async_trait]
impl<S> FromRequestParts<S> for RequestPrincipal
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(RequestPrincipal {
            principal_id: header_value(parts, PRINCIPAL_HEADER)
                .unwrap_or_else(|| ANONYMOUS_PRINCIPAL.to_string()),
            correlation_id: header_value(parts, CORRELATION_HEADER),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(request: Request<()>) -> RequestPrincipal {
        let (mut parts, _) = request.into_parts();
        RequestPrincipal::from_request_parts(&mut parts, &()).await.unwrap()
    }

    #[tokio::test]
    async fn test_headers_are_read() {
        let principal = extract(
            Request::builder()
                .header(PRINCIPAL_HEADER, "editor-7")
                .header(CORRELATION_HEADER, "corr-1")
                .body(())
                .unwrap(),
        )
        .await;
        assert_eq!(principal.principal_id, "editor-7");
        assert_eq!(principal.context().correlation_id, "corr-1");
    }

    #[tokio::test]
    async fn test_missing_principal_is_anonymous() {
        let principal = extract(Request::builder().body(()).unwrap()).await;
        assert_eq!(principal.principal_id, ANONYMOUS_PRINCIPAL);
        assert!(principal.correlation_id.is_none());
    }
}
