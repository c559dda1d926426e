//! Request body extractors
//!
//! Thin wrappers over `axum::Json` and `axum::Form` whose rejections become
//! `Error::Validation`, so a malformed body gets the same 400 envelope as
//! every other bad request.

use crate::error::Error;
use axum::{
    async_trait,
    extract::{rejection::FormRejection, rejection::JsonRejection, FromRequest, Request},
};

/// JSON request body
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    axum::Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let axum::Json(value) = axum::Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

/// `application/x-www-form-urlencoded` request body
#[derive(Debug, Clone)]
pub struct FormBody<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for FormBody<T>
where
    axum::Form<T>: FromRequest<S, Rejection = FormRejection>,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let axum::Form(value) = axum::Form::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Counter {
        count: u32,
    }

    fn json_request(body: &str) -> Request {
        axum::http::Request::builder()
            .method("POST")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), 1024 * 64)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_json_body_accepts_valid_input() {
        let JsonBody(value) = JsonBody::<Counter>::from_request(json_request(r#"{"count": 3}"#), &())
            .await
            .unwrap();
        assert_eq!(value.count, 3);
    }

    #[tokio::test]
    async fn test_json_body_rejection_uses_envelope() {
        let err = JsonBody::<Counter>::from_request(json_request(r#"{"count": "three"}"#), &())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        let resp = err.into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let json = body_json(resp).await;
        assert_eq!(json["error"]["code"], "BAD_REQUEST");
        assert!(json["error"]["message"].as_str().unwrap().contains("count"));
    }

    #[tokio::test]
    async fn test_json_body_requires_content_type() {
        let req = axum::http::Request::builder()
            .method("POST")
            .body(Body::from(r#"{"count": 3}"#))
            .unwrap();
        let err = JsonBody::<Counter>::from_request(req, &()).await.unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_form_body_rejection() {
        let req = axum::http::Request::builder()
            .method("POST")
            .header("content-type", "application/x-www-form-urlencoded")
            .body(Body::from("other=1"))
            .unwrap();
        let err = FormBody::<Counter>::from_request(req, &()).await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }
}
