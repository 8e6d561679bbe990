//! Thin JSON-over-HTTP client used by the retry client.

use log::debug;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderValue, InvalidHeaderValue};
use reqwest::{Client, StatusCode};
use serde::Serialize;
use std::time::Duration;

/// Builds a sensitive `Bearer <token>` header value.
pub fn bearer(token: &str) -> Result<HeaderValue, InvalidHeaderValue> {
    let mut value = HeaderValue::from_str(&format!("Bearer {}", token))?;
    value.set_sensitive(true);
    Ok(value)
}

/// Status and raw body of a completed exchange.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

/// HTTP client that hands every status back to the caller instead of
/// turning non-2xx into errors.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Creates a new HTTP client wrapping the given reqwest Client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Returns a reference to the underlying reqwest Client.
    pub fn inner(&self) -> &Client {
        &self.client
    }

    /// POSTs `body` as JSON with the given Authorization value. The timeout
    /// covers the whole exchange, including reading the body.
    #[tracing::instrument(skip(self, authorization, body))]
    pub async fn post_json<B: Serialize + ?Sized>(
        &self,
        url: &str,
        authorization: HeaderValue,
        body: &B,
        timeout: Duration,
    ) -> Result<RawResponse, reqwest::Error> {
        debug!("POST JSON to {} (timeout {:?})...", url, timeout);

        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .header(AUTHORIZATION, authorization)
            .json(body)
            .timeout(timeout)
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?.to_vec();
        debug!("Received {} with {} byte body", status, body.len());

        Ok(RawResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    #[tokio::test]
    async fn test_post_json_sends_headers_and_body() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let mock = server
            .mock("POST", "/echo")
            .match_header("authorization", "Bearer test-token")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(serde_json::json!({ "hello": "world" })))
            .with_status(201)
            .with_body("created")
            .create_async()
            .await;

        let client = HttpClient::new(Client::new());
        let response = client
            .post_json(
                &format!("{}/echo", url),
                bearer("test-token").unwrap(),
                &serde_json::json!({ "hello": "world" }),
                Duration::from_secs(5),
            )
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(response.status, StatusCode::CREATED);
        assert_eq!(response.body, b"created");
    }

    #[tokio::test]
    async fn test_post_json_returns_error_statuses() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let mock = server
            .mock("POST", "/fail")
            .with_status(503)
            .create_async()
            .await;

        let client = HttpClient::new(Client::new());
        let response = client
            .post_json(
                &format!("{}/fail", url),
                bearer("t").unwrap(),
                &serde_json::json!({}),
                Duration::from_secs(5),
            )
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_post_json_connection_refused() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = HttpClient::new(Client::new());
        let err = client
            .post_json(
                &format!("http://{}/retry", addr),
                bearer("t").unwrap(),
                &serde_json::json!({}),
                Duration::from_secs(5),
            )
            .await
            .unwrap_err();

        assert!(err.is_connect() || err.is_request());
        assert!(!err.is_timeout());
    }

    #[test]
    fn test_bearer_rejects_control_characters() {
        assert!(bearer("abc\ndef").is_err());

        let value = bearer("abc").unwrap();
        assert_eq!(value.to_str().unwrap(), "Bearer abc");
        assert!(value.is_sensitive());
    }
}
