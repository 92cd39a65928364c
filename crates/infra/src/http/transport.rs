//! `Transport` adapter backed by [`HttpClient`]

use async_trait::async_trait;
use dirgraph_core::{HttpMethod, HttpRequest, HttpResponse, Transport};
use dirgraph_domain::{DirectoryError, HttpConfig, Result};
use reqwest::header::ACCEPT;
use reqwest::Method;
use tracing::debug;

use super::client::HttpClient;
use crate::errors::InfraError;

/// Sends directory requests over reqwest.
///
/// Every received response is returned as-is, whatever its status; only
/// requests that never got a response fail with `DirectoryError::Transport`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: HttpClient,
}

impl ReqwestTransport {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    /// # Errors
    /// Returns `DirectoryError::InvalidInput` if the reqwest client cannot
    /// be built from `config`.
    pub fn from_config(config: &HttpConfig) -> Result<Self> {
        Ok(Self::new(HttpClient::from_config(config)?))
    }
}

fn to_reqwest_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Delete => Method::DELETE,
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        let mut builder = self
            .client
            .request(to_reqwest_method(request.method), request.url.as_str())
            .bearer_auth(request.bearer_token.secret())
            .header(ACCEPT, "application/json");

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = self.client.send(builder).await?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(|err| DirectoryError::from(InfraError::from(err)))?;
        debug!(status, bytes = body.len(), "directory response received");

        Ok(HttpResponse::new(status, body))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use dirgraph_core::AccessToken;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn transport() -> ReqwestTransport {
        let client = HttpClient::builder()
            .base_backoff(Duration::from_millis(1))
            .max_attempts(1)
            .build()
            .expect("http client");
        ReqwestTransport::new(client)
    }

    fn request(method: HttpMethod, url: String) -> HttpRequest {
        HttpRequest {
            method,
            url,
            bearer_token: AccessToken::new("secret-token"),
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
        }
    }

    #[tokio::test]
    async fn sends_bearer_token_query_headers_and_json_body() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/contoso/users/u1"))
            .and(header("authorization", "Bearer secret-token"))
            .and(header("x-trace", "abc"))
            .and(query_param("api-version", "1.6"))
            .and(body_json(json!({ "city": "Oslo" })))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let mut req = request(HttpMethod::Patch, format!("{}/contoso/users/u1", server.uri()));
        req.query.push(("api-version".into(), "1.6".into()));
        req.headers.push(("x-trace".into(), "abc".into()));
        req.body = Some(json!({ "city": "Oslo" }));

        let response = transport().execute(req).await.unwrap();
        assert_eq!(response.status, 204);
        assert!(response.body.is_empty());
    }

    #[tokio::test]
    async fn error_statuses_are_returned_not_raised() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_string("Request_ResourceNotFound"))
            .mount(&server)
            .await;

        let response = transport()
            .execute(request(HttpMethod::Get, format!("{}/contoso/groups/x", server.uri())))
            .await
            .unwrap();

        assert_eq!(response, HttpResponse::new(404, "Request_ResourceNotFound"));
    }

    #[test]
    fn methods_map_one_to_one() {
        assert_eq!(to_reqwest_method(HttpMethod::Get), Method::GET);
        assert_eq!(to_reqwest_method(HttpMethod::Delete), Method::DELETE);
        assert_eq!(to_reqwest_method(HttpMethod::Patch), Method::PATCH);
    }
}
