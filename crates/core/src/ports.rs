//! Port interfaces for the external collaborators
//!
//! The object model performs no I/O of its own. Every request goes through a
//! [`Transport`], and destructive operations ask a [`ConfirmationPrompt`]
//! first. Adapters live in `dirgraph-infra`; tests plug in in-memory fakes.

use std::fmt;

use async_trait::async_trait;
use dirgraph_domain::Result;
use serde_json::Value;

use crate::context::AccessToken;
use crate::operation::HttpMethod;

/// Fully-resolved request handed to the transport
#[derive(Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub bearer_token: AccessToken,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    /// JSON body, encoded by the transport when present.
    pub body: Option<Value>,
}

impl fmt::Debug for HttpRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpRequest")
            .field("method", &self.method)
            .field("url", &self.url)
            .field("query", &self.query)
            .field("headers", &self.headers)
            .field("body", &self.body)
            .finish_non_exhaustive()
    }
}

/// Status and raw body of a received response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self { status, body: body.into() }
    }

    /// Response carrying a JSON document.
    pub fn json(status: u16, body: &Value) -> Self {
        Self { status, body: body.to_string() }
    }

    pub fn no_content() -> Self {
        Self { status: 204, body: String::new() }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Trait for sending requests to the directory service
///
/// Implementations return `Ok` for every response that was received,
/// whatever its status, and `DirectoryError::Transport` only when no
/// response arrived. Retry policy, if any, belongs here and not in the
/// object model.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse>;
}

/// Trait for asking the user to approve a destructive operation
pub trait ConfirmationPrompt: Send + Sync {
    /// Returns `true` when the user agrees to proceed.
    fn confirm(&self, message: &str) -> Result<bool>;
}

/// Prompt that declines everything. Used when no interactive prompt is wired.
#[derive(Debug, Clone, Copy, Default)]
pub struct DecliningPrompt;

impl ConfirmationPrompt for DecliningPrompt {
    fn confirm(&self, _message: &str) -> Result<bool> {
        Ok(false)
    }
}
