//! Shared test helpers for `dirgraph-core` integration tests.
//!
//! In-memory fakes for the context ports so that tests can script service
//! responses and count what the object model actually sent.

#![allow(dead_code)]

pub mod fakes;

use std::sync::Arc;

use dirgraph_core::{AccessToken, DirectoryContext};
use dirgraph_domain::Properties;
use serde_json::Value;

pub use fakes::{CountingFactory, MockTransport, ScriptedPrompt};

pub const BASE_URL: &str = "https://graph.example.test";
pub const TENANT: &str = "contoso";

/// `{base}/{tenant}/{path}`
pub fn url(path: &str) -> String {
    format!("{BASE_URL}/{TENANT}/{path}")
}

pub fn props(value: Value) -> Properties {
    value.as_object().cloned().expect("fixture must be a JSON object")
}

/// Context wired to the given fakes.
pub fn context(transport: &MockTransport, prompt: &ScriptedPrompt) -> Arc<DirectoryContext> {
    DirectoryContext::builder()
        .base_url(BASE_URL)
        .tenant(TENANT)
        .token(AccessToken::new("test-token"))
        .transport(Arc::new(transport.clone()))
        .prompt(Arc::new(prompt.clone()))
        .build()
        .expect("test context must build")
}
