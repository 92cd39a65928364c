//! Request shaping for the generic operation primitive

use dirgraph_domain::{impl_wire_name_conversions, DirectoryError, Result};
use serde::Serialize;
use serde_json::Value;

/// HTTP verbs the directory service accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Patch,
    Put,
    Delete,
}

impl_wire_name_conversions!(HttpMethod {
    Get => "GET",
    Post => "POST",
    Patch => "PATCH",
    Put => "PUT",
    Delete => "DELETE",
});

/// Options for a single directory operation.
///
/// Defaults to a bare GET with no body. Query parameters and headers are
/// passed through to the transport untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OperationOptions {
    pub method: HttpMethod,
    pub body: Option<Value>,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
}

impl OperationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn method(mut self, method: HttpMethod) -> Self {
        self.method = method;
        self
    }

    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Encode any serialisable value as the JSON request body.
    ///
    /// # Errors
    /// Returns `DirectoryError::Serialization` if the value cannot be encoded.
    pub fn json<T: Serialize + ?Sized>(self, body: &T) -> Result<Self> {
        let value = serde_json::to_value(body)
            .map_err(|e| DirectoryError::serialization(format!("failed to encode body: {e}")))?;
        Ok(self.body(value))
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}
