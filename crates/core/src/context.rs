//! Session-provided context shared by every directory object
//!
//! A [`DirectoryContext`] carries what the authenticated session hands over:
//! the service base URL, the tenant, the bearer token and the collaborator
//! ports. It is immutable once built and objects hold it behind an `Arc`.

use std::fmt;
use std::sync::Arc;

use dirgraph_domain::constants::NEXT_LINK_FIELD;
use dirgraph_domain::{DirectoryError, ObjectType, Properties, Result};
use serde_json::Value;
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::factory::{DefaultObjectFactory, ObjectFactory};
use crate::object::DirectoryObject;
use crate::operation::{HttpMethod, OperationOptions};
use crate::paging::PagedResultReader;
use crate::ports::{ConfirmationPrompt, DecliningPrompt, HttpRequest, Transport};
use crate::subtypes::TypedObject;

/// Opaque bearer credential. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(Arc<str>);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(Arc::from(token.into()))
    }

    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

/// Immutable per-session context
pub struct DirectoryContext {
    base_url: String,
    tenant: String,
    token: AccessToken,
    next_link_field: String,
    transport: Arc<dyn Transport>,
    prompt: Arc<dyn ConfirmationPrompt>,
    factory: Arc<dyn ObjectFactory>,
}

impl fmt::Debug for DirectoryContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirectoryContext")
            .field("base_url", &self.base_url)
            .field("tenant", &self.tenant)
            .field("token", &self.token)
            .field("next_link_field", &self.next_link_field)
            .finish_non_exhaustive()
    }
}

impl DirectoryContext {
    pub fn builder() -> DirectoryContextBuilder {
        DirectoryContextBuilder::default()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn tenant(&self) -> &str {
        &self.tenant
    }

    pub fn token(&self) -> &AccessToken {
        &self.token
    }

    pub fn next_link_field(&self) -> &str {
        &self.next_link_field
    }

    pub fn prompt(&self) -> &dyn ConfirmationPrompt {
        self.prompt.as_ref()
    }

    /// `{base}/{tenant}`
    pub fn tenant_url(&self) -> String {
        format!("{}/{}", self.base_url, self.tenant)
    }

    /// `{base}/{tenant}/{type-plural}`
    pub fn collection_url(&self, object_type: ObjectType) -> String {
        format!("{}/{}", self.tenant_url(), object_type.plural_segment())
    }

    /// `{base}/{tenant}/{type-plural}/{id}`
    pub fn resource_url(&self, object_type: ObjectType, id: &str) -> String {
        format!("{}/{}", self.collection_url(object_type), id)
    }

    /// Resolve a continuation link. Absolute links are used verbatim,
    /// root-relative ones (`/contoso/users?...`) keep the service host and
    /// bare relative ones are taken relative to the tenant root.
    ///
    /// # Errors
    /// Returns `DirectoryError::InvalidInput` if the link cannot be joined.
    pub fn resolve_link(&self, link: &str) -> Result<String> {
        if link.starts_with("http://") || link.starts_with("https://") {
            return Ok(link.to_string());
        }

        let root = Url::parse(&format!("{}/", self.tenant_url())).map_err(|e| {
            DirectoryError::invalid_input(format!("invalid tenant URL {}: {e}", self.tenant_url()))
        })?;
        root.join(link)
            .map(String::from)
            .map_err(|e| DirectoryError::invalid_input(format!("invalid continuation link {link}: {e}")))
    }

    /// Send one request and relay the outcome.
    ///
    /// Attaches the bearer token, maps any non-2xx status to
    /// `DirectoryError::Http` and parses the body as JSON. Empty bodies and
    /// 204 responses yield `None`.
    ///
    /// # Errors
    /// `Transport` when no response arrived, `Http` for non-2xx statuses and
    /// `Serialization` for a success body that is not JSON.
    #[instrument(skip(self, options), fields(method = %options.method))]
    pub async fn send(&self, url: &str, options: OperationOptions) -> Result<Option<Value>> {
        let request = HttpRequest {
            method: options.method,
            url: url.to_string(),
            bearer_token: self.token.clone(),
            query: options.query,
            headers: options.headers,
            body: options.body,
        };

        debug!("sending directory request");
        let response = self.transport.execute(request).await?;

        if !response.is_success() {
            warn!(status = response.status, "directory request failed");
            return Err(DirectoryError::http(response.status, response.body));
        }

        if response.status == 204 || response.body.trim().is_empty() {
            debug!(status = response.status, "directory request returned no content");
            return Ok(None);
        }

        let value = serde_json::from_str(&response.body).map_err(|e| {
            DirectoryError::serialization(format!(
                "invalid JSON in {} response: {e}",
                response.status
            ))
        })?;
        debug!(status = response.status, "directory request succeeded");
        Ok(Some(value))
    }

    /// Build an object from a raw property bag through the configured factory.
    pub fn construct(self: &Arc<Self>, raw: Properties, hint: Option<ObjectType>) -> DirectoryObject {
        self.factory.construct(Arc::clone(self), raw, hint)
    }

    /// Wrap an already-known property bag. The type comes from its
    /// discriminator, or the generic fallback.
    pub fn object_from_properties(self: &Arc<Self>, properties: Properties) -> DirectoryObject {
        self.construct(properties, None)
    }

    /// Fetch a single object by type and id.
    ///
    /// # Errors
    /// Propagates request failures; `Serialization` if the body is not an object.
    #[instrument(skip(self))]
    pub async fn get_object(self: &Arc<Self>, object_type: ObjectType, id: &str) -> Result<DirectoryObject> {
        let url = self.resource_url(object_type, id);
        let body = self.send(&url, OperationOptions::new()).await?;
        let properties = expect_object(body, "fetched object")?;
        Ok(self.construct(properties, Some(object_type)))
    }

    /// Typed variant of [`Self::get_object`].
    ///
    /// # Errors
    /// As [`Self::get_object`], plus `TypeMismatch` if the service returns a
    /// different kind of object.
    pub async fn fetch<T: TypedObject>(self: &Arc<Self>, id: &str) -> Result<T> {
        let object = self.get_object(T::OBJECT_TYPE, id).await?;
        T::from_object(object)
    }

    /// Create an object and return it as the service echoes it back.
    ///
    /// # Errors
    /// Propagates request failures; `Serialization` if the body is not an object.
    #[instrument(skip(self, properties))]
    pub async fn create_object(
        self: &Arc<Self>,
        object_type: ObjectType,
        properties: Properties,
    ) -> Result<DirectoryObject> {
        let url = self.collection_url(object_type);
        let options = OperationOptions::new().method(HttpMethod::Post).body(Value::Object(properties));
        let body = self.send(&url, options).await?;
        let created = self.construct(expect_object(body, "created object")?, Some(object_type));
        info!(id = created.id().unwrap_or_default(), "directory object created");
        Ok(created)
    }

    /// List every object of a type, following continuation links.
    ///
    /// # Errors
    /// Propagates the first failing page request.
    #[instrument(skip(self))]
    pub async fn list_objects(self: &Arc<Self>, object_type: ObjectType) -> Result<Vec<DirectoryObject>> {
        let url = self.collection_url(object_type);
        let first_page = self.send(&url, OperationOptions::new()).await?;
        let entries = PagedResultReader::from_first_page(Arc::clone(self), first_page)?
            .collect_all()
            .await?;

        Ok(entries
            .into_iter()
            .filter_map(crate::factory::entry_properties)
            .map(|properties| self.construct(properties, Some(object_type)))
            .collect())
    }
}

fn expect_object(body: Option<Value>, what: &str) -> Result<Properties> {
    match body {
        Some(Value::Object(properties)) => Ok(properties),
        Some(other) => Err(DirectoryError::serialization(format!(
            "expected JSON object for {what}, got {other}"
        ))),
        None => Err(DirectoryError::serialization(format!("empty response for {what}"))),
    }
}

/// Builder for [`DirectoryContext`].
#[derive(Default)]
pub struct DirectoryContextBuilder {
    base_url: Option<String>,
    tenant: Option<String>,
    token: Option<AccessToken>,
    next_link_field: Option<String>,
    transport: Option<Arc<dyn Transport>>,
    prompt: Option<Arc<dyn ConfirmationPrompt>>,
    factory: Option<Arc<dyn ObjectFactory>>,
}

impl DirectoryContextBuilder {
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn tenant(mut self, tenant: impl Into<String>) -> Self {
        self.tenant = Some(tenant.into());
        self
    }

    pub fn token(mut self, token: AccessToken) -> Self {
        self.token = Some(token);
        self
    }

    pub fn next_link_field(mut self, field: impl Into<String>) -> Self {
        self.next_link_field = Some(field.into());
        self
    }

    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Defaults to [`DecliningPrompt`], so confirmed deletes never proceed
    /// unless a real prompt is wired.
    pub fn prompt(mut self, prompt: Arc<dyn ConfirmationPrompt>) -> Self {
        self.prompt = Some(prompt);
        self
    }

    /// Defaults to [`DefaultObjectFactory`].
    pub fn factory(mut self, factory: Arc<dyn ObjectFactory>) -> Self {
        self.factory = Some(factory);
        self
    }

    /// # Errors
    /// Returns `DirectoryError::Config` when base URL, tenant, token or
    /// transport is missing or empty.
    pub fn build(self) -> Result<Arc<DirectoryContext>> {
        let base_url = self
            .base_url
            .map(|url| url.trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .ok_or_else(|| DirectoryError::config("base URL is required"))?;
        let tenant = self
            .tenant
            .map(|tenant| tenant.trim_matches('/').to_string())
            .filter(|tenant| !tenant.is_empty())
            .ok_or_else(|| DirectoryError::config("tenant is required"))?;
        let token = self
            .token
            .filter(|token| !token.secret().is_empty())
            .ok_or_else(|| DirectoryError::config("access token is required"))?;
        let transport =
            self.transport.ok_or_else(|| DirectoryError::config("transport is required"))?;

        Ok(Arc::new(DirectoryContext {
            base_url,
            tenant,
            token,
            next_link_field: self.next_link_field.unwrap_or_else(|| NEXT_LINK_FIELD.to_string()),
            transport,
            prompt: self.prompt.unwrap_or_else(|| Arc::new(DecliningPrompt)),
            factory: self.factory.unwrap_or_else(|| Arc::new(DefaultObjectFactory)),
        }))
    }
}
