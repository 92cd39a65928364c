//! Directory object: identity, property bag and the generic operation primitive
//!
//! Every entity (user, group, application, service principal, device, or the
//! generic fallback) is one [`DirectoryObject`] with a type tag. All network
//! I/O goes through [`DirectoryObject::do_operation`], so CRUD and the
//! relationship queries in [`memberships`] work for every tag. Typed views in
//! `crate::subtypes` add the per-type fields and capabilities.
//!
//! Deleting an object does not mark the local handle; using it afterwards is
//! the caller's responsibility.

pub mod memberships;

use std::fmt;
use std::sync::Arc;

use dirgraph_domain::constants::ODATA_ID_FIELD;
use dirgraph_domain::{
    merge_properties, DirectoryError, ObjectType, Properties, PropertyBagExt, Result,
};
use serde_json::{json, Value};
use tracing::{debug, info, instrument};

pub use memberships::{by_display_name, DirectMemberships};

use crate::context::DirectoryContext;
use crate::operation::{HttpMethod, OperationOptions};

/// Outcome of [`DirectoryObject::delete`]
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// The user declined the confirmation prompt; nothing was sent.
    Declined,
}

/// A directory entity bound to its session context
#[derive(Clone)]
pub struct DirectoryObject {
    context: Arc<DirectoryContext>,
    object_type: ObjectType,
    properties: Properties,
}

impl fmt::Debug for DirectoryObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirectoryObject")
            .field("object_type", &self.object_type)
            .field("tenant", &self.context.tenant())
            .field("properties", &self.properties)
            .finish()
    }
}

impl AsRef<DirectoryObject> for DirectoryObject {
    fn as_ref(&self) -> &DirectoryObject {
        self
    }
}

impl DirectoryObject {
    /// The tag is fixed here and only here: by the factory or a typed view.
    pub(crate) fn new(
        context: Arc<DirectoryContext>,
        object_type: ObjectType,
        properties: Properties,
    ) -> Self {
        Self { context, object_type, properties }
    }

    pub fn context(&self) -> &Arc<DirectoryContext> {
        &self.context
    }

    pub fn tenant(&self) -> &str {
        self.context.tenant()
    }

    pub fn object_type(&self) -> ObjectType {
        self.object_type
    }

    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    pub fn into_properties(self) -> Properties {
        self.properties
    }

    /// Stable remote identifier (`properties["id"]`).
    pub fn id(&self) -> Option<&str> {
        self.properties.id()
    }

    pub fn display_name(&self) -> Option<&str> {
        self.properties.display_name()
    }

    pub fn as_string(&self, key: &str) -> Option<&str> {
        self.properties.as_string(key)
    }

    pub fn as_bool(&self, key: &str) -> Option<bool> {
        self.properties.as_bool(key)
    }

    pub fn as_string_list(&self, key: &str) -> Vec<&str> {
        self.properties.as_string_list(key)
    }

    fn require_id(&self) -> Result<&str> {
        self.id().ok_or_else(|| {
            DirectoryError::invalid_input(format!(
                "{} has no id; it does not refer to a persisted object",
                self.object_type
            ))
        })
    }

    /// `{base}/{tenant}/{type-plural}/{id}`
    ///
    /// # Errors
    /// Returns `DirectoryError::InvalidInput` if the object has no id.
    pub fn resource_url(&self) -> Result<String> {
        Ok(self.context.resource_url(self.object_type, self.require_id()?))
    }

    /// Resource URL with an optional operation suffix.
    ///
    /// # Errors
    /// Returns `DirectoryError::InvalidInput` if the object has no id.
    pub fn operation_url(&self, operation_path: &str) -> Result<String> {
        let resource = self.resource_url()?;
        let suffix = operation_path.trim_matches('/');
        if suffix.is_empty() {
            Ok(resource)
        } else {
            Ok(format!("{resource}/{suffix}"))
        }
    }

    /// Generic operation primitive.
    ///
    /// Sends `options` to this object's resource path plus `operation_path`
    /// and returns the parsed JSON body, or `None` for empty responses. Never
    /// retries and never touches local state.
    ///
    /// # Errors
    /// `InvalidInput` without an id; otherwise whatever the request yields
    /// (`Transport`, `Http { status, body }`, `Serialization`).
    pub async fn do_operation(
        &self,
        operation_path: &str,
        options: OperationOptions,
    ) -> Result<Option<Value>> {
        let url = self.operation_url(operation_path)?;
        self.context.send(&url, options).await
    }

    /// Merge `properties` into the local bag and PATCH the merged bag.
    ///
    /// Local state changes only after the service accepts the write.
    ///
    /// # Errors
    /// Propagates the request failure with local properties unchanged.
    #[instrument(skip_all, fields(object_type = %self.object_type, id = self.id().unwrap_or_default()))]
    pub async fn update(&mut self, properties: Properties) -> Result<()> {
        let merged = merge_properties(&self.properties, properties);
        let options =
            OperationOptions::new().method(HttpMethod::Patch).body(Value::Object(merged.clone()));

        self.do_operation("", options).await?;
        self.properties = merged;
        info!("directory object updated");
        Ok(())
    }

    /// Delete the remote object, asking for confirmation first when
    /// `confirm` is set.
    ///
    /// # Errors
    /// Propagates prompt and request failures. A declined prompt is not an
    /// error: it returns [`DeleteOutcome::Declined`] without any request.
    #[instrument(skip_all, fields(object_type = %self.object_type, id = self.id().unwrap_or_default()))]
    pub async fn delete(&self, confirm: bool) -> Result<DeleteOutcome> {
        let id = self.require_id()?;

        if confirm {
            let label = self.display_name().unwrap_or(id);
            let message = format!("Delete {} '{}' ({})?", self.object_type, label, id);
            if !self.context.prompt().confirm(&message)? {
                info!("deletion declined");
                return Ok(DeleteOutcome::Declined);
            }
        }

        self.do_operation("", OperationOptions::new().method(HttpMethod::Delete)).await?;
        info!("directory object deleted");
        Ok(DeleteOutcome::Deleted)
    }

    /// Re-fetch the object and replace the local bag with the service's view.
    ///
    /// # Errors
    /// Propagates the request failure; `Serialization` when the body is not
    /// an object. Local state is unchanged on error.
    #[instrument(skip_all, fields(object_type = %self.object_type, id = self.id().unwrap_or_default()))]
    pub async fn sync_fields(&mut self) -> Result<()> {
        match self.do_operation("", OperationOptions::new()).await? {
            Some(Value::Object(properties)) => {
                debug!(fields = properties.len(), "directory object synchronised");
                self.properties = properties;
                Ok(())
            }
            Some(other) => Err(DirectoryError::serialization(format!(
                "expected JSON object when syncing {}, got {other}",
                self.object_type
            ))),
            None => Err(DirectoryError::serialization(format!(
                "empty response when syncing {}",
                self.object_type
            ))),
        }
    }

    /// Add `target_id` to a reference collection such as `members` or `owners`.
    ///
    /// # Errors
    /// Propagates the request failure.
    pub async fn add_reference(&self, relation: &str, target_id: &str) -> Result<()> {
        let target = format!(
            "{}/{}",
            self.context.collection_url(ObjectType::DirectoryObject),
            target_id
        );
        let options = OperationOptions::new()
            .method(HttpMethod::Post)
            .body(json!({ ODATA_ID_FIELD: target }));
        self.do_operation(&format!("{}/$ref", relation.trim_matches('/')), options).await?;
        info!(relation, target_id, "reference added");
        Ok(())
    }

    /// Remove `target_id` from a reference collection.
    ///
    /// # Errors
    /// Propagates the request failure.
    pub async fn remove_reference(&self, relation: &str, target_id: &str) -> Result<()> {
        let path = format!("{}/{}/$ref", relation.trim_matches('/'), target_id);
        self.do_operation(&path, OperationOptions::new().method(HttpMethod::Delete)).await?;
        info!(relation, target_id, "reference removed");
        Ok(())
    }
}
