//! Membership and ownership queries
//!
//! Every query follows the same template: fetch the first page through
//! [`DirectoryObject::do_operation`], drain it with the
//! [`PagedResultReader`], then either return bare ids (transitive membership
//! endpoints) or narrow by type and run each entry through the object
//! factory (object endpoints). Results are built fresh on every call; nothing
//! is cached because the remote graph can change between queries.

use std::collections::BTreeMap;
use std::sync::Arc;

use dirgraph_domain::{ObjectType, Properties, Result};
use serde_json::{json, Value};
use tracing::{debug, instrument};

use super::DirectoryObject;
use crate::factory::{entry_properties, filter_by_type};
use crate::operation::{HttpMethod, OperationOptions};
use crate::paging::PagedResultReader;
use crate::subtypes::{Device, Group, TypedObject};

/// Result of [`DirectoryObject::list_direct_memberships`]
#[derive(Debug, Clone)]
pub enum DirectMemberships {
    /// Group ids in service order.
    Ids(Vec<String>),
    /// Groups keyed by display name (id when the name is missing). Groups
    /// sharing a name stay together under one key, in service order.
    Groups(BTreeMap<String, Vec<Group>>),
}

impl DirectMemberships {
    /// Number of memberships held, counting every group under a shared name.
    pub fn len(&self) -> usize {
        match self {
            Self::Ids(ids) => ids.len(),
            Self::Groups(groups) => groups.values().map(Vec::len).sum(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Member group ids, whichever form was requested.
    pub fn ids(&self) -> Vec<&str> {
        match self {
            Self::Ids(ids) => ids.iter().map(String::as_str).collect(),
            Self::Groups(groups) => groups.values().flatten().filter_map(|group| group.id()).collect(),
        }
    }
}

/// Group objects by display name, falling back to the id.
///
/// Every object is kept: objects sharing a name land in the same bucket in
/// iteration order.
pub fn by_display_name<T: AsRef<DirectoryObject>>(
    objects: impl IntoIterator<Item = T>,
) -> BTreeMap<String, Vec<T>> {
    let mut keyed: BTreeMap<String, Vec<T>> = BTreeMap::new();
    for object in objects {
        let inner = object.as_ref();
        let key = inner.display_name().or_else(|| inner.id()).unwrap_or_default().to_string();
        keyed.entry(key).or_default().push(object);
    }
    keyed
}

/// Ids from an ids-only response: bare strings or stubs carrying `id`.
fn entry_ids(entries: Vec<Value>) -> Vec<String> {
    entries
        .into_iter()
        .filter_map(|entry| match entry {
            Value::String(id) => Some(id),
            Value::Object(stub) => stub.get("id").and_then(Value::as_str).map(str::to_string),
            _ => None,
        })
        .collect()
}

/// Entry has no discriminator, or one that resolves to `object_type`.
fn untyped_or(properties: &Properties, object_type: ObjectType) -> bool {
    ObjectType::discriminator_of(properties).is_none()
        || ObjectType::declared_by(properties) == Some(object_type)
}

impl DirectoryObject {
    /// Fetch a relation and drain every page into raw entries.
    async fn drain_relation(&self, relation: &str, options: OperationOptions) -> Result<Vec<Value>> {
        let first_page = self.do_operation(relation, options).await?;
        let entries = PagedResultReader::from_first_page(Arc::clone(self.context()), first_page)?
            .collect_all()
            .await?;
        debug!(relation, entries = entries.len(), "relation drained");
        Ok(entries)
    }

    /// Narrow by type (when asked), then construct each surviving entry.
    fn construct_entries(
        &self,
        entries: Vec<Value>,
        types: Option<&[ObjectType]>,
        hint: Option<ObjectType>,
    ) -> Vec<DirectoryObject> {
        let entries = match types {
            Some(wanted) => filter_by_type(entries, wanted),
            None => entries,
        };

        entries
            .into_iter()
            .filter_map(entry_properties)
            .map(|properties| self.context().construct(properties, hint))
            .collect()
    }

    /// Construct the entries that can be `T`, as `T`.
    fn construct_typed<T: TypedObject>(&self, entries: Vec<Value>) -> Result<Vec<T>> {
        entries
            .into_iter()
            .filter_map(entry_properties)
            .filter(|properties| untyped_or(properties, T::OBJECT_TYPE))
            .map(|properties| T::from_object(self.context().construct(properties, Some(T::OBJECT_TYPE))))
            .collect()
    }

    /// Objects in a relation collection such as `members` or `owners`.
    ///
    /// # Errors
    /// Propagates the first failing request.
    #[instrument(skip(self, types), fields(object_type = %self.object_type(), id = self.id().unwrap_or_default()))]
    pub async fn list_related(
        &self,
        relation: &str,
        types: Option<&[ObjectType]>,
    ) -> Result<Vec<DirectoryObject>> {
        let entries = self.drain_relation(relation, OperationOptions::new()).await?;
        Ok(self.construct_entries(entries, types, None))
    }

    async fn list_member_ids(&self, action: &str, security_enabled_only: bool) -> Result<Vec<String>> {
        let options = OperationOptions::new()
            .method(HttpMethod::Post)
            .body(json!({ "securityEnabledOnly": security_enabled_only }));
        let entries = self.drain_relation(action, options).await?;
        Ok(entry_ids(entries))
    }

    /// Ids of every group this object belongs to, transitively.
    ///
    /// # Errors
    /// Propagates the first failing request.
    pub async fn list_group_memberships(&self, security_enabled_only: bool) -> Result<Vec<String>> {
        self.list_member_ids("getMemberGroups", security_enabled_only).await
    }

    /// Ids of every group and directory role this object belongs to,
    /// transitively.
    ///
    /// # Errors
    /// Propagates the first failing request.
    pub async fn list_object_memberships(&self, security_enabled_only: bool) -> Result<Vec<String>> {
        self.list_member_ids("getMemberObjects", security_enabled_only).await
    }

    /// Groups this object is a direct member of.
    ///
    /// With `id_only` the ids come straight from the response. Otherwise each
    /// group entry becomes a [`Group`] built from the embedded properties,
    /// with no further requests.
    ///
    /// The two forms can report different counts for the same object:
    /// `id_only` lists every entry, including directory roles and other
    /// non-group memberships, while the typed form skips those entries.
    ///
    /// # Errors
    /// Propagates the first failing request.
    #[instrument(skip(self), fields(object_type = %self.object_type(), id = self.id().unwrap_or_default()))]
    pub async fn list_direct_memberships(&self, id_only: bool) -> Result<DirectMemberships> {
        let entries = self.drain_relation("memberOf", OperationOptions::new()).await?;

        if id_only {
            return Ok(DirectMemberships::Ids(entry_ids(entries)));
        }

        let groups = self.construct_typed::<Group>(entries)?;
        Ok(DirectMemberships::Groups(by_display_name(groups)))
    }

    /// Objects this object owns, optionally narrowed to `types`.
    ///
    /// # Errors
    /// Propagates the first failing request.
    pub async fn list_owned_objects(
        &self,
        types: Option<&[ObjectType]>,
    ) -> Result<Vec<DirectoryObject>> {
        self.list_related("ownedObjects", types).await
    }

    /// Objects this object created, optionally narrowed to `types`.
    ///
    /// # Errors
    /// Propagates the first failing request.
    pub async fn list_created_objects(
        &self,
        types: Option<&[ObjectType]>,
    ) -> Result<Vec<DirectoryObject>> {
        self.list_related("createdObjects", types).await
    }

    /// Devices this object owns.
    ///
    /// # Errors
    /// Propagates the first failing request.
    pub async fn list_owned_devices(&self) -> Result<Vec<Device>> {
        let entries = self.drain_relation("ownedDevices", OperationOptions::new()).await?;
        self.construct_typed(entries)
    }

    /// Devices registered to this object.
    ///
    /// # Errors
    /// Propagates the first failing request.
    pub async fn list_registered_devices(&self) -> Result<Vec<Device>> {
        let entries = self.drain_relation("registeredDevices", OperationOptions::new()).await?;
        self.construct_typed(entries)
    }
}
