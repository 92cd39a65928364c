//! Per-type relationship operations

use async_trait::async_trait;
use dirgraph_domain::{ObjectType, Result};

use super::TypedObject;
use crate::object::DirectoryObject;

/// Types with an owners collection
#[async_trait]
pub trait HasOwners: TypedObject {
    /// Relation segment holding the owner references.
    const OWNERS_RELATION: &'static str = "owners";

    /// # Errors
    /// Propagates the first failing request.
    async fn list_owners(&self, types: Option<&[ObjectType]>) -> Result<Vec<DirectoryObject>> {
        self.object().list_related(Self::OWNERS_RELATION, types).await
    }

    /// # Errors
    /// Propagates the request failure.
    async fn add_owner(&self, owner_id: &str) -> Result<()> {
        self.object().add_reference(Self::OWNERS_RELATION, owner_id).await
    }

    /// # Errors
    /// Propagates the request failure.
    async fn remove_owner(&self, owner_id: &str) -> Result<()> {
        self.object().remove_reference(Self::OWNERS_RELATION, owner_id).await
    }
}

/// Types with a members collection
#[async_trait]
pub trait HasMembers: TypedObject {
    /// Direct members, optionally narrowed to `types`.
    ///
    /// # Errors
    /// Propagates the first failing request.
    async fn list_members(&self, types: Option<&[ObjectType]>) -> Result<Vec<DirectoryObject>> {
        self.object().list_related("members", types).await
    }

    /// # Errors
    /// Propagates the request failure.
    async fn add_member(&self, member_id: &str) -> Result<()> {
        self.object().add_reference("members", member_id).await
    }

    /// # Errors
    /// Propagates the request failure.
    async fn remove_member(&self, member_id: &str) -> Result<()> {
        self.object().remove_reference("members", member_id).await
    }
}
