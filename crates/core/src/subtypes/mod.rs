//! Typed views over [`DirectoryObject`]
//!
//! A view is a newtype that guarantees the object's tag. It derefs to the
//! underlying object for reads and the relationship queries, and forwards
//! the mutating calls so the tag can never be swapped out. Per-type fields
//! are typed accessors over the property bag; per-type operations are
//! capability traits (`HasOwners`, `HasMembers`).

use dirgraph_domain::{DirectoryError, ObjectType, Result};

use crate::object::DirectoryObject;

/// Object whose type tag is fixed at compile time
pub trait TypedObject: Sized + AsRef<DirectoryObject> + Send + Sync {
    const OBJECT_TYPE: ObjectType;

    /// # Errors
    /// Returns `DirectoryError::TypeMismatch` when the tag differs.
    fn from_object(object: DirectoryObject) -> Result<Self>;

    fn object(&self) -> &DirectoryObject;

    fn into_object(self) -> DirectoryObject;
}

macro_rules! directory_view {
    ($(#[$meta:meta])* $name:ident => $object_type:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $name(pub(super) $crate::object::DirectoryObject);

        impl $name {
            /// Wrap an already-known property bag as this type.
            pub fn from_properties(
                context: std::sync::Arc<$crate::context::DirectoryContext>,
                properties: dirgraph_domain::Properties,
            ) -> Self {
                Self($crate::object::DirectoryObject::new(context, $object_type, properties))
            }

            /// See [`DirectoryObject::update`](crate::object::DirectoryObject::update).
            ///
            /// # Errors
            /// Propagates the request failure with local properties unchanged.
            pub async fn update(
                &mut self,
                properties: dirgraph_domain::Properties,
            ) -> dirgraph_domain::Result<()> {
                self.0.update(properties).await
            }

            /// See [`DirectoryObject::sync_fields`](crate::object::DirectoryObject::sync_fields).
            ///
            /// # Errors
            /// Propagates the request failure with local properties unchanged.
            pub async fn sync_fields(&mut self) -> dirgraph_domain::Result<()> {
                self.0.sync_fields().await
            }
        }

        impl $crate::subtypes::TypedObject for $name {
            const OBJECT_TYPE: dirgraph_domain::ObjectType = $object_type;

            fn from_object(
                object: $crate::object::DirectoryObject,
            ) -> dirgraph_domain::Result<Self> {
                if object.object_type() == $object_type {
                    Ok(Self(object))
                } else {
                    Err($crate::subtypes::mismatch($object_type, object.object_type()))
                }
            }

            fn object(&self) -> &$crate::object::DirectoryObject {
                &self.0
            }

            fn into_object(self) -> $crate::object::DirectoryObject {
                self.0
            }
        }

        impl TryFrom<$crate::object::DirectoryObject> for $name {
            type Error = dirgraph_domain::DirectoryError;

            fn try_from(object: $crate::object::DirectoryObject) -> dirgraph_domain::Result<Self> {
                <Self as $crate::subtypes::TypedObject>::from_object(object)
            }
        }

        impl From<$name> for $crate::object::DirectoryObject {
            fn from(view: $name) -> Self {
                view.0
            }
        }

        impl AsRef<$crate::object::DirectoryObject> for $name {
            fn as_ref(&self) -> &$crate::object::DirectoryObject {
                &self.0
            }
        }

        impl std::ops::Deref for $name {
            type Target = $crate::object::DirectoryObject;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }
    };
}

pub mod application;
pub mod capabilities;
pub mod device;
pub mod group;
pub mod service_principal;
pub mod user;

pub use application::Application;
pub use capabilities::{HasMembers, HasOwners};
pub use device::Device;
pub use group::Group;
pub use service_principal::ServicePrincipal;
pub use user::User;

/// Any object, dispatched on its tag
#[derive(Debug, Clone)]
pub enum AnyObject {
    User(User),
    Group(Group),
    Application(Application),
    ServicePrincipal(ServicePrincipal),
    Device(Device),
    Other(DirectoryObject),
}

impl From<DirectoryObject> for AnyObject {
    fn from(object: DirectoryObject) -> Self {
        match object.object_type() {
            ObjectType::User => Self::User(User(object)),
            ObjectType::Group => Self::Group(Group(object)),
            ObjectType::Application => Self::Application(Application(object)),
            ObjectType::ServicePrincipal => Self::ServicePrincipal(ServicePrincipal(object)),
            ObjectType::Device => Self::Device(Device(object)),
            ObjectType::DirectoryObject => Self::Other(object),
        }
    }
}

impl AsRef<DirectoryObject> for AnyObject {
    fn as_ref(&self) -> &DirectoryObject {
        match self {
            Self::User(view) => view.as_ref(),
            Self::Group(view) => view.as_ref(),
            Self::Application(view) => view.as_ref(),
            Self::ServicePrincipal(view) => view.as_ref(),
            Self::Device(view) => view.as_ref(),
            Self::Other(object) => object,
        }
    }
}

/// Reject a conversion with the tags involved.
pub(crate) fn mismatch(expected: ObjectType, found: ObjectType) -> DirectoryError {
    DirectoryError::TypeMismatch { expected: expected.to_string(), found: found.to_string() }
}
