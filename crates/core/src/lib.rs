//! # dirgraph Core
//!
//! Directory object model over a REST graph API - no HTTP client code.
//!
//! This crate contains:
//! - The session context and its ports (transport, confirmation prompt,
//!   object factory)
//! - The generic directory object with CRUD, sync and relationship queries
//! - Typed views per object type and their capability traits
//! - The paged result reader
//!
//! ## Architecture Principles
//! - Only depends on `dirgraph-domain`
//! - All network I/O goes through the [`Transport`] port
//! - Pure, testable logic: tests drive everything through mock ports

pub mod context;
pub mod factory;
pub mod object;
pub mod operation;
pub mod paging;
pub mod ports;
pub mod subtypes;

pub use context::{AccessToken, DirectoryContext, DirectoryContextBuilder};
pub use factory::{filter_by_type, resolve_type, DefaultObjectFactory, ObjectFactory};
pub use object::{by_display_name, DeleteOutcome, DirectMemberships, DirectoryObject};
pub use operation::{HttpMethod, OperationOptions};
pub use paging::PagedResultReader;
pub use ports::{ConfirmationPrompt, DecliningPrompt, HttpRequest, HttpResponse, Transport};
pub use subtypes::{
    AnyObject, Application, Device, Group, HasMembers, HasOwners, ServicePrincipal, TypedObject,
    User,
};
