//! Protocol constants
//!
//! Field names and defaults shared by the object model and its adapters.

// Service defaults
pub const DEFAULT_BASE_URL: &str = "https://graph.windows.net";
pub const DEFAULT_USER_AGENT: &str = concat!("dirgraph/", env!("CARGO_PKG_VERSION"));

// Paged responses
pub const VALUE_FIELD: &str = "value";
pub const NEXT_LINK_FIELD: &str = "@odata.nextLink";
pub const LEGACY_NEXT_LINK_FIELD: &str = "odata.nextLink";

// Type discriminators, checked in order
pub const ODATA_TYPE_FIELD: &str = "@odata.type";
pub const LEGACY_ODATA_TYPE_FIELD: &str = "odata.type";

// Well-known properties
pub const ID_PROPERTY: &str = "id";
pub const DISPLAY_NAME_PROPERTY: &str = "displayName";
pub const ODATA_ID_FIELD: &str = "@odata.id";
