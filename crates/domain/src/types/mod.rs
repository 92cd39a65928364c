//! Directory data types
//!
//! - `object_type`: type tags and the discriminator lookup table
//! - `properties`: the schema-less property bag and its typed accessors

pub mod object_type;
pub mod properties;

pub use object_type::ObjectType;
pub use properties::{merge_properties, Properties, PropertyBagExt};
