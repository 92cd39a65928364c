//! Directory object type tags
//!
//! Every directory entity carries one of these tags. The tag decides the
//! resource path segment and which typed view an object may be converted to.

use serde::{Deserialize, Serialize};

use crate::constants::{LEGACY_ODATA_TYPE_FIELD, ODATA_TYPE_FIELD};
use crate::impl_wire_name_conversions;
use crate::types::Properties;

/// Kind of directory entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ObjectType {
    User,
    Group,
    Application,
    ServicePrincipal,
    Device,
    /// Generic fallback for entries with no recognised discriminator.
    DirectoryObject,
}

impl_wire_name_conversions!(ObjectType {
    User => "user",
    Group => "group",
    Application => "application",
    ServicePrincipal => "servicePrincipal",
    Device => "device",
    DirectoryObject => "directoryObject",
});

/// Discriminator strings accepted for each type, current spelling first.
const DISCRIMINATORS: &[(&str, ObjectType)] = &[
    ("#microsoft.graph.user", ObjectType::User),
    ("#microsoft.graph.group", ObjectType::Group),
    ("#microsoft.graph.application", ObjectType::Application),
    ("#microsoft.graph.servicePrincipal", ObjectType::ServicePrincipal),
    ("#microsoft.graph.device", ObjectType::Device),
    ("#microsoft.graph.directoryObject", ObjectType::DirectoryObject),
    ("Microsoft.DirectoryServices.User", ObjectType::User),
    ("Microsoft.DirectoryServices.Group", ObjectType::Group),
    ("Microsoft.DirectoryServices.Application", ObjectType::Application),
    ("Microsoft.DirectoryServices.ServicePrincipal", ObjectType::ServicePrincipal),
    ("Microsoft.DirectoryServices.Device", ObjectType::Device),
    ("Microsoft.DirectoryServices.DirectoryObject", ObjectType::DirectoryObject),
];

impl ObjectType {
    /// All concrete (non-fallback) types.
    pub const CONCRETE: [ObjectType; 5] = [
        ObjectType::User,
        ObjectType::Group,
        ObjectType::Application,
        ObjectType::ServicePrincipal,
        ObjectType::Device,
    ];

    /// Collection segment used in resource paths.
    pub fn plural_segment(self) -> &'static str {
        match self {
            Self::User => "users",
            Self::Group => "groups",
            Self::Application => "applications",
            Self::ServicePrincipal => "servicePrincipals",
            Self::Device => "devices",
            Self::DirectoryObject => "directoryObjects",
        }
    }

    /// Canonical OData discriminator for this type.
    pub fn odata_type(self) -> &'static str {
        match self {
            Self::User => "#microsoft.graph.user",
            Self::Group => "#microsoft.graph.group",
            Self::Application => "#microsoft.graph.application",
            Self::ServicePrincipal => "#microsoft.graph.servicePrincipal",
            Self::Device => "#microsoft.graph.device",
            Self::DirectoryObject => "#microsoft.graph.directoryObject",
        }
    }

    /// Look up a discriminator in the fixed table. Unknown strings yield `None`.
    pub fn from_discriminator(discriminator: &str) -> Option<Self> {
        DISCRIMINATORS
            .iter()
            .find(|(name, _)| *name == discriminator)
            .map(|(_, object_type)| *object_type)
    }

    /// Read the discriminator carried by a raw entry, if any.
    pub fn discriminator_of(properties: &Properties) -> Option<&str> {
        properties
            .get(ODATA_TYPE_FIELD)
            .or_else(|| properties.get(LEGACY_ODATA_TYPE_FIELD))
            .and_then(|value| value.as_str())
    }

    /// Resolve the type declared by a raw entry's discriminator.
    pub fn declared_by(properties: &Properties) -> Option<Self> {
        Self::discriminator_of(properties).and_then(Self::from_discriminator)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn plural_segments_follow_resource_convention() {
        assert_eq!(ObjectType::User.plural_segment(), "users");
        assert_eq!(ObjectType::ServicePrincipal.plural_segment(), "servicePrincipals");
        assert_eq!(ObjectType::DirectoryObject.plural_segment(), "directoryObjects");
    }

    #[test]
    fn discriminator_table_round_trips_canonical_names() {
        for object_type in ObjectType::CONCRETE {
            assert_eq!(ObjectType::from_discriminator(object_type.odata_type()), Some(object_type));
        }
    }

    #[test]
    fn legacy_discriminators_resolve() {
        assert_eq!(
            ObjectType::from_discriminator("Microsoft.DirectoryServices.ServicePrincipal"),
            Some(ObjectType::ServicePrincipal)
        );
    }

    #[test]
    fn unknown_discriminator_is_none() {
        assert_eq!(ObjectType::from_discriminator("#microsoft.graph.directoryRole"), None);
        assert_eq!(ObjectType::from_discriminator("#Microsoft.Graph.User"), None);
    }

    #[test]
    fn declared_by_prefers_current_field() {
        let props = json!({
            "@odata.type": "#microsoft.graph.group",
            "odata.type": "Microsoft.DirectoryServices.User"
        });
        let props = props.as_object().unwrap();
        assert_eq!(ObjectType::declared_by(props), Some(ObjectType::Group));
    }

    #[test]
    fn declared_by_reads_legacy_field() {
        let props = json!({ "odata.type": "Microsoft.DirectoryServices.Device" });
        assert_eq!(ObjectType::declared_by(props.as_object().unwrap()), Some(ObjectType::Device));
    }

    #[test]
    fn wire_names_are_camel_case() {
        assert_eq!(ObjectType::ServicePrincipal.to_string(), "servicePrincipal");
        assert_eq!("serviceprincipal".parse::<ObjectType>().unwrap(), ObjectType::ServicePrincipal);
        assert_eq!(serde_json::to_value(ObjectType::DirectoryObject).unwrap(), "directoryObject");
    }
}
