use dirgraph_domain::ObjectType;

use super::capabilities::{HasMembers, HasOwners};

directory_view! {
    /// Security or mail-enabled group
    Group => ObjectType::Group
}

impl Group {
    pub fn mail_nickname(&self) -> Option<&str> {
        self.as_string("mailNickname")
    }

    pub fn security_enabled(&self) -> Option<bool> {
        self.as_bool("securityEnabled")
    }

    pub fn mail_enabled(&self) -> Option<bool> {
        self.as_bool("mailEnabled")
    }

    /// `groupTypes`, e.g. `Unified` for Microsoft 365 groups.
    pub fn group_types(&self) -> Vec<&str> {
        self.as_string_list("groupTypes")
    }
}

impl HasOwners for Group {}

impl HasMembers for Group {}
