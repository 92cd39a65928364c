use dirgraph_domain::{ObjectType, Result};

use super::capabilities::HasOwners;
use crate::object::DirectoryObject;

directory_view! {
    /// Registered or joined device
    Device => ObjectType::Device
}

impl Device {
    /// Hardware id; distinct from the directory object id.
    pub fn device_id(&self) -> Option<&str> {
        self.as_string("deviceId")
    }

    pub fn operating_system(&self) -> Option<&str> {
        self.as_string("operatingSystem")
    }

    pub fn operating_system_version(&self) -> Option<&str> {
        self.as_string("operatingSystemVersion")
    }

    pub fn account_enabled(&self) -> Option<bool> {
        self.as_bool("accountEnabled")
    }

    /// Users the device is registered to, optionally narrowed to `types`.
    ///
    /// # Errors
    /// Propagates the first failing request.
    pub async fn list_registered_users(
        &self,
        types: Option<&[ObjectType]>,
    ) -> Result<Vec<DirectoryObject>> {
        self.list_related("registeredUsers", types).await
    }
}

impl HasOwners for Device {
    const OWNERS_RELATION: &'static str = "registeredOwners";
}
