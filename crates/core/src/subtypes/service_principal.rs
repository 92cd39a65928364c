use dirgraph_domain::ObjectType;

use super::capabilities::HasOwners;

directory_view! {
    /// Tenant-local instance of an application
    ServicePrincipal => ObjectType::ServicePrincipal
}

impl ServicePrincipal {
    pub fn app_id(&self) -> Option<&str> {
        self.as_string("appId")
    }

    pub fn service_principal_names(&self) -> Vec<&str> {
        self.as_string_list("servicePrincipalNames")
    }

    pub fn account_enabled(&self) -> Option<bool> {
        self.as_bool("accountEnabled")
    }
}

impl HasOwners for ServicePrincipal {}
