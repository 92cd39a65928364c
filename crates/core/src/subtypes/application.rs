use dirgraph_domain::ObjectType;

use super::capabilities::HasOwners;

directory_view! {
    /// Application registration
    Application => ObjectType::Application
}

impl Application {
    /// Client id shared with the application's service principals.
    pub fn app_id(&self) -> Option<&str> {
        self.as_string("appId")
    }

    pub fn identifier_uris(&self) -> Vec<&str> {
        self.as_string_list("identifierUris")
    }
}

impl HasOwners for Application {}
