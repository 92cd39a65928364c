use dirgraph_domain::ObjectType;

directory_view! {
    /// Directory user account
    User => ObjectType::User
}

impl User {
    pub fn user_principal_name(&self) -> Option<&str> {
        self.as_string("userPrincipalName")
    }

    pub fn mail(&self) -> Option<&str> {
        self.as_string("mail")
    }

    pub fn account_enabled(&self) -> Option<bool> {
        self.as_bool("accountEnabled")
    }

    /// Alternate addresses, empty when the service omitted them.
    pub fn other_mails(&self) -> Vec<&str> {
        self.as_string_list("otherMails")
    }
}
