//! Active Directory user.

use std::fmt;

use ldap3::ldap_escape;
use serde::{Deserialize, Deserializer, Serialize};
use validator::{Validate, ValidateEmail, ValidationError};

use crate::attributes::{self, DirectoryAttributeSet};
use crate::directory::SearchRequest;
use crate::dn::{self, Dn};
use crate::resource::{Attribute, Resource, Schema};

/// `sAMAccountName` is limited to 20 characters.
pub const MAX_LOGON_NAME_LENGTH: u64 = 20;

/// Characters Active Directory refuses on `sAMAccountName`.
const FORBIDDEN_LOGON_CHARACTERS: &[char] = &[
    '"', '/', '\\', '[', ']', ':', ';', '|', '=', ',', '+', '*', '?', '<', '>',
];

fn validate_logon_name(logon_name: &str) -> Result<(), ValidationError> {
    if logon_name.contains(FORBIDDEN_LOGON_CHARACTERS)
        || logon_name.chars().any(char::is_control)
        || logon_name.ends_with('.')
    {
        return Err(ValidationError::new("logon_name"));
    }

    Ok(())
}

fn validate_domain(domain: &str) -> Result<(), ValidationError> {
    let valid_label = |label: &str| {
        !label.is_empty()
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    };

    if !domain.split('.').all(valid_label) {
        return Err(ValidationError::new("domain"));
    }

    Ok(())
}

fn validate_ou(ou: &str) -> Result<(), ValidationError> {
    // Either unset or made of `attribute=value` components.
    if !ou.is_empty() && !ou.contains('=') {
        return Err(ValidationError::new("ou_distinguished_name"));
    }

    Ok(())
}

fn validate_email(email: &str) -> Result<(), ValidationError> {
    if !email.is_empty() && !email.validate_email() {
        return Err(ValidationError::new("email"));
    }

    Ok(())
}

/// Optional values set to `""` are unset.
fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.filter(|value| !value.is_empty()))
}

/// Desired state of a directory user.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct UserSpec {
    #[validate(length(min = 1, message = "First name is required."))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name is required."))]
    pub last_name: String,
    #[validate(custom(
        function = "validate_domain",
        message = "Domain must be made of dot-separated DNS labels."
    ))]
    pub domain: String,
    #[validate(
        length(
            min = 1,
            max = MAX_LOGON_NAME_LENGTH,
            message = "Logon name must contain between 1 and 20 characters."
        ),
        custom(
            function = "validate_logon_name",
            message = "Logon name contains forbidden characters."
        )
    )]
    pub logon_name: String,
    #[serde(skip_serializing)]
    #[validate(length(min = 1, message = "Password is required."))]
    pub password: String,
    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(custom(
        function = "validate_ou",
        message = "Organizational unit must be a distinguished name."
    ))]
    pub ou_distinguished_name: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(custom(function = "validate_email", message = "Email must be formatted."))]
    pub email: Option<String>,
}

impl fmt::Debug for UserSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserSpec")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("domain", &self.domain)
            .field("logon_name", &self.logon_name)
            .field("password", &"<redacted>")
            .field("ou_distinguished_name", &self.ou_distinguished_name)
            .field("email", &self.email)
            .finish()
    }
}

impl UserSpec {
    /// `<first name> <last name>`, also the `cn` of the entry.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// `<logon name>@<domain>`.
    pub fn principal_name(&self) -> String {
        format!("{}@{}", self.logon_name, self.domain)
    }

    pub fn ou(&self) -> Option<&str> {
        self.ou_distinguished_name
            .as_deref()
            .filter(|ou| !ou.is_empty())
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref().filter(|email| !email.is_empty())
    }
}

impl Resource for UserSpec {
    const KIND: &'static str = "ad_user";

    fn schema() -> Schema {
        Schema::new()
            .with_attribute(
                Attribute::required_string("first_name")
                    .description("Given name of the user.")
                    .force_new(),
            )
            .with_attribute(
                Attribute::required_string("last_name")
                    .description("Surname of the user.")
                    .force_new(),
            )
            .with_attribute(
                Attribute::required_string("domain")
                    .description("Domain the user belongs to, e.g. `example.com`.")
                    .force_new(),
            )
            .with_attribute(
                Attribute::required_string("logon_name")
                    .description("Pre-Windows 2000 logon name.")
                    .force_new(),
            )
            .with_attribute(
                Attribute::required_string("password")
                    .description("Initial password.")
                    .sensitive()
                    .force_new(),
            )
            .with_attribute(
                Attribute::optional_string("ou_distinguished_name")
                    .description("Organizational unit holding the user, `CN=Users` otherwise.")
                    .force_new(),
            )
            .with_attribute(
                Attribute::optional_string("email")
                    .description("Mail address of the user.")
                    .force_new(),
            )
    }

    fn id(&self) -> String {
        format!("{}/{}", self.domain, self.full_name())
    }

    fn name(&self) -> String {
        self.full_name()
    }

    fn dn(&self) -> Dn {
        dn::user_dn(&self.full_name(), &self.domain, self.ou())
    }

    fn attributes(&self) -> DirectoryAttributeSet {
        attributes::map_attributes(self)
    }

    fn existence_query(&self) -> SearchRequest {
        let filter = format!(
            "(&(objectClass=User)(cn={}))",
            ldap_escape(self.full_name())
        );

        SearchRequest::subtree(dn::users_base(&self.domain, self.ou()), filter)
            .attributes(["dn", "cn"])
    }
}
