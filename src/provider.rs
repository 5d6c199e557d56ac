//! Resource kinds served by the provider.

use std::collections::BTreeMap;

use crate::resource::user::UserSpec;
use crate::resource::{Attribute, Resource, Schema};

/// Name of the provider, prefix of every resource kind.
pub const NAME: &str = "ad";

/// Schemas of every resource kind, by kind name.
pub fn resources() -> BTreeMap<&'static str, Schema> {
    BTreeMap::from([(UserSpec::KIND, UserSpec::schema())])
}

/// Schema of the provider block itself.
pub fn config_schema() -> Schema {
    Schema::new()
        .with_attribute(
            Attribute::required_string("url")
                .description("Directory URL, `ldaps://` is assumed for bare hosts."),
        )
        .with_attribute(
            Attribute::required_string("domain").description("Domain managed by the provider."),
        )
        .with_attribute(Attribute::optional_string("user").description("Bind user."))
        .with_attribute(
            Attribute::optional_string("password")
                .description("Password of the bind user.")
                .sensitive(),
        )
}
