//! Managed resource kinds.

pub mod user;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::attributes::DirectoryAttributeSet;
use crate::directory::SearchRequest;
use crate::dn::Dn;

/// A kind of directory entry the provider manages.
///
/// Every field of a resource forces replacement: a resource is created,
/// read and destroyed, never updated in place.
pub trait Resource: Validate + Send + Sync {
    /// Name of the kind, as declared by users, e.g. `ad_user`.
    const KIND: &'static str;

    /// Attributes accepted by this kind.
    fn schema() -> Schema;

    /// Identifier handed back to the host once the entry exists.
    fn id(&self) -> String;

    /// Human readable name, used on errors and logs.
    fn name(&self) -> String;

    /// Address of the entry.
    fn dn(&self) -> Dn;

    /// Attributes of the entry to add.
    fn attributes(&self) -> DirectoryAttributeSet;

    /// Search matching the entry when it exists.
    fn existence_query(&self) -> SearchRequest;
}

/// Known state of a resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum ResourceState {
    #[default]
    Absent,
    Present { id: String },
}

impl ResourceState {
    pub fn present(id: impl Into<String>) -> Self {
        Self::Present { id: id.into() }
    }

    /// Rebuild the state from an identifier stored by the host.
    /// An empty identifier means the resource does not exist.
    pub fn from_id(id: impl Into<String>) -> Self {
        let id = id.into();
        if id.is_empty() {
            Self::Absent
        } else {
            Self::Present { id }
        }
    }

    /// Identifier, empty when absent.
    pub fn id(&self) -> &str {
        match self {
            Self::Absent => "",
            Self::Present { id } => id,
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(self, Self::Present { .. })
    }
}

/// Value type of an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeType {
    String,
}

/// Description of a resource attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    pub name: &'static str,
    pub description: &'static str,
    pub r#type: AttributeType,
    pub required: bool,
    pub sensitive: bool,
    pub force_new: bool,
}

impl Attribute {
    /// Create a required `string` attribute.
    pub fn required_string(name: &'static str) -> Self {
        Self {
            name,
            description: "",
            r#type: AttributeType::String,
            required: true,
            sensitive: false,
            force_new: false,
        }
    }

    /// Create an optional `string` attribute.
    pub fn optional_string(name: &'static str) -> Self {
        Self {
            required: false,
            ..Self::required_string(name)
        }
    }

    /// Update `description` of [`Attribute`].
    pub fn description(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    /// Hide value from plans and logs.
    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    /// Changing the value destroys then recreates the resource.
    pub fn force_new(mut self) -> Self {
        self.force_new = true;
        self
    }
}

/// Schema of a resource kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Schema {
    pub version: u32,
    pub attributes: Vec<Attribute>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|attr| attr.name == name)
    }

    /// Names of required attributes.
    pub fn required(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.attributes
            .iter()
            .filter(|attr| attr.required)
            .map(|attr| attr.name)
    }
}
