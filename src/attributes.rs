//! Mapping of desired attributes onto directory attributes.

use std::collections::{BTreeMap, HashSet};

use crate::resource::user::UserSpec;

/// Object classes of an Active Directory user.
pub const USER_OBJECT_CLASSES: [&str; 4] =
    ["organizationalPerson", "person", "top", "user"];

/// Attributes of a directory entry, ordered by name.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct DirectoryAttributeSet(BTreeMap<String, Vec<String>>);

impl DirectoryAttributeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `name` to the given values, replacing previous ones.
    pub fn insert<I, V>(&mut self, name: impl Into<String>, values: I)
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.0
            .insert(name.into(), values.into_iter().map(Into::into).collect());
    }

    /// Values of `name`.
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.0.get(name).map(Vec::as_slice)
    }

    /// First value of `name`.
    pub fn first(&self, name: &str) -> Option<&str> {
        self.get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Shape expected by [`ldap3::Ldap::add`].
    pub fn into_ldap(self) -> Vec<(String, HashSet<String>)> {
        self.0
            .into_iter()
            .map(|(name, values)| (name, values.into_iter().collect()))
            .collect()
    }
}

impl std::fmt::Debug for DirectoryAttributeSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(self.0.iter().map(|(name, values)| {
                let values: &dyn std::fmt::Debug = if name == "userPassword" {
                    &"<redacted>"
                } else {
                    values
                };
                (name, values)
            }))
            .finish()
    }
}

/// Build the attributes of a new user entry.
pub fn map_attributes(spec: &UserSpec) -> DirectoryAttributeSet {
    let mut attrs = DirectoryAttributeSet::new();

    attrs.insert("objectClass", USER_OBJECT_CLASSES);
    attrs.insert("sAMAccountName", [spec.logon_name.as_str()]);
    attrs.insert("userPrincipalName", [spec.principal_name()]);
    attrs.insert("name", [spec.full_name()]);
    attrs.insert("sn", [spec.last_name.as_str()]);
    attrs.insert("userPassword", [spec.password.as_str()]);
    if let Some(email) = spec.email() {
        attrs.insert("mail", [email]);
    }

    attrs
}
