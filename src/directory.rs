//! Requests issued to a directory service.

#[cfg(test)]
pub(crate) mod memory;

use std::collections::HashMap;

use async_trait::async_trait;
use ldap3::result::Result;
use ldap3::{DerefAliases, Scope, SearchEntry};

use crate::attributes::DirectoryAttributeSet;
use crate::dn::Dn;

/// Port to an authenticated directory connection.
///
/// Each call issues exactly one request and returns the error of the
/// underlying client as is. Opening, binding and closing the connection is
/// up to whoever owns it.
#[async_trait]
pub trait Directory: Send + Sync {
    /// Create a new entry.
    async fn add(&self, dn: &Dn, attributes: DirectoryAttributeSet) -> Result<()>;

    /// List entries matching `request`. No match is an empty list.
    async fn search(&self, request: &SearchRequest) -> Result<Vec<Entry>>;

    /// Remove an entry.
    async fn delete(&self, dn: &Dn) -> Result<()>;
}

/// Search request.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub base: Dn,
    pub scope: Scope,
    pub deref: DerefAliases,
    /// `0` means no limit.
    pub size_limit: i32,
    /// Seconds, `0` means no limit.
    pub time_limit: i32,
    pub filter: String,
    pub attrs: Vec<String>,
}

impl SearchRequest {
    /// Search the whole subtree under `base`, without limits nor alias
    /// dereferencing.
    pub fn subtree(base: Dn, filter: impl Into<String>) -> Self {
        Self {
            base,
            scope: Scope::Subtree,
            deref: DerefAliases::Never,
            size_limit: 0,
            time_limit: 0,
            filter: filter.into(),
            attrs: Vec::new(),
        }
    }

    /// Update requested attributes.
    pub fn attributes<I, S>(mut self, attrs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attrs = attrs.into_iter().map(Into::into).collect();
        self
    }
}

/// Entry returned by a search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Entry {
    pub dn: String,
    pub attrs: HashMap<String, Vec<String>>,
}

impl Entry {
    /// First value of `name`.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attrs
            .get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }
}

impl From<SearchEntry> for Entry {
    fn from(entry: SearchEntry) -> Self {
        Self {
            dn: entry.dn,
            attrs: entry.attrs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subtree_defaults() {
        let request = SearchRequest::subtree(
            crate::dn::users_base("example.com", None),
            "(objectClass=User)",
        );

        assert!(matches!(request.scope, Scope::Subtree));
        assert!(matches!(request.deref, DerefAliases::Never));
        assert_eq!(request.size_limit, 0);
        assert_eq!(request.time_limit, 0);
        assert!(request.attrs.is_empty());

        let request = request.attributes(["dn", "cn"]);
        assert_eq!(request.attrs, ["dn", "cn"]);
    }

    #[test]
    fn test_entry_from_search_entry() {
        let entry = Entry::from(SearchEntry {
            dn: "CN=first last,CN=Users,DC=example,DC=com".into(),
            attrs: HashMap::from([("cn".to_string(), vec!["first last".to_string()])]),
            bin_attrs: HashMap::new(),
        });

        assert_eq!(entry.attribute("cn"), Some("first last"));
        assert_eq!(entry.attribute("mail"), None);
    }
}
