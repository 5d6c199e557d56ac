//! In-memory directory used by tests.

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use async_trait::async_trait;
use ldap3::result::Result;
use ldap3::{LdapError, LdapResult, ldap_escape};

use crate::attributes::DirectoryAttributeSet;
use crate::directory::{Directory, Entry, SearchRequest};
use crate::dn::Dn;
use crate::error::Operation;

/// `noSuchObject` result code.
pub const NO_SUCH_OBJECT: u32 = 32;
/// `unavailable` result code.
pub const UNAVAILABLE: u32 = 52;
/// `entryAlreadyExists` result code.
pub const ENTRY_ALREADY_EXISTS: u32 = 68;

/// Error returned by a server answering with `rc`.
pub fn ldap_failure(rc: u32, text: &str) -> LdapError {
    LdapError::LdapResult {
        result: LdapResult {
            rc,
            matched: String::new(),
            text: text.to_owned(),
            refs: Vec::new(),
            ctrls: Vec::new(),
        },
    }
}

/// Request received by [`MemoryDirectory`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Add(String),
    Search { base: String, filter: String },
    Delete(String),
}

/// Directory keeping entries in a map, keyed by lowercase DN.
#[derive(Default)]
pub struct MemoryDirectory {
    entries: Mutex<BTreeMap<String, Entry>>,
    requests: Mutex<Vec<Request>>,
    failure: Mutex<Option<(Operation, u32)>>,
}

impl MemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every `operation` with result code `rc`.
    pub fn fail_on(&self, operation: Operation, rc: u32) {
        *self.failure.lock().unwrap() = Some((operation, rc));
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().unwrap().clone()
    }

    pub fn deletions(&self) -> usize {
        self.requests()
            .iter()
            .filter(|request| matches!(request, Request::Delete(_)))
            .count()
    }

    pub fn entry(&self, dn: &str) -> Option<Entry> {
        self.entries.lock().unwrap().get(&dn.to_lowercase()).cloned()
    }

    pub fn count(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    /// Remove an entry behind the provider's back.
    pub fn remove(&self, dn: &str) {
        self.entries.lock().unwrap().remove(&dn.to_lowercase());
    }

    fn check(&self, operation: Operation) -> Result<()> {
        match *self.failure.lock().unwrap() {
            Some((failing, rc)) if failing == operation => {
                Err(ldap_failure(rc, "injected failure"))
            },
            _ => Ok(()),
        }
    }
}

/// Value of `(cn=…)` in a filter.
fn filter_cn(filter: &str) -> Option<&str> {
    let start = filter.find("(cn=")? + "(cn=".len();
    let end = filter[start..].find(')')? + start;
    Some(&filter[start..end])
}

#[async_trait]
impl Directory for MemoryDirectory {
    async fn add(&self, dn: &Dn, attributes: DirectoryAttributeSet) -> Result<()> {
        self.requests
            .lock()
            .unwrap()
            .push(Request::Add(dn.to_string()));
        self.check(Operation::Add)?;

        let mut entries = self.entries.lock().unwrap();
        let key = dn.as_str().to_lowercase();
        if entries.contains_key(&key) {
            return Err(ldap_failure(ENTRY_ALREADY_EXISTS, "entryAlreadyExists"));
        }

        let mut attrs: HashMap<String, Vec<String>> = attributes
            .into_ldap()
            .into_iter()
            .map(|(name, values)| (name, values.into_iter().collect()))
            .collect();
        // The server names the entry after its RDN, equal to `name`.
        if let Some(name) = attrs.get("name").cloned() {
            attrs.insert("cn".into(), name);
        }

        entries.insert(
            key,
            Entry {
                dn: dn.to_string(),
                attrs,
            },
        );
        Ok(())
    }

    async fn search(&self, request: &SearchRequest) -> Result<Vec<Entry>> {
        self.requests.lock().unwrap().push(Request::Search {
            base: request.base.to_string(),
            filter: request.filter.clone(),
        });
        self.check(Operation::Search)?;

        let base = request.base.as_str().to_lowercase();
        let suffix = format!(",{base}");
        let cn = filter_cn(&request.filter);

        let entries = self.entries.lock().unwrap();
        Ok(entries
            .iter()
            .filter(|(dn, _)| **dn == base || dn.ends_with(&suffix))
            .filter(|(_, entry)| {
                let is_user = entry.attrs.get("objectClass").is_some_and(|classes| {
                    classes.iter().any(|class| class.eq_ignore_ascii_case("user"))
                });
                let same_cn = match (cn, entry.attribute("cn")) {
                    (Some(wanted), Some(value)) => ldap_escape(value) == wanted,
                    (None, _) => true,
                    _ => false,
                };
                is_user && same_cn
            })
            .map(|(_, entry)| Entry {
                dn: entry.dn.clone(),
                attrs: entry
                    .attrs
                    .iter()
                    .filter(|(name, _)| request.attrs.contains(name))
                    .map(|(name, values)| (name.clone(), values.clone()))
                    .collect(),
            })
            .collect())
    }

    async fn delete(&self, dn: &Dn) -> Result<()> {
        self.requests
            .lock()
            .unwrap()
            .push(Request::Delete(dn.to_string()));
        self.check(Operation::Delete)?;

        match self.entries.lock().unwrap().remove(&dn.as_str().to_lowercase()) {
            Some(_) => Ok(()),
            None => Err(ldap_failure(NO_SUCH_OBJECT, "noSuchObject")),
        }
    }
}
