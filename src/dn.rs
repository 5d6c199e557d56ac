//! Distinguished name construction.

use std::fmt;

use ldap3::dn_escape;

/// Default container of Active Directory users.
const USERS_CONTAINER: &str = "CN=Users";

/// Address of a directory entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Dn(String);

impl Dn {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Dn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Dn {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<Dn> for String {
    fn from(dn: Dn) -> Self {
        dn.0
    }
}

/// Build the `dn` of a user.
///
/// With an organizational unit, the entry is placed right under it.
/// Otherwise it lands in `CN=Users` of the domain, one `DC=` per label.
/// RDN values are escaped as RFC 4514 requires; `ou_dn` is already a DN and
/// is kept verbatim.
pub fn user_dn(full_name: &str, domain: &str, ou_dn: Option<&str>) -> Dn {
    Dn(format!(
        "CN={},{}",
        dn_escape(full_name),
        users_base(domain, ou_dn)
    ))
}

/// Container users are searched in.
pub fn users_base(domain: &str, ou_dn: Option<&str>) -> Dn {
    match ou_dn.filter(|dn| !dn.is_empty()) {
        Some(dn) => Dn(dn.to_owned()),
        None => {
            let mut base = String::from(USERS_CONTAINER);
            for label in domain_components(domain) {
                base.push_str(",DC=");
                base.push_str(&dn_escape(label));
            }
            Dn(base)
        },
    }
}

fn domain_components(domain: &str) -> impl Iterator<Item = &str> {
    // An empty domain has no component at all, not a single empty one.
    domain.split('.').filter(move |_| !domain.is_empty())
}
