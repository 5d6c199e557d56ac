//! Declarative Active Directory provider.
//!
//! Users are declared with a [`UserSpec`] and reconciled over LDAP by a
//! [`Reconciler`]: created, read back to detect drift, and deleted. There is
//! no update, every attribute forces a replacement.

#![forbid(unsafe_code)]
pub mod attributes;
pub mod config;
pub mod directory;
pub mod dn;
pub mod error;
pub mod ldap;
pub mod provider;
pub mod reconciler;
pub mod resource;
pub mod telemetry;

pub use directory::{Directory, Entry, SearchRequest};
pub use error::{Error, Result};
pub use ldap::LdapDirectory;
pub use reconciler::Reconciler;
pub use resource::user::UserSpec;
pub use resource::{Resource, ResourceState};
