//! LDAP support.

use async_trait::async_trait;
use ldap3::result::Result as LdapResult;
use ldap3::{Ldap as Ldap3, LdapConnAsync, LdapConnSettings, SearchEntry, SearchOptions};

use crate::attributes::DirectoryAttributeSet;
use crate::config::{ConfigError, Ldap as LdapConfig};
use crate::directory::{Directory, Entry, SearchRequest};
use crate::dn::Dn;
use crate::error::{Error, Operation, Result};

/// Directory reached through an [`Ldap3`] handle.
///
/// The handle is cheap to clone and shares the underlying connection, so a
/// single [`LdapDirectory`] may serve any number of resources.
#[derive(Clone, Debug)]
pub struct LdapDirectory {
    conn: Ldap3,
}

impl LdapDirectory {
    /// Wrap a connection owned, and already bound, by the caller.
    pub fn from_handle(conn: Ldap3) -> Self {
        Self { conn }
    }

    /// Create a new [`Ldap3`] connection and bind it.
    ///
    /// A bind user without a password is refused: the server would treat it
    /// as an unauthenticated bind.
    pub async fn connect(config: &LdapConfig) -> Result<Self> {
        let credentials = match (&config.user, &config.password) {
            (Some(user), Some(password)) if !password.is_empty() => Some((user, password)),
            (Some(user), _) => {
                tracing::error!(%user, "bind user configured without password");
                return Err(ConfigError::MissingPassword(user.clone()).into());
            },
            (None, _) => None,
        };

        let mut settings = LdapConnSettings::new()
            .set_starttls(config.starttls)
            .set_no_tls_verify(config.no_tls_verify);
        if let Some(timeout) = config.timeout() {
            settings = settings.set_conn_timeout(timeout);
        }

        let (handle, mut conn) = LdapConnAsync::with_settings(settings, &config.url)
            .await
            .map_err(|err| Error::directory(Operation::Connect, &config.url, err))?;
        ldap3::drive!(handle);

        if let Some((user, password)) = credentials {
            conn.simple_bind(user, password)
                .await
                .and_then(|result| result.success())
                .map_err(|err| Error::directory(Operation::Connect, &config.url, err))?;
        }

        tracing::debug!(url = %config.url, "connected to directory");
        Ok(Self { conn })
    }

    /// Close the connection.
    ///
    /// Other clones of this handle are unusable afterwards.
    pub async fn unbind(mut self) -> LdapResult<()> {
        self.conn.unbind().await
    }

    /// Underlying [`Ldap3`] handle.
    pub fn handle(&self) -> &Ldap3 {
        &self.conn
    }
}

#[async_trait]
impl Directory for LdapDirectory {
    async fn add(&self, dn: &Dn, attributes: DirectoryAttributeSet) -> LdapResult<()> {
        let mut conn = self.conn.clone();
        conn.add(dn.as_str(), attributes.into_ldap())
            .await?
            .success()?;
        Ok(())
    }

    async fn search(&self, request: &SearchRequest) -> LdapResult<Vec<Entry>> {
        let mut conn = self.conn.clone();
        let (results, _) = conn
            .with_search_options(
                SearchOptions::new()
                    .deref(request.deref)
                    .sizelimit(request.size_limit)
                    .timelimit(request.time_limit),
            )
            .search(
                request.base.as_str(),
                request.scope,
                &request.filter,
                request.attrs.clone(),
            )
            .await?
            .success()?;

        Ok(results
            .into_iter()
            .map(|entry| SearchEntry::construct(entry).into())
            .collect())
    }

    async fn delete(&self, dn: &Dn) -> LdapResult<()> {
        let mut conn = self.conn.clone();
        conn.delete(dn.as_str()).await?.success()?;
        Ok(())
    }
}
