//! Reconcile declared resources with the directory.

use validator::Validate;

use crate::directory::Directory;
use crate::error::{Error, Operation, Result};
use crate::resource::{Resource, ResourceState};

/// Create, read and delete resources on a directory.
///
/// The directory is borrowed: the caller owns the connection and serializes
/// operations targeting the same resource.
pub struct Reconciler<'a, D: Directory + ?Sized> {
    directory: &'a D,
}

impl<'a, D: Directory + ?Sized> Reconciler<'a, D> {
    /// Create a new [`Reconciler`].
    pub fn new(directory: &'a D) -> Self {
        Self { directory }
    }

    /// Add the entry of `spec`.
    ///
    /// On failure the resource is still absent.
    pub async fn create<R: Resource>(&self, spec: &R) -> Result<ResourceState> {
        Validate::validate(spec)?;

        let dn = spec.dn();
        tracing::debug!(kind = R::KIND, %dn, "adding entry");

        if let Err(err) = self.directory.add(&dn, spec.attributes()).await {
            tracing::error!(kind = R::KIND, %dn, error = %err, "entry not added");
            return Err(Error::directory(Operation::Add, spec.name(), err));
        }

        tracing::debug!(kind = R::KIND, %dn, "entry added");
        Ok(ResourceState::present(spec.id()))
    }

    /// Refresh `state` from the directory.
    ///
    /// A missing entry is not an error: the resource becomes absent. A found
    /// entry leaves `state` unchanged, so an absent resource never takes over
    /// an entry it did not create.
    pub async fn read<R: Resource>(
        &self,
        spec: &R,
        state: &ResourceState,
    ) -> Result<ResourceState> {
        let query = spec.existence_query();
        tracing::debug!(kind = R::KIND, base = %query.base, filter = query.filter, "searching entry");

        let entries = self.directory.search(&query).await.map_err(|err| {
            tracing::error!(kind = R::KIND, base = %query.base, error = %err, "search failed");
            Error::directory(Operation::Search, spec.name(), err)
        })?;

        tracing::debug!(kind = R::KIND, found = entries.len(), "search done");
        for entry in &entries {
            tracing::trace!(dn = entry.dn, cn = entry.attribute("cn"), "matching entry");
        }

        if entries.is_empty() {
            tracing::info!(kind = R::KIND, id = state.id(), "entry not found, resource is gone");
            return Ok(ResourceState::Absent);
        }

        if !state.is_present() {
            tracing::debug!(kind = R::KIND, name = spec.name(), "entry exists but is not managed");
        }
        Ok(state.clone())
    }

    /// Remove the entry of `spec`.
    ///
    /// The entry is looked up first; deleting an absent resource fails
    /// without any request to remove it.
    pub async fn delete<R: Resource>(
        &self,
        spec: &R,
        state: &ResourceState,
    ) -> Result<ResourceState> {
        if !self.read(spec, state).await?.is_present() {
            tracing::error!(kind = R::KIND, name = spec.name(), "cannot delete missing entry");
            return Err(Error::NotFound { name: spec.name() });
        }

        let dn = spec.dn();
        tracing::debug!(kind = R::KIND, %dn, "deleting entry");

        if let Err(err) = self.directory.delete(&dn).await {
            tracing::error!(kind = R::KIND, %dn, error = %err, "entry not deleted");
            return Err(Error::directory(Operation::Delete, spec.name(), err));
        }

        tracing::debug!(kind = R::KIND, %dn, "entry deleted");
        Ok(ResourceState::Absent)
    }
}
