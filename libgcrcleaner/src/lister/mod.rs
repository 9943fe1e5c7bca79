//! Repository listing.
//!
//! [`TagLister`] is the seam between the pipeline and the registry: the
//! binary only needs "give me every manifest in this repository". The
//! production implementation, [`RegistryLister`], performs the HTTP call;
//! tests can supply canned listings instead.

use crate::auth::Authenticator;
use crate::client::{Client, ClientConfig};
use crate::error::{GcrError, Result};
use crate::manifest::ManifestListing;
use crate::reference::Repository;


/// Retrieves all manifests of a repository.
#[allow(async_fn_in_trait)]
pub trait TagLister {
    /// Lists `repository` using `auth`.
    ///
    /// Failures are reported as [`GcrError::ListFailed`] naming the
    /// repository.
    async fn list(
        &self,
        repository: &Repository,
        auth: &Authenticator,
    ) -> Result<ManifestListing>;
}

/// Lists repositories by calling the registry's `tags/list` endpoint.
#[derive(Debug, Clone, Default)]
pub struct RegistryLister {
    config: ClientConfig,
}

impl RegistryLister {
    /// Creates a lister whose HTTP clients use `config`.
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }
}

impl TagLister for RegistryLister {
    async fn list(
        &self,
        repository: &Repository,
        auth: &Authenticator,
    ) -> Result<ManifestListing> {
        let listing = async {
            let client = Client::with_config(&repository.base_url(), self.config.clone())?;
            let credentials = auth.credentials_for(repository.registry());
            tracing::info!(
                registry = client.registry_url(),
                repository = repository.path(),
                authenticator = auth.kind(),
                "listing manifests"
            );
            client.list_manifests(repository.path(), &credentials).await
        }
        .await;

        listing.map_err(|e| GcrError::list_failed(repository.to_string(), e))
    }
}
