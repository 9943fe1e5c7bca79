//! The listing pipeline: authenticator, repository, list, sort, render.

use crate::format;
use crate::settings::Settings;
use libgcrcleaner::auth::select_authenticator;
use libgcrcleaner::{EnvAuthenticator, Environment, GcrError, Repository, Result, TagLister};

/// Runs one listing and returns the rendered output.
///
/// Nothing is printed on failure; the caller reports the error.
pub async fn run<L: TagLister>(
    settings: &Settings,
    env: &dyn Environment,
    lister: &L,
) -> Result<String> {
    let auth = select_authenticator(&settings.token, || EnvAuthenticator::discover(env))?;

    let repository: Repository = settings.repository.parse()?;
    tracing::debug!(%repository, authenticator = auth.kind(), "resolved repository");

    let listing = lister.list(&repository, &auth).await?;
    if !listing.children.is_empty() {
        format::warning(&format!(
            "{} has {} nested repositories that are not listed",
            repository,
            listing.children.len()
        ));
    }

    let entries = listing.into_sorted_entries();
    tracing::info!(manifests = entries.len(), "listing sorted");

    format::render_entries(&entries, settings.format, &repository.to_string())
        .map_err(GcrError::validation)
}

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;
