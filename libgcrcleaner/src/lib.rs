//! gcrcleaner - Container Registry Listing Library
//!
//! libgcrcleaner lists the manifests of a single container repository,
//! together with their creation times, and orders them newest first.
//!
//! # Quick Start
//!
//! ```no_run
//! use libgcrcleaner::{ProcessEnvironment, RegistryLister, Repository, TagLister};
//! use libgcrcleaner::auth::{EnvAuthenticator, select_authenticator};
//!
//! # async fn example() -> libgcrcleaner::Result<()> {
//! let auth = select_authenticator("", || EnvAuthenticator::discover(&ProcessEnvironment))?;
//! let repository: Repository = "asia.gcr.io/project/app".parse()?;
//!
//! let listing = RegistryLister::default().list(&repository, &auth).await?;
//! for entry in listing.into_sorted_entries() {
//!     println!("{} {}", entry.digest, entry.info.created);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Main Types
//!
//! - [`Authenticator`] - Bearer token or environment-derived credentials
//! - [`Repository`] - Parsed repository reference
//! - [`TagLister`] / [`RegistryLister`] - Repository listing
//! - [`ManifestEntry`] - One manifest digest with its metadata

#![warn(clippy::all)]

/// Returns the libgcrcleaner crate version.
///
/// # Examples
///
/// ```
/// let version = libgcrcleaner::version();
/// assert!(!version.is_empty());
/// ```
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

// Re-export commonly used types for convenience
pub use auth::{Authenticator, Credentials, EnvAuthenticator, Environment, ProcessEnvironment};
pub use error::{GcrError, Result};
pub use lister::{RegistryLister, TagLister};
pub use manifest::{ManifestEntry, ManifestInfo, ManifestListing, sort_newest_first};
pub use reference::Repository;

pub mod auth;
pub mod client;
pub mod error;
pub mod lister;
pub mod manifest;
pub mod reference;
