//! Repository reference parsing.
//!
//! This module wraps `oci_spec::distribution::Reference` to parse repository
//! names of the form `host[:port]/path[:tag]` and derive the registry API
//! endpoint for them.

use crate::error::{GcrError, Result};
use oci_spec::distribution::Reference as OciReference;
use std::fmt;
use std::str::FromStr;

#[cfg(test)]
mod tests;

/// A container repository, e.g. `asia.gcr.io/project/app`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository(OciReference);

impl FromStr for Repository {
    type Err = GcrError;

    fn from_str(s: &str) -> Result<Self> {
        let reference =
            OciReference::from_str(s).map_err(|e| GcrError::invalid_repository(s, e))?;

        if reference.digest().is_some() {
            return Err(GcrError::invalid_repository(
                s,
                GcrError::validation("a digest reference does not name a repository"),
            ));
        }

        Ok(Repository(reference))
    }
}

impl fmt::Display for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.registry(), self.path())
    }
}

impl Repository {
    /// Returns the registry host, including any port.
    pub fn registry(&self) -> &str {
        self.0.registry()
    }

    /// Returns the repository path within the registry.
    pub fn path(&self) -> &str {
        self.0.repository()
    }

    /// Returns the tag given with the name, if any. Listing ignores it.
    pub fn tag(&self) -> Option<&str> {
        self.0.tag()
    }

    /// Returns the host serving the registry API.
    pub fn api_host(&self) -> &str {
        match self.registry() {
            "docker.io" => "index.docker.io",
            other => other,
        }
    }

    /// Returns the base URL of the registry API.
    ///
    /// Loopback and `.local` hosts are spoken to over plain HTTP, everything
    /// else over HTTPS.
    ///
    /// # Examples
    ///
    /// ```
    /// use libgcrcleaner::Repository;
    ///
    /// let repo: Repository = "asia.gcr.io/project/app".parse().unwrap();
    /// assert_eq!(repo.base_url(), "https://asia.gcr.io");
    ///
    /// let local: Repository = "localhost:5000/project/app".parse().unwrap();
    /// assert_eq!(local.base_url(), "http://localhost:5000");
    /// ```
    pub fn base_url(&self) -> String {
        let host = self.api_host();
        let scheme = if is_insecure_host(host) {
            "http"
        } else {
            "https"
        };
        format!("{}://{}", scheme, host)
    }
}

/// Hosts reachable without TLS.
fn is_insecure_host(host_with_port: &str) -> bool {
    let host = if let Some(rest) = host_with_port.strip_prefix('[') {
        rest.split(']').next().unwrap_or(rest)
    } else {
        host_with_port.split(':').next().unwrap_or(host_with_port)
    };

    matches!(host, "localhost" | "127.0.0.1" | "::1")
        || host.ends_with(".local")
        || host.ends_with(".localhost")
}
