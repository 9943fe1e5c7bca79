//! Environment-derived credentials.
//!
//! Two ambient sources are consulted, in order:
//!
//! 1. An OAuth access token exported by the host (`GOOGLE_OAUTH_ACCESS_TOKEN`
//!    or `CLOUDSDK_AUTH_ACCESS_TOKEN`), sent as a bearer token.
//! 2. The Docker client configuration (`$DOCKER_CONFIG/config.json` or
//!    `~/.docker/config.json`), whose `auths` entries are sent as Basic
//!    credentials to the matching registry host.
//!
//! The token is never exchanged or refreshed here.

use crate::auth::Credentials;
use crate::error::{GcrError, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variables holding a ready-to-use access token, by priority.
pub const ACCESS_TOKEN_VARS: [&str; 2] = ["GOOGLE_OAUTH_ACCESS_TOKEN", "CLOUDSDK_AUTH_ACCESS_TOKEN"];

/// Read access to the process environment.
///
/// Production code uses [`ProcessEnvironment`]; tests substitute a fixed map.
pub trait Environment {
    /// Returns the value of an environment variable, if set.
    fn var(&self, key: &str) -> Option<String>;

    /// Returns the user's home directory, if known.
    fn home_dir(&self) -> Option<PathBuf>;
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnvironment;

impl Environment for ProcessEnvironment {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }

    fn home_dir(&self) -> Option<PathBuf> {
        dirs::home_dir()
    }
}

/// The `auths` section of a Docker `config.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DockerConfig {
    #[serde(default)]
    auths: BTreeMap<String, DockerAuthEntry>,
}

/// Authentication entry in Docker config
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
struct DockerAuthEntry {
    /// Base64-encoded "username:password"
    auth: Option<String>,
    username: Option<String>,
    password: Option<String>,
}

impl DockerConfig {
    /// Parses a Docker config from its JSON text.
    pub fn from_json_str(s: &str) -> Result<Self> {
        serde_json::from_str(s)
            .map_err(|e| GcrError::validation_with_source("Failed to parse Docker config", e))
    }

    /// Loads a Docker config file. A missing file yields `Ok(None)`.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(path).map_err(|e| {
            GcrError::config_with_source(
                "Failed to read Docker config".to_string(),
                Some(path.display().to_string()),
                e,
            )
        })?;

        serde_json::from_str(&contents).map(Some).map_err(|e| {
            GcrError::config_with_source(
                "Failed to parse Docker config".to_string(),
                Some(path.display().to_string()),
                e,
            )
        })
    }

    /// Returns true if the config has no usable credential entries.
    pub fn is_empty(&self) -> bool {
        self.auths.values().all(|entry| entry.credentials().is_none())
    }

    /// Returns the Basic credentials stored for `registry`, if any.
    ///
    /// Keys may be bare hosts (`gcr.io`) or URLs (`https://gcr.io`,
    /// `https://index.docker.io/v1/`); an exact key match wins.
    pub fn credentials_for(&self, registry: &str) -> Option<Credentials> {
        if let Some(creds) = self.auths.get(registry).and_then(DockerAuthEntry::credentials) {
            return Some(creds);
        }

        let wanted = canonical_host(registry);
        self.auths
            .iter()
            .filter(|(key, _)| canonical_host(key) == wanted)
            .find_map(|(_, entry)| entry.credentials())
    }
}

impl DockerAuthEntry {
    fn credentials(&self) -> Option<Credentials> {
        if let (Some(username), Some(password)) = (&self.username, &self.password) {
            return Some(Credentials::basic(username.clone(), password.clone()));
        }

        let auth = self.auth.as_deref()?;
        use base64::Engine;
        let decoded = base64::engine::general_purpose::STANDARD
            .decode(auth.trim())
            .ok()?;
        let decoded = String::from_utf8(decoded).ok()?;
        let (username, password) = decoded.split_once(':')?;
        Some(Credentials::basic(username, password))
    }
}

/// Reduces a Docker config key or registry name to a bare host.
fn canonical_host(key: &str) -> &str {
    let key = key
        .strip_prefix("https://")
        .or_else(|| key.strip_prefix("http://"))
        .unwrap_or(key);
    let host = key.split('/').next().unwrap_or(key);
    match host {
        "docker.io" | "registry-1.docker.io" => "index.docker.io",
        other => other,
    }
}

/// Credentials discovered from the environment at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvAuthenticator {
    access_token: Option<String>,
    docker: Option<DockerConfig>,
}

impl EnvAuthenticator {
    /// Discovers ambient credentials.
    ///
    /// Fails if no source yields anything, or if a Docker config exists but
    /// cannot be read.
    pub fn discover(env: &dyn Environment) -> Result<Self> {
        let access_token = ACCESS_TOKEN_VARS.iter().find_map(|key| {
            env.var(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        });

        let docker = match docker_config_path(env) {
            Some(path) => {
                tracing::debug!(path = %path.display(), "looking for Docker credentials");
                DockerConfig::load(&path)?
            }
            None => None,
        }
        .filter(|config| !config.is_empty());

        if access_token.is_none() && docker.is_none() {
            return Err(GcrError::authentication(
                format!(
                    "no ambient registry credentials found (set {} or configure Docker credentials)",
                    ACCESS_TOKEN_VARS.join(" or ")
                ),
                None,
            ));
        }

        tracing::debug!(
            access_token = access_token.is_some(),
            docker_config = docker.is_some(),
            "discovered ambient credentials"
        );

        Ok(Self {
            access_token,
            docker,
        })
    }

    /// Resolves credentials for `registry`; an access token takes priority.
    pub fn credentials_for(&self, registry: &str) -> Credentials {
        if let Some(token) = &self.access_token {
            return Credentials::bearer(token.clone());
        }

        self.docker
            .as_ref()
            .and_then(|config| config.credentials_for(registry))
            .unwrap_or(Credentials::Anonymous)
    }
}

/// Location of the Docker client config for this environment.
fn docker_config_path(env: &dyn Environment) -> Option<PathBuf> {
    if let Some(dir) = env.var("DOCKER_CONFIG").filter(|d| !d.is_empty()) {
        return Some(PathBuf::from(dir).join("config.json"));
    }
    env.home_dir()
        .map(|home| home.join(".docker").join("config.json"))
}
