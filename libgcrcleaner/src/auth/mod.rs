//! Authentication handling for container registries.
//!
//! An [`Authenticator`] is chosen once per run. A pre-issued token always
//! wins; without one, credentials are discovered from the environment
//! (see [`EnvAuthenticator`]). For each request the authenticator resolves
//! the [`Credentials`] to send to a given registry host.

use crate::error::{GcrError, Result};

mod env;

pub use env::{
    ACCESS_TOKEN_VARS, DockerConfig, EnvAuthenticator, Environment, ProcessEnvironment,
};

#[cfg(test)]
mod tests;

/// Credentials for registry authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    /// No authentication (anonymous access)
    Anonymous,

    /// HTTP Basic authentication with username and password
    Basic {
        /// Username for authentication
        username: String,
        /// Password for authentication
        password: String,
    },

    /// Bearer token authentication
    Bearer {
        /// The bearer token
        token: String,
    },
}

impl Credentials {
    /// Creates Basic authentication credentials.
    ///
    /// # Examples
    ///
    /// ```
    /// use libgcrcleaner::auth::Credentials;
    ///
    /// let creds = Credentials::basic("oauth2accesstoken", "ya29.token");
    /// ```
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Basic {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Creates Bearer token credentials.
    pub fn bearer(token: impl Into<String>) -> Self {
        Self::Bearer {
            token: token.into(),
        }
    }

    /// Returns the Authorization header value for these credentials.
    ///
    /// # Examples
    ///
    /// ```
    /// use libgcrcleaner::auth::Credentials;
    ///
    /// let creds = Credentials::bearer("abc");
    /// assert_eq!(creds.to_header_value().as_deref(), Some("Bearer abc"));
    /// assert_eq!(Credentials::Anonymous.to_header_value(), None);
    /// ```
    pub fn to_header_value(&self) -> Option<String> {
        match self {
            Self::Anonymous => None,
            Self::Basic { username, password } => {
                use base64::{Engine as _, engine::general_purpose};
                let credentials = format!("{}:{}", username, password);
                let encoded = general_purpose::STANDARD.encode(credentials);
                Some(format!("Basic {}", encoded))
            }
            Self::Bearer { token } => Some(format!("Bearer {}", token)),
        }
    }
}

/// Credential provider chosen for a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Authenticator {
    /// A fixed, pre-issued token attached to every request.
    Bearer {
        /// The bearer token
        token: String,
    },

    /// Credentials discovered from the process environment.
    Environment(EnvAuthenticator),
}

impl Authenticator {
    /// Creates a bearer authenticator wrapping `token`.
    pub fn bearer(token: impl Into<String>) -> Self {
        Self::Bearer {
            token: token.into(),
        }
    }

    /// Resolves the credentials to present to `registry`.
    pub fn credentials_for(&self, registry: &str) -> Credentials {
        match self {
            Self::Bearer { token } => Credentials::bearer(token.clone()),
            Self::Environment(env) => env.credentials_for(registry),
        }
    }

    /// Short name of the variant, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Bearer { .. } => "bearer",
            Self::Environment(_) => "environment",
        }
    }
}

/// Picks the authenticator for a run.
///
/// A non-empty `token` always yields [`Authenticator::Bearer`] and `discover`
/// is never called. Otherwise `discover` is asked for ambient credentials and
/// its failure is reported as [`GcrError::AuthSetup`].
///
/// # Examples
///
/// ```
/// use libgcrcleaner::auth::{Authenticator, select_authenticator};
///
/// let auth = select_authenticator("token", || unreachable!()).unwrap();
/// assert_eq!(auth, Authenticator::bearer("token"));
/// ```
pub fn select_authenticator<F>(token: &str, discover: F) -> Result<Authenticator>
where
    F: FnOnce() -> Result<EnvAuthenticator>,
{
    if !token.is_empty() {
        tracing::debug!("using bearer token authenticator");
        return Ok(Authenticator::bearer(token));
    }

    tracing::debug!("no token given, discovering ambient credentials");
    discover()
        .map(Authenticator::Environment)
        .map_err(GcrError::auth_setup)
}
