//! Error types for gcrcleaner
//!
//! Errors come in two layers. Cause errors (`Network`, `Authentication`,
//! `NotFound`, ...) describe what went wrong on the wire or in the input.
//! Stage errors (`AuthSetup`, `InvalidRepository`, `ListFailed`) wrap a cause
//! with the pipeline step that failed, so the message printed to the user
//! always names the step first.

use thiserror::Error;


type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Main error type for gcrcleaner operations
#[derive(Error, Debug)]
pub enum GcrError {
    /// Network-related errors (connection, timeout, DNS)
    #[error("Network error: {message}")]
    Network {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// Authentication errors (401, 403, missing credentials)
    #[error("Authentication error (status: {status_code:?}): {message}")]
    Authentication {
        message: String,
        status_code: Option<u16>,
    },

    /// Resource not found errors (404)
    #[error("{resource_type} not found: {name}")]
    NotFound { resource_type: String, name: String },

    /// Rate limiting errors (429)
    #[error("Rate limit: {message}")]
    RateLimit { message: String },

    /// Server errors (500, 503)
    #[error("Server error (status: {status_code}): {message}")]
    Server { message: String, status_code: u16 },

    /// Validation errors (malformed response, bad header, etc.)
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// Configuration errors (missing settings, unreadable credential files)
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        path: Option<String>,
        #[source]
        source: Option<BoxError>,
    },

    /// The authenticator could not be constructed.
    #[error("failed to set up authenticator: {source}")]
    AuthSetup {
        #[source]
        source: Box<GcrError>,
    },

    /// The repository string is not a valid reference.
    #[error("failed to get repo {repository}: {reason}")]
    InvalidRepository {
        repository: String,
        reason: String,
        #[source]
        source: Option<BoxError>,
    },

    /// The registry call listing the repository failed.
    #[error("failed to list tags for repo {repository}: {source}")]
    ListFailed {
        repository: String,
        #[source]
        source: Box<GcrError>,
    },
}

/// Result type alias for gcrcleaner operations
pub type Result<T> = std::result::Result<T, GcrError>;

impl GcrError {
    /// Creates a new network error.
    ///
    /// # Examples
    ///
    /// ```
    /// use libgcrcleaner::error::GcrError;
    ///
    /// let err = GcrError::network("connection refused");
    /// assert!(matches!(err, GcrError::Network { .. }));
    /// ```
    pub fn network<S: Into<String>>(message: S) -> Self {
        Self::Network {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a new network error with a source error.
    pub fn network_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Network {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a new authentication error.
    ///
    /// # Examples
    ///
    /// ```
    /// use libgcrcleaner::error::GcrError;
    ///
    /// let err = GcrError::authentication("invalid credentials", Some(401));
    /// assert!(matches!(err, GcrError::Authentication { .. }));
    /// ```
    pub fn authentication<S: Into<String>>(message: S, status_code: Option<u16>) -> Self {
        Self::Authentication {
            message: message.into(),
            status_code,
        }
    }

    /// Creates a new not found error.
    pub fn not_found<S: Into<String>>(resource_type: S, name: S) -> Self {
        Self::NotFound {
            resource_type: resource_type.into(),
            name: name.into(),
        }
    }

    /// Creates a new rate limit error.
    pub fn rate_limit<S: Into<String>>(message: S) -> Self {
        Self::RateLimit {
            message: message.into(),
        }
    }

    /// Creates a new server error.
    pub fn server<S: Into<String>>(message: S, status_code: u16) -> Self {
        Self::Server {
            message: message.into(),
            status_code,
        }
    }

    /// Creates a new validation error.
    ///
    /// # Examples
    ///
    /// ```
    /// use libgcrcleaner::error::GcrError;
    ///
    /// let err = GcrError::validation("invalid manifest listing");
    /// assert!(matches!(err, GcrError::Validation { .. }));
    /// ```
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a new validation error with a source error.
    pub fn validation_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Validation {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a new configuration error.
    ///
    /// # Examples
    ///
    /// ```
    /// use libgcrcleaner::error::GcrError;
    ///
    /// let err = GcrError::config("missing -repo", None);
    /// assert!(err.to_string().contains("repo"));
    /// ```
    pub fn config<S: Into<String>>(message: S, path: Option<S>) -> Self {
        Self::Config {
            message: message.into(),
            path: path.map(|p| p.into()),
            source: None,
        }
    }

    /// Creates a new configuration error with a source error.
    pub fn config_with_source<S, E>(message: S, path: Option<S>, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Config {
            message: message.into(),
            path: path.map(|p| p.into()),
            source: Some(Box::new(source)),
        }
    }

    /// Wraps a cause as an authenticator setup failure.
    ///
    /// # Examples
    ///
    /// ```
    /// use libgcrcleaner::error::GcrError;
    ///
    /// let err = GcrError::auth_setup(GcrError::authentication("no credentials", None));
    /// assert!(err.to_string().starts_with("failed to set up authenticator"));
    /// ```
    pub fn auth_setup(cause: GcrError) -> Self {
        Self::AuthSetup {
            source: Box::new(cause),
        }
    }

    /// Creates an invalid repository error carrying the offending string.
    pub fn invalid_repository<S, E>(repository: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::InvalidRepository {
            repository: repository.into(),
            reason: source.to_string(),
            source: Some(Box::new(source)),
        }
    }

    /// Wraps a cause as a failed listing of `repository`.
    pub fn list_failed<S: Into<String>>(repository: S, cause: GcrError) -> Self {
        Self::ListFailed {
            repository: repository.into(),
            source: Box::new(cause),
        }
    }
}
