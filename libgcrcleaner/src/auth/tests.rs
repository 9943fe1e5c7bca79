use super::*;
use std::cell::Cell;

#[test]
fn test_credentials_basic_header() {
    let creds = Credentials::basic("testuser", "testpass");
    match &creds {
        Credentials::Basic { username, password } => {
            assert_eq!(username, "testuser");
            assert_eq!(password, "testpass");
        }
        _ => panic!("Expected Basic credentials"),
    }

    // base64("testuser:testpass")
    assert_eq!(
        creds.to_header_value().unwrap(),
        "Basic dGVzdHVzZXI6dGVzdHBhc3M="
    );
}

#[test]
fn test_credentials_bearer_header() {
    let creds = Credentials::bearer("my_token");
    assert_eq!(creds.to_header_value().unwrap(), "Bearer my_token");
}

#[test]
fn test_credentials_anonymous_has_no_header() {
    assert_eq!(Credentials::Anonymous.to_header_value(), None);
}

#[test]
fn test_select_authenticator_with_token_returns_bearer() {
    let auth = select_authenticator("ya29.secret", || panic!("discovery must not run")).unwrap();

    assert_eq!(auth, Authenticator::bearer("ya29.secret"));
    assert_eq!(auth.kind(), "bearer");
}

#[test]
fn test_select_authenticator_with_token_never_discovers() {
    let called = Cell::new(false);
    let _ = select_authenticator("token", || {
        called.set(true);
        Err(GcrError::authentication("unreachable", None))
    })
    .unwrap();

    assert!(!called.get());
}

#[test]
fn test_select_authenticator_without_token_discovers() {
    let called = Cell::new(false);
    let result = select_authenticator("", || {
        called.set(true);
        Err(GcrError::authentication("no credentials", None))
    });

    assert!(called.get());
    assert!(result.is_err());
}

#[test]
fn test_select_authenticator_discovery_failure_names_step() {
    let err = select_authenticator("", || {
        Err(GcrError::authentication("no ambient registry credentials found", None))
    })
    .unwrap_err();

    assert!(matches!(err, GcrError::AuthSetup { .. }));
    assert!(err.to_string().contains("failed to set up authenticator"));
    assert!(err.to_string().contains("no ambient registry credentials found"));
}

#[test]
fn test_bearer_authenticator_ignores_registry() {
    let auth = Authenticator::bearer("abc");
    assert_eq!(auth.credentials_for("gcr.io"), Credentials::bearer("abc"));
    assert_eq!(auth.credentials_for("ghcr.io"), Credentials::bearer("abc"));
}
