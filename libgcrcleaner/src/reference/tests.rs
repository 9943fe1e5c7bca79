use super::*;
use std::str::FromStr;

#[test]
fn test_repository_from_valid_string_succeeds() {
    let repo = Repository::from_str("asia.gcr.io/tikivn/xlearning").unwrap();
    assert_eq!(repo.registry(), "asia.gcr.io");
    assert_eq!(repo.path(), "tikivn/xlearning");
}

#[test]
fn test_repository_with_port() {
    let repo = Repository::from_str("127.0.0.1:5000/project/app").unwrap();
    assert_eq!(repo.registry(), "127.0.0.1:5000");
    assert_eq!(repo.path(), "project/app");
    assert_eq!(repo.base_url(), "http://127.0.0.1:5000");
}

#[test]
fn test_repository_with_tag_keeps_path() {
    let repo = Repository::from_str("gcr.io/project/app:v1").unwrap();
    assert_eq!(repo.path(), "project/app");
    assert_eq!(repo.tag(), Some("v1"));
}

#[test]
fn test_repository_display_omits_tag() {
    let repo = Repository::from_str("gcr.io/project/app:v1").unwrap();
    assert_eq!(repo.to_string(), "gcr.io/project/app");
}

#[test]
fn test_repository_with_uppercase_fails_with_original_string() {
    let err = Repository::from_str("gcr.io/Project/App").unwrap_err();
    assert!(matches!(err, GcrError::InvalidRepository { .. }));
    assert!(err.to_string().contains("gcr.io/Project/App"));
}

#[test]
fn test_repository_with_illegal_characters_fails() {
    let err = Repository::from_str("gcr.io/project/app!!").unwrap_err();
    match err {
        GcrError::InvalidRepository { repository, .. } => {
            assert_eq!(repository, "gcr.io/project/app!!")
        }
        other => panic!("Expected InvalidRepository, got {other:?}"),
    }
}

#[test]
fn test_repository_empty_string_fails() {
    let err = Repository::from_str("").unwrap_err();
    assert!(matches!(err, GcrError::InvalidRepository { .. }));
}

#[test]
fn test_repository_digest_reference_fails() {
    let digest = "sha256:c5b1261d6d3e43071626931fc004f70149baeba2c8ec672bd4f27761f8e1ad6b";
    let input = format!("gcr.io/project/app@{}", digest);
    let err = Repository::from_str(&input).unwrap_err();
    assert!(err.to_string().contains(&input));
}

#[test]
fn test_base_url_uses_https_for_remote_hosts() {
    let repo = Repository::from_str("eu.gcr.io/project/app").unwrap();
    assert_eq!(repo.base_url(), "https://eu.gcr.io");
}

#[test]
fn test_base_url_maps_docker_hub() {
    let repo = Repository::from_str("docker.io/library/alpine").unwrap();
    assert_eq!(repo.api_host(), "index.docker.io");
    assert_eq!(repo.base_url(), "https://index.docker.io");
}

#[test]
fn test_is_insecure_host() {
    assert!(is_insecure_host("localhost"));
    assert!(is_insecure_host("localhost:5000"));
    assert!(is_insecure_host("[::1]:5000"));
    assert!(is_insecure_host("registry.local"));
    assert!(!is_insecure_host("gcr.io"));
    assert!(!is_insecure_host("localhost.example.com"));
}
