use super::*;
use chrono::TimeZone;

fn info_created_at(created: DateTime<Utc>) -> ManifestInfo {
    ManifestInfo {
        size: 1024,
        media_type: "application/vnd.docker.distribution.manifest.v2+json".to_string(),
        created,
        uploaded: created,
        tags: vec![],
    }
}

fn ymd(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).unwrap()
}

#[test]
fn test_manifest_info_decodes_registry_strings() {
    let json = r#"{
        "imageSizeBytes": "28543264",
        "layerId": "",
        "mediaType": "application/vnd.docker.distribution.manifest.v2+json",
        "tag": ["latest", "v1.2.0"],
        "timeCreatedMs": "1609459200000",
        "timeUploadedMs": "1609462800000"
    }"#;

    let info: ManifestInfo = serde_json::from_str(json).unwrap();
    assert_eq!(info.size, 28543264);
    assert_eq!(info.tags, vec!["latest", "v1.2.0"]);
    assert_eq!(info.created, ymd(2021, 1, 1));
    assert_eq!(info.uploaded, Utc.with_ymd_and_hms(2021, 1, 1, 1, 0, 0).unwrap());
}

#[test]
fn test_manifest_info_missing_fields_default() {
    let info: ManifestInfo = serde_json::from_str("{}").unwrap();
    assert_eq!(info.size, 0);
    assert!(info.tags.is_empty());
    assert_eq!(info.created, DateTime::UNIX_EPOCH);
}

#[test]
fn test_manifest_info_rejects_garbage_timestamp() {
    let result: Result<ManifestInfo, _> =
        serde_json::from_str(r#"{ "timeCreatedMs": "yesterday" }"#);
    let err = result.unwrap_err();
    assert!(err.to_string().contains("timeCreatedMs"));
}

#[test]
fn test_manifest_listing_decodes_response() {
    let json = r#"{
        "child": ["nested"],
        "manifest": {
            "sha256:aaa": { "timeCreatedMs": "1609459200000", "tag": ["old"] },
            "sha256:bbb": { "timeCreatedMs": "1654041600000", "tag": ["new"] }
        },
        "name": "project/app",
        "tags": ["new", "old"]
    }"#;

    let listing: ManifestListing = serde_json::from_str(json).unwrap();
    assert_eq!(listing.name, "project/app");
    assert_eq!(listing.children, vec!["nested"]);
    assert_eq!(listing.manifests.len(), 2);
}

#[test]
fn test_manifest_listing_merge_pages() {
    let mut first = ManifestListing {
        name: "project/app".to_string(),
        tags: vec!["a".to_string()],
        manifests: HashMap::from([("sha256:a".to_string(), info_created_at(ymd(2021, 1, 1)))]),
        children: vec![],
    };
    let second = ManifestListing {
        name: "project/app".to_string(),
        tags: vec!["b".to_string()],
        manifests: HashMap::from([("sha256:b".to_string(), info_created_at(ymd(2022, 1, 1)))]),
        children: vec!["child".to_string()],
    };

    first.merge(second);
    assert_eq!(first.tags, vec!["a", "b"]);
    assert_eq!(first.manifests.len(), 2);
    assert_eq!(first.children, vec!["child"]);
}

#[test]
fn test_sort_newest_first_orders_example() {
    let manifests = HashMap::from([
        ("digestA".to_string(), info_created_at(ymd(2021, 1, 1))),
        ("digestB".to_string(), info_created_at(ymd(2022, 6, 1))),
        ("digestC".to_string(), info_created_at(ymd(2021, 6, 15))),
    ]);

    let digests: Vec<String> = sort_newest_first(manifests)
        .into_iter()
        .map(|e| e.digest)
        .collect();
    assert_eq!(digests, vec!["digestB", "digestC", "digestA"]);
}

#[test]
fn test_sort_newest_first_keeps_every_entry_in_descending_order() {
    let manifests: HashMap<String, ManifestInfo> = (0..50)
        .map(|i| {
            let created = DateTime::from_timestamp_millis(1_600_000_000_000 + (i * 7919 % 50) * 86_400_000)
                .unwrap();
            (format!("sha256:{:04}", i), info_created_at(created))
        })
        .collect();

    let sorted = sort_newest_first(manifests.clone());
    assert_eq!(sorted.len(), manifests.len());
    for pair in sorted.windows(2) {
        assert!(pair[0].info.created >= pair[1].info.created);
    }
}

#[test]
fn test_sort_newest_first_is_idempotent() {
    let manifests = HashMap::from([
        ("sha256:1".to_string(), info_created_at(ymd(2020, 3, 1))),
        ("sha256:2".to_string(), info_created_at(ymd(2023, 3, 1))),
        ("sha256:3".to_string(), info_created_at(ymd(2021, 3, 1))),
    ]);

    let first = sort_newest_first(manifests.clone());
    let second = sort_newest_first(manifests);
    assert_eq!(first, second);
}

#[test]
fn test_sort_newest_first_breaks_ties_by_digest() {
    let same = ymd(2022, 2, 2);
    let manifests = HashMap::from([
        ("sha256:ccc".to_string(), info_created_at(same)),
        ("sha256:aaa".to_string(), info_created_at(same)),
        ("sha256:bbb".to_string(), info_created_at(same)),
    ]);

    let digests: Vec<String> = sort_newest_first(manifests)
        .into_iter()
        .map(|e| e.digest)
        .collect();
    assert_eq!(digests, vec!["sha256:aaa", "sha256:bbb", "sha256:ccc"]);
}

#[test]
fn test_sort_newest_first_empty() {
    assert!(sort_newest_first(HashMap::new()).is_empty());
}

#[test]
fn test_manifest_entry_serializes_flat() {
    let entry = ManifestEntry {
        digest: "sha256:abc".to_string(),
        info: info_created_at(ymd(2021, 1, 1)),
    };

    let value = serde_json::to_value(&entry).unwrap();
    assert_eq!(value["digest"], "sha256:abc");
    assert_eq!(value["created"], "2021-01-01T00:00:00Z");
    assert_eq!(value["size"], 1024);
}
