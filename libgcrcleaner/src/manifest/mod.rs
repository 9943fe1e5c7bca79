//! Manifest metadata returned by a repository listing.
//!
//! The registry reports one entry per manifest digest. Sizes and timestamps
//! arrive as decimal strings (timestamps in milliseconds since the Unix
//! epoch) and are decoded into typed fields here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[cfg(test)]
mod tests;

/// Metadata describing one manifest in a repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawManifestInfo")]
pub struct ManifestInfo {
    /// Total image size in bytes
    pub size: u64,
    /// Manifest media type
    pub media_type: String,
    /// When the image was created
    pub created: DateTime<Utc>,
    /// When the manifest was pushed to the registry
    pub uploaded: DateTime<Utc>,
    /// Tags currently pointing at this manifest
    pub tags: Vec<String>,
}

/// Wire shape of a manifest entry.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawManifestInfo {
    #[serde(default)]
    image_size_bytes: String,
    #[serde(default)]
    media_type: String,
    #[serde(default)]
    time_created_ms: String,
    #[serde(default)]
    time_uploaded_ms: String,
    #[serde(default)]
    tag: Vec<String>,
}

impl TryFrom<RawManifestInfo> for ManifestInfo {
    type Error = String;

    fn try_from(raw: RawManifestInfo) -> Result<Self, Self::Error> {
        Ok(Self {
            size: parse_number("imageSizeBytes", &raw.image_size_bytes)?,
            media_type: raw.media_type,
            created: parse_millis("timeCreatedMs", &raw.time_created_ms)?,
            uploaded: parse_millis("timeUploadedMs", &raw.time_uploaded_ms)?,
            tags: raw.tag,
        })
    }
}

fn parse_number(field: &str, value: &str) -> Result<u64, String> {
    if value.is_empty() {
        return Ok(0);
    }
    value
        .parse()
        .map_err(|e| format!("invalid {} '{}': {}", field, value, e))
}

fn parse_millis(field: &str, value: &str) -> Result<DateTime<Utc>, String> {
    if value.is_empty() {
        return Ok(DateTime::UNIX_EPOCH);
    }
    let millis: i64 = value
        .parse()
        .map_err(|e| format!("invalid {} '{}': {}", field, value, e))?;
    DateTime::from_timestamp_millis(millis)
        .ok_or_else(|| format!("{} '{}' is out of range", field, value))
}

/// Response of the `tags/list` endpoint, with all pages merged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ManifestListing {
    /// Repository path as reported by the registry
    #[serde(default)]
    pub name: String,
    /// All tag names in the repository
    #[serde(default)]
    pub tags: Vec<String>,
    /// Manifests keyed by digest
    #[serde(default, rename = "manifest")]
    pub manifests: HashMap<String, ManifestInfo>,
    /// Names of nested repositories
    #[serde(default, rename = "child")]
    pub children: Vec<String>,
}

impl ManifestListing {
    /// Folds a following page into this listing.
    pub fn merge(&mut self, page: ManifestListing) {
        if self.name.is_empty() {
            self.name = page.name;
        }
        self.tags.extend(page.tags);
        self.manifests.extend(page.manifests);
        self.children.extend(page.children);
    }

    /// Consumes the listing and returns its manifests, newest first.
    pub fn into_sorted_entries(self) -> Vec<ManifestEntry> {
        sort_newest_first(self.manifests)
    }
}

/// A manifest digest paired with its metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManifestEntry {
    /// Manifest digest (e.g., "sha256:...")
    pub digest: String,
    /// Metadata reported by the registry for this digest
    #[serde(flatten)]
    pub info: ManifestInfo,
}

/// Orders manifests by creation time, newest first.
///
/// Entries created at the same instant are ordered by digest so the output
/// does not depend on map iteration order.
///
/// # Examples
///
/// ```
/// use chrono::DateTime;
/// use libgcrcleaner::manifest::{ManifestInfo, sort_newest_first};
/// use std::collections::HashMap;
///
/// let info = |ms| ManifestInfo {
///     size: 0,
///     media_type: String::new(),
///     created: DateTime::from_timestamp_millis(ms).unwrap(),
///     uploaded: DateTime::from_timestamp_millis(ms).unwrap(),
///     tags: vec![],
/// };
/// let manifests = HashMap::from([
///     ("sha256:old".to_string(), info(1_000)),
///     ("sha256:new".to_string(), info(2_000)),
/// ]);
///
/// let sorted = sort_newest_first(manifests);
/// assert_eq!(sorted[0].digest, "sha256:new");
/// ```
pub fn sort_newest_first(manifests: HashMap<String, ManifestInfo>) -> Vec<ManifestEntry> {
    let mut entries: Vec<ManifestEntry> = manifests
        .into_iter()
        .map(|(digest, info)| ManifestEntry { digest, info })
        .collect();

    entries.sort_by(|a, b| {
        b.info
            .created
            .cmp(&a.info.created)
            .then_with(|| a.digest.cmp(&b.digest))
    });

    entries
}
