//! Typed document shapes for the two collections the dashboard consumes.
//!
//! The store delivers loosely-shaped JSON documents; these types pin down
//! each field with explicit optionality and defined fallbacks. A timestamp
//! that is present but not a valid instant deserializes to `None` and is
//! treated exactly like a missing one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Sentinel neighborhood for reports that carry none.
pub const UNKNOWN_NEIGHBORHOOD: &str = "Unknown";

/// Identifier of a stored report document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReportId(pub String);

impl ReportId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl std::fmt::Display for ReportId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One submitted citizen report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub id: ReportId,
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub neighborhood: Option<String>,
    /// Server-assigned creation instant. `None` when absent or unparseable.
    #[serde(default, deserialize_with = "lenient_instant")]
    pub created_at: Option<DateTime<Utc>>,
    /// Human-readable submission date stamped by the write path.
    #[serde(default)]
    pub submitted_date: Option<String>,
    /// Human-readable submission time stamped by the write path.
    #[serde(default)]
    pub submitted_time: Option<String>,
}

impl Report {
    /// Trimmed, non-empty tags. A report with K distinct tags contributes
    /// to K tag buckets.
    pub fn clean_tags(&self) -> impl Iterator<Item = &str> {
        self.tags
            .iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
    }

    /// Trimmed neighborhood, falling back to the sentinel when absent or blank.
    pub fn neighborhood_or_unknown(&self) -> &str {
        match self.neighborhood.as_deref().map(str::trim) {
            Some(n) if !n.is_empty() => n,
            _ => UNKNOWN_NEIGHBORHOOD,
        }
    }
}

/// A registered user account. Only the creation instant is consumed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: String,
    #[serde(default, deserialize_with = "lenient_instant")]
    pub created_at: Option<DateTime<Utc>>,
}

/// The fields a caller supplies on the write path. The store stamps the
/// server-side timestamp and the formatted date/time strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportDraft {
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub neighborhood: Option<String>,
}

/// Anything with an optional creation instant. Lets reports and users share
/// the windowed aggregation functions.
pub trait Created {
    fn created_at(&self) -> Option<DateTime<Utc>>;
}

impl Created for Report {
    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }
}

impl Created for UserAccount {
    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }
}

/// Deserialize an RFC 3339 instant, mapping absent, null, or malformed
/// values to `None` instead of failing the whole document.
fn lenient_instant<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|value| match value {
        serde_json::Value::String(s) => DateTime::parse_from_rfc3339(&s)
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        // Numeric epoch seconds, as some store clients write.
        serde_json::Value::Number(n) => n
            .as_i64()
            .and_then(|secs| DateTime::from_timestamp(secs, 0)),
        _ => None,
    }))
}
