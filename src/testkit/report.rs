//! Builders for report and user documents.

use chrono::{DateTime, Utc};

use crate::domain::{Report, ReportId, UserAccount};

/// A minimal report created at the given instant: no tags, no neighborhood.
pub fn report_at(created_at: DateTime<Utc>) -> Report {
    Report {
        id: ReportId::generate(),
        description: "test report".to_string(),
        tags: Vec::new(),
        neighborhood: None,
        created_at: Some(created_at),
        submitted_date: None,
        submitted_time: None,
    }
}

/// A report created at the given instant carrying the given tags.
pub fn report_with_tags(created_at: DateTime<Utc>, tags: &[&str]) -> Report {
    Report {
        tags: tags.iter().map(|t| t.to_string()).collect(),
        ..report_at(created_at)
    }
}

/// A report created at the given instant in the given neighborhood.
pub fn report_in(created_at: DateTime<Utc>, neighborhood: &str) -> Report {
    Report {
        neighborhood: Some(neighborhood.to_string()),
        ..report_at(created_at)
    }
}

/// A user account created at the given instant.
pub fn user_at(created_at: DateTime<Utc>) -> UserAccount {
    UserAccount {
        id: uuid::Uuid::new_v4().to_string(),
        created_at: Some(created_at),
    }
}
