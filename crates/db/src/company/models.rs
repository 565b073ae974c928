use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle state of a submitted company. Every ingested record starts
/// out pending; an administrator moves it to accepted or rejected.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CompanyStatus {
    Pending,
    Accepted,
    Rejected,
}

impl CompanyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }
}

impl FromStr for CompanyStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(Self::Pending),
            "accepted" => Ok(Self::Accepted),
            "rejected" => Ok(Self::Rejected),
            _ => Err(format!("unknown company status: {value}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Company {
    pub id: Uuid,
    pub name: Option<String>,
    pub url: Option<String>,
    /// Logo URL as submitted on the form.
    pub logo_submitted: Option<String>,
    /// Curated logo asset set by an administrator.
    pub logo: Option<String>,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    pub twitter: Option<String>,
    pub founded_year: Option<String>,
    pub date_submitted: Option<DateTime<Utc>>,
    pub status: CompanyStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A submission as produced by the sync path, before it has an id or status.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCompany {
    pub name: Option<String>,
    pub url: Option<String>,
    pub logo_submitted: Option<String>,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    pub twitter: Option<String>,
    pub founded_year: Option<String>,
    pub date_submitted: DateTime<Utc>,
}

/// The public-listing projection of a company.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyCard {
    pub name: Option<String>,
    pub url: Option<String>,
    pub logo: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CompanyFilter {
    pub status: Option<CompanyStatus>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Outcome of a batch ingest commit.
///
/// `raced` is set when the watermark no longer held the value the sync
/// started from, meaning a concurrent sync advanced it in the meantime.
/// The commit still goes through (last writer wins).
#[derive(Debug, Clone, Copy)]
pub struct IngestCommit {
    pub inserted: usize,
    pub raced: bool,
}
