use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Key of the single watermark row in the `pairs` table.
pub const SINCE_KEY: &str = "since";

/// A key/value pair row. The one row with key "since" holds the
/// epoch-seconds boundary of already-ingested survey responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Watermark {
    pub key: String,
    pub val: String,
    pub updated_at: DateTime<Utc>,
}

impl Watermark {
    /// The value as epoch seconds, when it parses as one.
    pub fn epoch(&self) -> Option<i64> {
        self.val.parse().ok()
    }
}
