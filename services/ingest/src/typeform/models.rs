use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One question definition from the remote form. The id is the opaque key
/// answers are stored under; `question` is the free-text label shown to
/// respondents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub question: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseMetadata {
    /// Submission timestamp, `YYYY-MM-DD HH:MM:SS`.
    pub date_land: String,
}

/// One completed survey submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormResponse {
    pub metadata: ResponseMetadata,
    #[serde(default)]
    pub answers: HashMap<String, String>,
}

/// The v0 form document: question definitions plus completed responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormPayload {
    #[serde(default)]
    pub questions: Vec<Question>,
    #[serde(default)]
    pub responses: Vec<FormResponse>,
}
