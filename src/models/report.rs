use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Language, StageOutputs};

/// Assembled input to the document renderer
///
/// Constructed once per report build and consumed once; never persisted.
#[derive(Debug, Clone)]
pub struct ReportSpec {
    /// Raw idea text as entered by the user
    pub idea: String,
    /// The four stage outputs; the strategy text drives the report body
    pub outputs: StageOutputs,
    pub language: Language,
    /// Author label printed on the cover page
    pub username: String,
    /// Generation timestamp stamped on cover, header and footer
    pub generated_at: DateTime<Utc>,
}

/// A persisted report record, immutable once written
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredReport {
    pub id: Uuid,
    /// Owning username
    pub owner: String,
    pub idea: String,
    /// Plain-text transcript of the full analysis
    pub transcript: String,
    /// Rendered PDF bytes
    #[serde(skip_serializing)]
    pub document: Vec<u8>,
    pub language: Language,
    pub created_at: DateTime<Utc>,
}

impl StoredReport {
    pub fn new(
        owner: &str,
        idea: &str,
        transcript: String,
        document: Vec<u8>,
        language: Language,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner: owner.to_string(),
            idea: idea.to_string(),
            transcript,
            document,
            language,
            created_at,
        }
    }
}
