use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::io::transcript::format_transcript;
use crate::llm::TextGenerator;
use crate::models::{Language, ReportSpec, StageOutputs, StoredReport};
use crate::pdf::RenderError;
use crate::stages::{execute_generation, execute_render, RenderConfig, StageFailure};
use crate::store::{ReportStore, StoreError};

/// A report-build failure before any artifact exists
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error(transparent)]
    Generation(#[from] StageFailure),

    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Artifacts of one successful build
///
/// A persistence failure does not invalidate the bytes: it is captured
/// here so the caller can still offer them for download while warning.
#[derive(Debug)]
pub struct BuiltReport {
    pub report_id: Uuid,
    pub transcript: String,
    pub document: Vec<u8>,
    pub outputs: StageOutputs,
    pub persist_error: Option<StoreError>,
}

/// Drives one report build: four generation stages, transcript,
/// rendering, and the storage hand-off
///
/// Collaborators are injected; the builder holds no ambient state and
/// independent builds share nothing.
pub struct ReportBuilder<'s, G> {
    generator: G,
    store: Option<&'s dyn ReportStore>,
    render_config: RenderConfig,
}

impl<'s, G: TextGenerator> ReportBuilder<'s, G> {
    pub fn new(generator: G) -> Self {
        Self {
            generator,
            store: None,
            render_config: RenderConfig::default(),
        }
    }

    pub fn with_store(mut self, store: &'s dyn ReportStore) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_render_config(mut self, config: RenderConfig) -> Self {
        self.render_config = config;
        self
    }

    /// Builds one report; fails fast on the first stage failure with
    /// nothing persisted
    pub async fn build(
        &self,
        idea: &str,
        language: Language,
        username: &str,
    ) -> Result<BuiltReport, BuildError> {
        let outputs = execute_generation(&self.generator, idea, language).await?;

        let transcript = format_transcript(idea, &outputs, language);
        let spec = ReportSpec {
            idea: idea.to_string(),
            outputs: outputs.clone(),
            language,
            username: username.to_string(),
            generated_at: Utc::now(),
        };
        let document = execute_render(&spec, &self.render_config)?;
        info!(bytes = document.len(), "report rendered");

        let stored = StoredReport::new(
            username,
            idea,
            transcript.clone(),
            document.clone(),
            language,
            spec.generated_at,
        );
        let persist_error = match self.store {
            Some(store) => store.persist(&stored).err(),
            None => None,
        };
        if let Some(err) = &persist_error {
            warn!(report_id = %stored.id, "persisting report failed: {err}");
        }

        Ok(BuiltReport {
            report_id: stored.id,
            transcript,
            document,
            outputs,
            persist_error,
        })
    }
}
