use tracing::info;

use crate::llm::{system_prompt, GenerationError, TextGenerator};
use crate::models::{Language, StageKind, StageOutputs};

/// A generation stage that did not return usable text
///
/// Aborts the whole build; later stages are never invoked and nothing
/// is persisted.
#[derive(Debug, thiserror::Error)]
#[error("stage {stage} failed: {source}")]
pub struct StageFailure {
    pub stage: StageKind,
    #[source]
    pub source: GenerationError,
}

/// Executes the four generation stages in order
///
/// Each stage consumes the idea text plus the labelled outputs of all
/// previous stages and runs at its fixed temperature. The first failure
/// aborts the sequence.
pub async fn execute_generation(
    generator: &impl TextGenerator,
    idea: &str,
    language: Language,
) -> Result<StageOutputs, StageFailure> {
    let labels = language.labels();
    let mut completed: Vec<(StageKind, String)> = Vec::with_capacity(4);

    for stage in StageKind::ALL {
        let input = stage_input(idea, &completed, labels);
        info!(stage = stage.name(), "running generation stage");
        let output = generator
            .generate(system_prompt(stage), &input, stage.temperature())
            .await
            .map_err(|source| StageFailure { stage, source })?;
        info!(stage = stage.name(), chars = output.len(), "stage complete");
        completed.push((stage, output));
    }

    let mut outputs = completed.into_iter();
    Ok(StageOutputs {
        clarity: outputs.next().map(|(_, text)| text).unwrap_or_default(),
        niche: outputs.next().map(|(_, text)| text).unwrap_or_default(),
        action: outputs.next().map(|(_, text)| text).unwrap_or_default(),
        strategy: outputs.next().map(|(_, text)| text).unwrap_or_default(),
    })
}

/// Builds one stage's user input: the idea followed by the labelled
/// outputs of every completed stage
fn stage_input(
    idea: &str,
    completed: &[(StageKind, String)],
    labels: &crate::models::Labels,
) -> String {
    let mut input = idea.to_string();
    for (i, (stage, output)) in completed.iter().enumerate() {
        input.push_str(if i == 0 { "\n\n" } else { "\n" });
        input.push_str(stage.label(labels));
        input.push_str(": ");
        input.push_str(output);
    }
    input
}

#[cfg(test)]
pub(crate) mod testing {
    use std::future::Future;
    use std::sync::Mutex;

    use crate::llm::{GenerationError, TextGenerator};

    /// Scripted generator: answers from a queue and records every call
    pub struct ScriptedGenerator {
        responses: Mutex<Vec<Result<String, GenerationError>>>,
        pub calls: Mutex<Vec<(String, f32)>>,
    }

    impl ScriptedGenerator {
        pub fn new(responses: Vec<Result<String, GenerationError>>) -> Self {
            let mut responses = responses;
            responses.reverse();
            Self {
                responses: Mutex::new(responses),
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    impl TextGenerator for ScriptedGenerator {
        fn generate(
            &self,
            _system: &str,
            user: &str,
            temperature: f32,
        ) -> impl Future<Output = Result<String, GenerationError>> + Send {
            self.calls
                .lock()
                .unwrap()
                .push((user.to_string(), temperature));
            let response = self
                .responses
                .lock()
                .unwrap()
                .pop()
                .unwrap_or(Err(GenerationError::EmptyResponse));
            async move { response }
        }
    }
}
