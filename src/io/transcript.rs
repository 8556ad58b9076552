use crate::models::{Language, StageKind, StageOutputs};

/// Formats the plain-text transcript of one analysis
///
/// Labelled concatenation of the idea and the four stage outputs under
/// the literal section separator.
pub fn format_transcript(idea: &str, outputs: &StageOutputs, language: Language) -> String {
    let labels = language.labels();
    let mut text = String::from("=== Business Analysis ===\n\n");

    text.push_str(labels.business_idea);
    text.push_str(":\n");
    text.push_str(idea);
    text.push_str("\n\n");

    for stage in StageKind::ALL {
        text.push_str(stage.label(labels));
        text.push_str(":\n");
        text.push_str(outputs.get(stage));
        if stage != StageKind::Strategy {
            text.push_str("\n\n");
        }
    }
    text
}
