use std::fmt;

use serde::{Deserialize, Serialize};

use super::Labels;

/// One of the four sequential generation stages
///
/// Each stage consumes the idea text plus the labelled outputs of all
/// previous stages, and runs at a fixed creativity setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageKind {
    Clarity,
    Niche,
    Action,
    Strategy,
}

impl StageKind {
    /// All stages in execution order
    pub const ALL: [StageKind; 4] = [
        StageKind::Clarity,
        StageKind::Niche,
        StageKind::Action,
        StageKind::Strategy,
    ];

    /// Fixed per-stage sampling temperature, set at the system level
    pub fn temperature(&self) -> f32 {
        match self {
            StageKind::Clarity => 0.7,
            StageKind::Niche => 0.9,
            StageKind::Action => 1.0,
            StageKind::Strategy => 0.8,
        }
    }

    /// Stage name used in logs and error messages
    pub fn name(&self) -> &'static str {
        match self {
            StageKind::Clarity => "clarity",
            StageKind::Niche => "niche",
            StageKind::Action => "action",
            StageKind::Strategy => "strategy",
        }
    }

    /// Section label for this stage in the given language
    pub fn label(&self, labels: &Labels) -> &'static str {
        match self {
            StageKind::Clarity => labels.clarity_analysis,
            StageKind::Niche => labels.niche_strategy,
            StageKind::Action => labels.action_plan,
            StageKind::Strategy => labels.business_strategy,
        }
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The four raw stage outputs of one report build
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageOutputs {
    pub clarity: String,
    pub niche: String,
    pub action: String,
    pub strategy: String,
}

impl StageOutputs {
    pub fn get(&self, stage: StageKind) -> &str {
        match stage {
            StageKind::Clarity => &self.clarity,
            StageKind::Niche => &self.niche,
            StageKind::Action => &self.action,
            StageKind::Strategy => &self.strategy,
        }
    }
}
