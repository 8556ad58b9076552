use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Report output language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "en")]
    English,
    #[serde(rename = "nl")]
    Dutch,
}

impl Language {
    /// Two-letter language code used in storage and filenames
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Dutch => "nl",
        }
    }

    /// Fixed label table for this language
    pub fn labels(&self) -> &'static Labels {
        match self {
            Language::English => &EN_LABELS,
            Language::Dutch => &NL_LABELS,
        }
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "en" | "english" => Ok(Language::English),
            "nl" | "dutch" => Ok(Language::Dutch),
            other => Err(format!("unknown language code: {other}")),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Fixed report strings for one language
#[derive(Debug)]
pub struct Labels {
    pub report_title: &'static str,
    pub business_idea: &'static str,
    pub initial_idea: &'static str,
    pub clarity_analysis: &'static str,
    pub niche_strategy: &'static str,
    pub action_plan: &'static str,
    pub business_strategy: &'static str,
    pub todo_list: &'static str,
    pub table_of_contents: &'static str,
    pub page: &'static str,
    pub generated_on: &'static str,
    pub generated_for: &'static str,
    pub confidential: &'static str,
}

static EN_LABELS: Labels = Labels {
    report_title: "Business Strategy Report",
    business_idea: "Business Idea",
    initial_idea: "Initial Business Idea",
    clarity_analysis: "Clarity Analysis",
    niche_strategy: "Niche Strategy",
    action_plan: "Action Plan",
    business_strategy: "Business Strategy",
    todo_list: "Action Items",
    table_of_contents: "Table of Contents",
    page: "Page",
    generated_on: "Generated on",
    generated_for: "Generated for",
    confidential: "CONFIDENTIAL",
};

static NL_LABELS: Labels = Labels {
    report_title: "Business Strategie Rapport",
    business_idea: "Business Idee",
    initial_idea: "Initieel Business Idee",
    clarity_analysis: "Helderheidsanalyse",
    niche_strategy: "Niche Strategie",
    action_plan: "Actieplan",
    business_strategy: "Business Strategie",
    todo_list: "Actiepunten",
    table_of_contents: "Inhoudsopgave",
    page: "Pagina",
    generated_on: "Gegenereerd op",
    generated_for: "Gegenereerd voor",
    confidential: "VERTROUWELIJK",
};
