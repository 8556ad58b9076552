pub mod io;
pub mod llm;
pub mod models;
pub mod pdf;
pub mod pipeline;
pub mod ratelimit;
pub mod stages;
pub mod store;

pub use io::{format_transcript, zip_reports, ArtifactDir, ExportFormat};
pub use llm::{ChatClient, ChatConfig, GenerationError, TextGenerator};
pub use models::{Block, Language, ReportSpec, StageKind, StageOutputs, StoredReport};
pub use pdf::RenderError;
pub use pipeline::{BuildError, BuiltReport, ReportBuilder};
pub use ratelimit::RateLimiter;
pub use stages::{
    execute_generation, execute_render, normalize, segment, RenderConfig, Segmented, StageFailure,
};
pub use store::{NewUser, Store, StoreError, UserRecord};
