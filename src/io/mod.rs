pub mod export;
pub mod files;
pub mod transcript;

pub use export::{zip_reports, ExportFormat};
pub use files::ArtifactDir;
pub use transcript::format_transcript;
