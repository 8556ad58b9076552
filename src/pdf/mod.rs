pub mod layout;
pub mod metrics;
pub mod page;
pub mod writer;

pub use layout::PageGeometry;
pub use page::{Color, Font, LogoImage, Op, RenderedPage};

/// Fatal rendering faults; missing optional assets are never one
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("invalid page geometry: {0}")]
    InvalidGeometry(String),
}
