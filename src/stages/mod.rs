pub mod generate;
pub mod normalize;
pub mod render;
pub mod segment;

pub use generate::{execute_generation, StageFailure};
pub use normalize::normalize;
pub use render::{execute_render, RenderConfig};
pub use segment::{blocks, segment, Segmented, ACTION_MARKER};
