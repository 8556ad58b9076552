pub mod block;
pub mod language;
pub mod report;
pub mod stage;

pub use block::*;
pub use language::*;
pub use report::*;
pub use stage::*;
