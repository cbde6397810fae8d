//! Display-side collaborators: commit surfaces and a terminal preview.

mod surface;
mod terminal;

pub use surface::{NullSurface, RecordingSurface, Surface};
pub use terminal::{TerminalEncoder, TerminalMode};
