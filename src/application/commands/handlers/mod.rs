//! Command Handlers 实现

mod synthesize_handler;
mod transcribe_handler;

pub use synthesize_handler::*;
pub use transcribe_handler::*;
