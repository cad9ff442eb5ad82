//! Console output helpers

pub mod console;
pub mod markdown;
