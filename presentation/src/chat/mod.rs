//! Interactive chat module
//!
//! Provides a line-editor based chat with the interview coach and the
//! console observer that renders streamed answers.

mod observer;
mod repl;

pub use observer::ConsoleObserver;
pub use repl::ChatRepl;
