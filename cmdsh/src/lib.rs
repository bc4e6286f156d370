//! cmdsh - Command dispatch shell with a pluggable line reader
//!
//! This crate provides:
//! - A command registry mapping names to async handlers, plus a single
//!   global handler that fires for every command
//! - A REPL driver that reads, tokenizes, and dispatches one command per turn
//! - A per-turn [`SubShell`] handle bounding a handler's terminal access
//! - A rustyline-backed [`LineReader`] implementation with history and
//!   command-name completion

pub mod completer;
pub mod error;
pub mod reader;
pub mod registry;
pub mod shell;
pub mod subshell;

pub use error::{CmdshError, CmdshResult};
pub use reader::{EditorReader, LineReader};
pub use registry::{into_handler, CommandHandler, CommandRegistry};
pub use shell::{tokenize, Shell};
pub use subshell::SubShell;
