//! Error types for cmdsh

use thiserror::Error;

/// Result type alias for cmdsh operations
pub type CmdshResult<T> = Result<T, CmdshError>;

/// Error types for cmdsh shell operations
#[derive(Error, Debug)]
pub enum CmdshError {
    /// A command name was registered twice
    #[error("Command already registered: {0}")]
    DuplicateCommand(String),

    /// No specific or global handler matched a typed command
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    /// A scoped shell handle was used after its turn ended
    #[error("Terminal destroyed")]
    HandleDestroyed,

    /// A pending read was cancelled via `abort_read`
    #[error("Read aborted: {0}")]
    ReadAborted(String),

    /// The input line could not be split into tokens
    #[error("Unbalanced quoting in input: {0}")]
    Tokenize(String),

    /// Free-form failure produced by a command handler
    #[error("{0}")]
    Handler(String),

    /// The line reader was interrupted (Ctrl-C)
    #[error("interrupted")]
    Interrupted,

    /// The line reader reached end of input (Ctrl-D)
    #[error("end of input")]
    Eof,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Line editor error
    #[error("Readline error: {0}")]
    Readline(String),
}

impl CmdshError {
    /// Build a handler failure from any displayable message.
    pub fn handler(msg: impl Into<String>) -> Self {
        Self::Handler(msg.into())
    }
}

impl From<rustyline::error::ReadlineError> for CmdshError {
    fn from(err: rustyline::error::ReadlineError) -> Self {
        use rustyline::error::ReadlineError;
        match err {
            ReadlineError::Eof => Self::Eof,
            ReadlineError::Interrupted => Self::Interrupted,
            ReadlineError::Io(e) => Self::Io(e),
            other => Self::Readline(other.to_string()),
        }
    }
}
