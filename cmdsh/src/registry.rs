//! Command registry: name -> handler mapping plus the global handler slot

use crate::error::{CmdshError, CmdshResult};
use crate::subshell::SubShell;
use futures::future::BoxFuture;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tracing::debug;

/// Future returned by a command handler invocation.
pub type HandlerFuture = BoxFuture<'static, CmdshResult<()>>;

/// A callback for a command, executed when the user types the command.
///
/// Receives a scoped [`SubShell`] for terminal access, the command name that
/// triggered it, and the argument list (not including the command name).
pub type CommandHandler = Arc<dyn Fn(SubShell, String, Vec<String>) -> HandlerFuture + Send + Sync>;

/// Box an async closure into a [`CommandHandler`].
pub fn into_handler<F, Fut>(f: F) -> CommandHandler
where
    F: Fn(SubShell, String, Vec<String>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = CmdshResult<()>> + Send + 'static,
{
    Arc::new(move |shell, command, argv| Box::pin(f(shell, command, argv)))
}

/// Mapping from command name to handler, plus at most one global handler.
///
/// Command names are case-sensitive and unique; registering a duplicate is an
/// error, not an overwrite. The global handler slot holds a single handler
/// (last write wins) that fires for every command *in addition to* any
/// specific handler.
#[derive(Clone, Default)]
pub struct CommandRegistry {
    handlers: HashMap<String, CommandHandler>,
    global: Option<CommandHandler>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for `name`. Fails if the name is already taken,
    /// leaving the existing registration intact.
    pub fn register(&mut self, name: &str, handler: CommandHandler) -> CmdshResult<()> {
        if self.handlers.contains_key(name) {
            return Err(CmdshError::DuplicateCommand(name.to_string()));
        }
        self.handlers.insert(name.to_string(), handler);
        debug!(command = name, "registered command");
        Ok(())
    }

    /// Replace the global handler. May be called multiple times; the last
    /// write wins.
    pub fn set_global(&mut self, handler: CommandHandler) {
        self.global = Some(handler);
    }

    /// Resolve the handlers for `name`: the global handler (if set) followed
    /// by the specific handler (if registered). Empty when neither exists.
    pub fn lookup(&self, name: &str) -> Vec<CommandHandler> {
        let mut handlers = Vec::new();
        if let Some(global) = &self.global {
            handlers.push(Arc::clone(global));
        }
        if let Some(specific) = self.handlers.get(name) {
            handlers.push(Arc::clone(specific));
        }
        handlers
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Registered command names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.handlers.keys().cloned().collect();
        names.sort();
        names
    }
}
