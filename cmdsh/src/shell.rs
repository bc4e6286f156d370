//! Shell driver: registration API and the REPL loop

use crate::error::{CmdshError, CmdshResult};
use crate::reader::LineReader;
use crate::registry::{into_handler, CommandRegistry};
use crate::subshell::SubShell;
use futures::future;
use std::future::Future;
use std::sync::Arc;
use tracing::debug;

/// Split a raw input line into tokens, respecting quoting.
///
/// The first token is the command name, the rest the positional arguments.
/// Unbalanced quoting is a turn-level error.
pub fn tokenize(line: &str) -> CmdshResult<Vec<String>> {
    shlex::split(line).ok_or_else(|| CmdshError::Tokenize(line.to_string()))
}

/// Command-dispatch shell over a [`LineReader`].
///
/// Owns the registry and the prompt, and drives the read-tokenize-dispatch
/// loop. One logical command per turn; turns are strictly sequential.
pub struct Shell {
    reader: Arc<dyn LineReader>,
    registry: CommandRegistry,
    prompt: String,
}

impl std::fmt::Debug for Shell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Shell")
            .field("prompt", &self.prompt)
            .finish_non_exhaustive()
    }
}

impl Shell {
    pub fn new(reader: Arc<dyn LineReader>) -> Self {
        Self {
            reader,
            registry: CommandRegistry::new(),
            prompt: "$ ".to_string(),
        }
    }

    /// Set the prompt printed before every read.
    pub fn set_prompt(&mut self, prompt: impl Into<String>) -> &mut Self {
        self.prompt = prompt.into();
        self
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Register a handler for a command name. Fails on a duplicate name.
    pub fn command<F, Fut>(&mut self, name: &str, handler: F) -> CmdshResult<&mut Self>
    where
        F: Fn(SubShell, String, Vec<String>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = CmdshResult<()>> + Send + 'static,
    {
        self.registry.register(name, into_handler(handler))?;
        Ok(self)
    }

    /// Register a handler called for *every* command, in addition to any
    /// specific handler. Replaces a previously set global handler.
    pub fn global_handler<F, Fut>(&mut self, handler: F) -> &mut Self
    where
        F: Fn(SubShell, String, Vec<String>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = CmdshResult<()>> + Send + 'static,
    {
        self.registry.set_global(into_handler(handler));
        self
    }

    /// Attach the shell's line reader (e.g. load history).
    pub fn attach(&self) -> CmdshResult<()> {
        self.reader.attach()
    }

    /// Detach the shell's line reader (e.g. save history).
    pub fn detach(&self) -> CmdshResult<()> {
        self.reader.detach()
    }

    /// Read-eval-print loop. Runs until the reader reaches end of input.
    ///
    /// Every turn-level failure is printed through the reader and swallowed;
    /// only an unusable reader ends the loop with an error.
    pub async fn run(&self) -> CmdshResult<()> {
        loop {
            let line = match self.reader.read_line(&self.prompt).await {
                Ok(line) => line,
                Err(CmdshError::Eof) => break,
                Err(CmdshError::Interrupted) => {
                    self.reader.print_line("^C").await.ok();
                    continue;
                }
                Err(e @ CmdshError::ReadAborted(_)) => {
                    self.report(&e).await;
                    continue;
                }
                Err(e) => {
                    // the reader itself failed; prompting again would spin
                    self.report(&e).await;
                    return Err(e);
                }
            };

            if let Err(e) = self.run_line(&line).await {
                self.report(&e).await;
            }
        }
        Ok(())
    }

    /// Execute one raw input line: tokenize and dispatch.
    ///
    /// A blank line, or a line tokenizing to an empty command, is a no-op.
    pub async fn run_line(&self, line: &str) -> CmdshResult<()> {
        let mut argv = tokenize(line)?;
        if argv.is_empty() {
            return Ok(());
        }
        let command = argv.remove(0);
        if command.is_empty() {
            return Ok(());
        }
        self.dispatch(&command, argv).await
    }

    /// Invoke every handler matched for `command` against one fresh
    /// [`SubShell`], concurrently, and wait for all of them to settle.
    ///
    /// The handle is destroyed before this returns, on success and failure
    /// alike. When several handlers fail, the first failure in handler start
    /// order (global first) is propagated; the rest still ran to completion.
    async fn dispatch(&self, command: &str, argv: Vec<String>) -> CmdshResult<()> {
        let handlers = self.registry.lookup(command);
        if handlers.is_empty() {
            return Err(CmdshError::UnknownCommand(command.to_string()));
        }
        debug!(command, handlers = handlers.len(), argc = argv.len(), "dispatching");

        let subshell = SubShell::new(Arc::clone(&self.reader));
        let invocations: Vec<_> = handlers
            .iter()
            .map(|handler| handler(subshell.clone(), command.to_string(), argv.clone()))
            .collect();
        let results = future::join_all(invocations).await;
        subshell.destroy();

        results.into_iter().find(Result::is_err).unwrap_or(Ok(()))
    }

    /// Print a turn-level failure as exactly one line through the reader.
    async fn report(&self, err: &CmdshError) {
        let mut msg = err.to_string();
        if msg.is_empty() {
            msg = "unknown error".to_string();
        }
        if self.reader.print_line(&msg).await.is_err() {
            tracing::warn!("failed to report turn error: {msg}");
        }
    }
}
