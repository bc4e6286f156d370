//! Line reader boundary: the trait the shell core consumes, plus the
//! rustyline-backed interactive implementation.

use crate::completer::CommandCompleter;
use crate::error::{CmdshError, CmdshResult};
use async_trait::async_trait;
use rustyline::history::DefaultHistory;
use rustyline::{CompletionType, Config, Editor};
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;
use tracing::{debug, warn};

/// Prompted line input and simple print output.
///
/// The shell core owns no terminal presentation of its own; everything a
/// turn reads or prints goes through this interface. Any rejection from
/// these operations is an ordinary turn failure.
#[async_trait]
pub trait LineReader: Send + Sync {
    /// Display `prompt` and suspend until a full line is available.
    async fn read_line(&self, prompt: &str) -> CmdshResult<String>;

    /// Cancel a pending `read_line`, surfacing `reason` to the awaiter.
    fn abort_read(&self, reason: &str);

    /// Write text without a trailing line break.
    async fn print(&self, text: &str) -> CmdshResult<()>;

    /// Write text followed by a line break.
    async fn print_line(&self, text: &str) -> CmdshResult<()>;

    /// Lifecycle hook invoked when a shell attaches to this reader.
    fn attach(&self) -> CmdshResult<()> {
        Ok(())
    }

    /// Lifecycle hook invoked when a shell detaches from this reader.
    fn detach(&self) -> CmdshResult<()> {
        Ok(())
    }
}

/// Interactive [`LineReader`] backed by a rustyline editor.
///
/// Reads run on the blocking pool and race against an abort channel, so an
/// `abort_read` releases the awaiting caller immediately. History is
/// recorded per accepted line; `attach`/`detach` load and save the history
/// file when history is enabled.
pub struct EditorReader {
    editor: Arc<Mutex<Editor<CommandCompleter, DefaultHistory>>>,
    abort_tx: broadcast::Sender<String>,
    history_path: Option<PathBuf>,
}

impl EditorReader {
    pub fn new(shell_config: &cmdsh_config::ShellConfig) -> CmdshResult<Self> {
        let config = Config::builder()
            .completion_type(CompletionType::List)
            .max_history_size(shell_config.history.max_entries)?
            .history_ignore_dups(true)?
            .history_ignore_space(true)
            .build();

        let mut editor: Editor<CommandCompleter, DefaultHistory> = Editor::with_config(config)?;
        editor.set_helper(Some(CommandCompleter::default()));

        let history_path = shell_config
            .history
            .enabled
            .then(|| expand_home(&shell_config.history.file));

        let (abort_tx, _) = broadcast::channel(8);

        Ok(Self {
            editor: Arc::new(Mutex::new(editor)),
            abort_tx,
            history_path,
        })
    }

    /// Seed the completer with the registered command names.
    pub fn set_commands(&self, names: &[String]) {
        let mut editor = self.editor.lock().unwrap();
        if let Some(helper) = editor.helper_mut() {
            helper.set_commands(names.to_vec());
        }
    }
}

#[async_trait]
impl LineReader for EditorReader {
    async fn read_line(&self, prompt: &str) -> CmdshResult<String> {
        let mut abort_rx = self.abort_tx.subscribe();
        let editor = Arc::clone(&self.editor);
        let prompt = prompt.to_string();

        let read = tokio::task::spawn_blocking(move || {
            let mut editor = editor.lock().unwrap();
            let line = editor.readline(&prompt)?;
            let _ = editor.add_history_entry(line.as_str());
            Ok::<String, rustyline::error::ReadlineError>(line)
        });

        // The blocking readline keeps its thread until the terminal supplies
        // input; only the await is released on abort.
        tokio::select! {
            result = read => match result {
                Ok(Ok(line)) => Ok(line),
                Ok(Err(e)) => Err(e.into()),
                Err(e) => Err(CmdshError::Readline(e.to_string())),
            },
            reason = abort_rx.recv() => {
                Err(CmdshError::ReadAborted(reason.unwrap_or_default()))
            }
        }
    }

    fn abort_read(&self, reason: &str) {
        // No receiver means no pending read; nothing to cancel.
        let _ = self.abort_tx.send(reason.to_string());
    }

    async fn print(&self, text: &str) -> CmdshResult<()> {
        let mut out = std::io::stdout();
        out.write_all(text.as_bytes())?;
        out.flush()?;
        Ok(())
    }

    async fn print_line(&self, text: &str) -> CmdshResult<()> {
        let mut out = std::io::stdout();
        out.write_all(text.as_bytes())?;
        out.write_all(b"\n")?;
        out.flush()?;
        Ok(())
    }

    fn attach(&self) -> CmdshResult<()> {
        if let Some(path) = &self.history_path {
            if let Err(e) = self.editor.lock().unwrap().load_history(path) {
                debug!("no history loaded from {}: {}", path.display(), e);
            }
        }
        Ok(())
    }

    fn detach(&self) -> CmdshResult<()> {
        if let Some(path) = &self.history_path {
            if let Err(e) = self.editor.lock().unwrap().save_history(path) {
                warn!("failed to save history to {}: {}", path.display(), e);
            }
        }
        Ok(())
    }
}

fn expand_home(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        dirs_home().join(stripped)
    } else {
        PathBuf::from(path)
    }
}

fn dirs_home() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expand_home_resolves_tilde() {
        std::env::set_var("HOME", "/home/test");
        assert_eq!(
            expand_home("~/.cmdsh_history"),
            PathBuf::from("/home/test/.cmdsh_history")
        );
        assert_eq!(expand_home("/tmp/hist"), PathBuf::from("/tmp/hist"));
    }
}
