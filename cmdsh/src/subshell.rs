//! Per-turn scoped terminal handle

use crate::error::{CmdshError, CmdshResult};
use crate::reader::LineReader;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Scoped handle through which a command handler reads and writes the
/// terminal for the duration of one dispatch.
///
/// All handlers matched in a turn share one `SubShell` (clones share the
/// destroyed flag). The driver destroys it once every handler has settled;
/// after that every operation fails with [`CmdshError::HandleDestroyed`], so
/// a stray continuation that outlives its turn can never write to a terminal
/// session it no longer owns.
#[derive(Clone)]
pub struct SubShell {
    reader: Arc<dyn LineReader>,
    destroyed: Arc<AtomicBool>,
}

impl SubShell {
    pub fn new(reader: Arc<dyn LineReader>) -> Self {
        Self {
            reader,
            destroyed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Read one line from the user under the given prompt.
    pub async fn read_line(&self, prompt: &str) -> CmdshResult<String> {
        self.check_destroyed()?;
        self.reader.read_line(prompt).await
    }

    /// Cancel a pending [`read_line`](Self::read_line), surfacing `reason`
    /// to whatever awaited it.
    pub async fn abort_read(&self, reason: &str) -> CmdshResult<()> {
        self.check_destroyed()?;
        self.reader.abort_read(reason);
        Ok(())
    }

    /// Write text to the terminal without a trailing line break.
    pub async fn print(&self, text: &str) -> CmdshResult<()> {
        self.check_destroyed()?;
        self.reader.print(text).await
    }

    /// Write text to the terminal followed by a line break.
    pub async fn println(&self, text: &str) -> CmdshResult<()> {
        self.check_destroyed()?;
        self.reader.print_line(text).await
    }

    /// Mark the handle destroyed. Idempotent; the flag never reverts.
    pub fn destroy(&self) {
        self.destroyed.store(true, Ordering::SeqCst);
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed.load(Ordering::SeqCst)
    }

    fn check_destroyed(&self) -> CmdshResult<()> {
        if self.is_destroyed() {
            return Err(CmdshError::HandleDestroyed);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct RecordingReader {
        output: Mutex<Vec<String>>,
    }

    impl RecordingReader {
        fn new() -> Self {
            Self {
                output: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl LineReader for RecordingReader {
        async fn read_line(&self, _prompt: &str) -> CmdshResult<String> {
            Ok("line".to_string())
        }

        fn abort_read(&self, _reason: &str) {}

        async fn print(&self, text: &str) -> CmdshResult<()> {
            self.output.lock().unwrap().push(text.to_string());
            Ok(())
        }

        async fn print_line(&self, text: &str) -> CmdshResult<()> {
            self.output.lock().unwrap().push(format!("{text}\n"));
            Ok(())
        }
    }

    #[tokio::test]
    async fn delegates_to_reader_while_live() {
        let reader = Arc::new(RecordingReader::new());
        let shell = SubShell::new(reader.clone());

        shell.print("a").await.unwrap();
        shell.println("b").await.unwrap();
        assert_eq!(shell.read_line("? ").await.unwrap(), "line");
        assert_eq!(*reader.output.lock().unwrap(), vec!["a", "b\n"]);
    }

    #[tokio::test]
    async fn destroyed_handle_rejects_every_operation() {
        let shell = SubShell::new(Arc::new(RecordingReader::new()));
        shell.destroy();

        assert!(matches!(
            shell.print("x").await,
            Err(CmdshError::HandleDestroyed)
        ));
        assert!(matches!(
            shell.println("x").await,
            Err(CmdshError::HandleDestroyed)
        ));
        assert!(matches!(
            shell.read_line("? ").await,
            Err(CmdshError::HandleDestroyed)
        ));
        assert!(matches!(
            shell.abort_read("why").await,
            Err(CmdshError::HandleDestroyed)
        ));
    }

    #[tokio::test]
    async fn destroy_is_idempotent() {
        let shell = SubShell::new(Arc::new(RecordingReader::new()));
        shell.destroy();
        shell.destroy();
        assert!(shell.is_destroyed());
    }

    #[tokio::test]
    async fn clones_share_the_destroyed_flag() {
        let shell = SubShell::new(Arc::new(RecordingReader::new()));
        let clone = shell.clone();
        shell.destroy();
        assert!(clone.is_destroyed());
        assert!(matches!(
            clone.print("x").await,
            Err(CmdshError::HandleDestroyed)
        ));
    }
}
