//! Shared test support: a line reader fed from a fixed script.

use async_trait::async_trait;
use cmdsh::{CmdshError, CmdshResult, LineReader};
use std::collections::VecDeque;
use std::sync::Mutex;
use tokio::sync::Notify;

/// [`LineReader`] whose input comes from a prepared list of lines and whose
/// output is recorded for assertions. When the script runs out it reports
/// end of input, or, in blocking mode, parks until `abort_read` is called.
pub struct ScriptedReader {
    lines: Mutex<VecDeque<String>>,
    output: Mutex<Vec<String>>,
    prompts: Mutex<Vec<String>>,
    block_when_empty: bool,
    abort_reason: Mutex<Option<String>>,
    abort_notify: Notify,
}

impl ScriptedReader {
    pub fn new(lines: &[&str]) -> Self {
        Self::build(lines, false)
    }

    pub fn blocking_when_empty(lines: &[&str]) -> Self {
        Self::build(lines, true)
    }

    fn build(lines: &[&str], block_when_empty: bool) -> Self {
        Self {
            lines: Mutex::new(lines.iter().map(|s| (*s).to_string()).collect()),
            output: Mutex::new(Vec::new()),
            prompts: Mutex::new(Vec::new()),
            block_when_empty,
            abort_reason: Mutex::new(None),
            abort_notify: Notify::new(),
        }
    }

    /// Everything printed so far, one entry per print call.
    pub fn output(&self) -> Vec<String> {
        self.output.lock().unwrap().clone()
    }

    /// Every prompt shown so far, in order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LineReader for ScriptedReader {
    async fn read_line(&self, prompt: &str) -> CmdshResult<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());

        let next = self.lines.lock().unwrap().pop_front();
        if let Some(line) = next {
            return Ok(line);
        }
        if self.block_when_empty {
            self.abort_notify.notified().await;
            let reason = self.abort_reason.lock().unwrap().take().unwrap_or_default();
            return Err(CmdshError::ReadAborted(reason));
        }
        Err(CmdshError::Eof)
    }

    fn abort_read(&self, reason: &str) {
        *self.abort_reason.lock().unwrap() = Some(reason.to_string());
        self.abort_notify.notify_one();
    }

    async fn print(&self, text: &str) -> CmdshResult<()> {
        self.output.lock().unwrap().push(text.to_string());
        Ok(())
    }

    async fn print_line(&self, text: &str) -> CmdshResult<()> {
        self.output.lock().unwrap().push(text.to_string());
        Ok(())
    }
}
