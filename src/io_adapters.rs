use crate::repl::{LineSource, ReadOutcome};
use anyhow::Result;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::{Result as IoResult, Write};
use std::rc::Rc;

/// Memory-backed writer for capturing what commands print.
///
/// Clones share the same buffer, so one handle can be given to the loop while another
/// is kept to inspect the output afterwards.
#[derive(Debug, Clone, Default)]
pub struct MemWriter {
    buf: Rc<RefCell<Vec<u8>>>,
}

impl MemWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded as UTF-8.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buf.borrow()).into_owned()
    }
}

impl Write for MemWriter {
    fn write(&mut self, data: &[u8]) -> IoResult<usize> {
        self.buf.borrow_mut().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> IoResult<()> {
        Ok(())
    }
}

/// Line source fed from memory, for scripted sessions and tests.
///
/// Yields the queued outcomes in order and [`ReadOutcome::Eof`] once they run out.
#[derive(Debug, Default)]
pub struct ScriptedLines {
    queue: VecDeque<ReadOutcome>,
    prompts: Vec<String>,
    history: Vec<String>,
}

impl ScriptedLines {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            queue: lines.into_iter().map(|l| ReadOutcome::Line(l.into())).collect(),
            ..Self::default()
        }
    }

    /// Queue an interrupt, as if the user pressed Ctrl-C at the prompt.
    pub fn interrupt(mut self) -> Self {
        self.queue.push_back(ReadOutcome::Interrupted);
        self
    }

    pub fn line(mut self, line: impl Into<String>) -> Self {
        self.queue.push_back(ReadOutcome::Line(line.into()));
        self
    }

    /// Prompts shown so far, one per read.
    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Number of queued outcomes not yet read.
    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}

impl LineSource for ScriptedLines {
    fn read_line(&mut self, prompt: &str) -> Result<ReadOutcome> {
        self.prompts.push(prompt.to_string());
        Ok(self.queue.pop_front().unwrap_or(ReadOutcome::Eof))
    }

    fn add_history(&mut self, line: &str) -> Result<()> {
        self.history.push(line.to_string());
        Ok(())
    }
}
