use crate::table::{CommandTable, Entry};
use anyhow::{Context, Result};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::io::Write;
use tracing::{debug, trace};

/// What a single read from a [`LineSource`] produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    Line(String),
    /// The user pressed Ctrl-C while the prompt was shown.
    Interrupted,
    /// No more input will ever arrive.
    Eof,
}

/// Source of input lines for [`MainLoop`].
pub trait LineSource {
    /// Show `prompt` and block until a line, an interrupt or end of input.
    fn read_line(&mut self, prompt: &str) -> Result<ReadOutcome>;

    /// Remember a line the user entered.
    fn add_history(&mut self, line: &str) -> Result<()>;
}

/// Terminal line editor backed by [`rustyline`].
pub struct EditorLines {
    editor: DefaultEditor,
}

impl EditorLines {
    pub fn new() -> Result<Self> {
        let editor = DefaultEditor::new().context("failed to set up line editor")?;
        Ok(Self { editor })
    }
}

impl LineSource for EditorLines {
    fn read_line(&mut self, prompt: &str) -> Result<ReadOutcome> {
        match self.editor.readline(prompt) {
            Ok(line) => Ok(ReadOutcome::Line(line)),
            Err(ReadlineError::Interrupted) => Ok(ReadOutcome::Interrupted),
            Err(ReadlineError::Eof) => Ok(ReadOutcome::Eof),
            Err(err) => Err(err).context("failed to read line"),
        }
    }

    fn add_history(&mut self, line: &str) -> Result<()> {
        self.editor.add_history_entry(line)?;
        Ok(())
    }
}

/// Settings for [`MainLoop`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopConfig {
    /// Shown before every line, followed by a space.
    pub prompt: String,
    /// Record non-blank lines in the line editor's history.
    pub history: bool,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            prompt: ">".to_string(),
            history: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoopState {
    Running,
    Stopped,
}

/// Split a line on single spaces, dropping the empty pieces left by repeated spaces.
pub fn split_line(line: &str) -> Vec<String> {
    line.split(' ')
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Read-eval-print loop over a [`CommandTable`].
///
/// Runs until an exit command is invoked or the input ends. Ctrl-C at the prompt is
/// ignored. A loop that has stopped stays stopped.
///
/// Example
/// ```
/// use cli_commands::{CommandSpec, MainLoop, MemWriter, ScriptedLines};
///
/// let mut main_loop = MainLoop::new([CommandSpec::exit("exit", "bye bye")]);
/// let mut lines = ScriptedLines::new(["hello", "exit"]);
/// let out = MemWriter::new();
/// main_loop.run_with(&mut lines, &mut out.clone()).unwrap();
/// assert_eq!(out.contents(), "Unknown command: \"hello\"\nbye bye\n");
/// assert!(!main_loop.is_running());
/// ```
#[derive(Debug)]
pub struct MainLoop {
    table: CommandTable,
    config: LoopConfig,
    state: LoopState,
}

impl MainLoop {
    pub fn new<I>(definition: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Entry>,
    {
        Self::with_config(definition, LoopConfig::default())
    }

    pub fn with_config<I>(definition: I, config: LoopConfig) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Entry>,
    {
        Self {
            table: CommandTable::new(definition),
            config,
            state: LoopState::Running,
        }
    }

    pub fn table(&self) -> &CommandTable {
        &self.table
    }

    pub fn config(&self) -> &LoopConfig {
        &self.config
    }

    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    /// Run interactively on the terminal, printing to standard output.
    pub fn run(&mut self) -> Result<()> {
        let mut lines = EditorLines::new()?;
        let mut stdout = std::io::stdout();
        self.run_with(&mut lines, &mut stdout)
    }

    /// Run against any line source and output.
    ///
    /// Errors from the line source and from callbacks end the loop and are returned.
    pub fn run_with(&mut self, lines: &mut dyn LineSource, out: &mut dyn Write) -> Result<()> {
        let prompt = format!("{} ", self.config.prompt);
        while self.is_running() {
            match lines.read_line(&prompt)? {
                ReadOutcome::Line(line) => {
                    if self.config.history && !line.trim().is_empty() {
                        lines.add_history(&line)?;
                    }
                    self.process_line(&line, out)?;
                }
                ReadOutcome::Interrupted => trace!("interrupt at prompt ignored"),
                ReadOutcome::Eof => {
                    debug!("end of input");
                    self.state = LoopState::Stopped;
                }
            }
        }
        Ok(())
    }

    /// Dispatch a single line, stopping the loop if it ran an exit command.
    pub fn process_line(&mut self, line: &str, out: &mut dyn Write) -> Result<()> {
        let tokens = split_line(line);
        if !self.table.dispatch(&tokens, out)? {
            self.state = LoopState::Stopped;
        }
        out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{ArgCount, CommandSpec};
    use crate::io_adapters::{MemWriter, ScriptedLines};
    use crate::table::HelpMarker;

    fn demo_loop(config: LoopConfig) -> MainLoop {
        MainLoop::with_config(
            [
                Entry::from(CommandSpec::exit("exit", "bye bye")),
                HelpMarker::new("-h").into(),
                CommandSpec::new(
                    "echo",
                    |parsed, out| Ok(writeln!(out, "{}", parsed.args.join(","))?),
                    ArgCount::Unbounded,
                    vec![],
                )
                .into(),
            ],
            config,
        )
    }

    #[test]
    fn test_split_line_drops_empty_tokens() {
        assert_eq!(split_line("a  b   c"), vec!["a", "b", "c"]);
        assert!(split_line("").is_empty());
        assert!(split_line("   ").is_empty());
        assert_eq!(split_line("a\tb"), vec!["a\tb"]);
    }

    #[test]
    fn test_loop_runs_until_exit() {
        let mut main_loop = demo_loop(LoopConfig::default());
        let mut lines = ScriptedLines::new(["echo a  b", "exit", "echo never"]);
        let out = MemWriter::new();

        main_loop.run_with(&mut lines, &mut out.clone()).unwrap();

        assert_eq!(out.contents(), "a,b\nbye bye\n");
        assert_eq!(lines.remaining(), 1);
        assert_eq!(lines.prompts(), &["> ", "> "]);
        assert!(!main_loop.is_running());
    }

    #[test]
    fn test_interrupt_is_ignored() {
        let mut main_loop = demo_loop(LoopConfig::default());
        let mut lines = ScriptedLines::default().interrupt().line("echo x").line("exit");
        let out = MemWriter::new();

        main_loop.run_with(&mut lines, &mut out.clone()).unwrap();

        assert_eq!(out.contents(), "x\nbye bye\n");
        assert_eq!(lines.prompts().len(), 3);
    }

    #[test]
    fn test_eof_stops_loop() {
        let mut main_loop = demo_loop(LoopConfig::default());
        let mut lines = ScriptedLines::new([""]);
        let out = MemWriter::new();

        main_loop.run_with(&mut lines, &mut out.clone()).unwrap();

        assert_eq!(out.contents(), "No command found\n");
        assert!(!main_loop.is_running());
    }

    #[test]
    fn test_custom_prompt_and_history() {
        let config = LoopConfig {
            prompt: "$".to_string(),
            history: true,
        };
        let mut main_loop = demo_loop(config);
        let mut lines = ScriptedLines::new(["  ", "echo hi", "exit"]);
        main_loop.run_with(&mut lines, &mut MemWriter::new()).unwrap();
        assert_eq!(lines.prompts()[0], "$ ");
        assert_eq!(lines.history(), &["echo hi", "exit"]);

        let config = LoopConfig {
            history: false,
            ..LoopConfig::default()
        };
        let mut main_loop = demo_loop(config);
        let mut lines = ScriptedLines::new(["exit"]);
        main_loop.run_with(&mut lines, &mut MemWriter::new()).unwrap();
        assert!(lines.history().is_empty());
    }

    #[test]
    fn test_stopped_loop_stays_stopped() {
        let mut main_loop = demo_loop(LoopConfig::default());
        main_loop.process_line("exit", &mut MemWriter::new()).unwrap();
        assert!(!main_loop.is_running());

        let mut lines = ScriptedLines::new(["echo again"]);
        main_loop.run_with(&mut lines, &mut MemWriter::new()).unwrap();
        assert_eq!(lines.remaining(), 1);
    }

    #[test]
    fn test_callback_error_leaves_loop() {
        let mut main_loop = MainLoop::new([CommandSpec::new(
            "fail",
            |_, _| anyhow::bail!("callback failed"),
            ArgCount::Unbounded,
            vec![],
        )]);
        let mut lines = ScriptedLines::new(["fail", "fail"]);
        let err = main_loop
            .run_with(&mut lines, &mut MemWriter::new())
            .unwrap_err();
        assert_eq!(err.to_string(), "callback failed");
        assert_eq!(lines.remaining(), 1);
    }
}
