use crate::command::{ArgCount, CommandSpec};
use anyhow::Result;
use std::collections::HashMap;
use std::io::Write;
use tracing::debug;

/// A table entry that prints the help listing instead of running a callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelpMarker {
    name: String,
}

impl HelpMarker {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Anything that can be registered in a [`CommandTable`].
#[derive(Debug)]
pub enum Entry {
    Command(CommandSpec),
    Help(HelpMarker),
}

impl Entry {
    pub fn name(&self) -> &str {
        match self {
            Entry::Command(cmd) => cmd.name(),
            Entry::Help(marker) => marker.name(),
        }
    }
}

impl From<CommandSpec> for Entry {
    fn from(cmd: CommandSpec) -> Self {
        Entry::Command(cmd)
    }
}

impl From<HelpMarker> for Entry {
    fn from(marker: HelpMarker) -> Self {
        Entry::Help(marker)
    }
}

/// Commands addressed by name, in registration order.
///
/// The table looks up the first token of a line and hands the rest to the matching
/// command. Parse problems and unknown names are reported to the output and never stop
/// the caller; only errors raised by a callback are returned.
///
/// Example
/// ```
/// use cli_commands::{ArgCount, CommandSpec, CommandTable, Entry, HelpMarker};
/// use std::io::Write;
///
/// let table = CommandTable::new([
///     Entry::from(HelpMarker::new("-h")),
///     CommandSpec::new("ping", |_, out| Ok(writeln!(out, "pong")?), ArgCount::Exactly(0), vec![])
///         .into(),
///     CommandSpec::exit("quit", "bye").into(),
/// ]);
///
/// let mut out = Vec::new();
/// assert!(table.dispatch(&["ping"], &mut out).unwrap());
/// assert!(!table.dispatch(&["quit"], &mut out).unwrap());
/// assert_eq!(String::from_utf8(out).unwrap(), "pong\nbye\n");
/// ```
#[derive(Debug, Default)]
pub struct CommandTable {
    entries: Vec<Entry>,
    index: HashMap<String, usize>,
}

impl CommandTable {
    /// Build a table from an ordered list of entries.
    ///
    /// When two entries share a name the later one replaces the earlier one but keeps its
    /// place in the help listing.
    pub fn new<I>(definition: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Entry>,
    {
        let mut table = Self::default();
        for entry in definition {
            let entry = entry.into();
            match table.index.get(entry.name()) {
                Some(&idx) => table.entries[idx] = entry,
                None => {
                    table.index.insert(entry.name().to_string(), table.entries.len());
                    table.entries.push(entry);
                }
            }
        }
        table
    }

    pub fn get(&self, name: &str) -> Option<&Entry> {
        self.index.get(name).map(|&idx| &self.entries[idx])
    }

    /// Registered names, help markers included.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(Entry::name)
    }

    /// Run one line of input, already split into tokens.
    ///
    /// Empty tokens before the command name are skipped; everything after it goes to
    /// [`Signature::parse`](crate::Signature::parse) untouched.
    ///
    /// Returns `Ok(false)` only after an exit command ran, i.e. when an interactive loop
    /// should stop.
    pub fn dispatch<S: AsRef<str>>(&self, tokens: &[S], out: &mut dyn Write) -> Result<bool> {
        let start = tokens
            .iter()
            .position(|t| !AsRef::<str>::as_ref(t).is_empty())
            .unwrap_or(tokens.len());

        let Some((name, rest)) = tokens[start..].split_first() else {
            writeln!(out, "No command found")?;
            return Ok(true);
        };

        let name = AsRef::<str>::as_ref(name);
        let Some(entry) = self.get(name) else {
            debug!(command = name, "unknown command");
            writeln!(out, "Unknown command: \"{}\"", name)?;
            return Ok(true);
        };

        match entry {
            Entry::Help(_) => {
                writeln!(out, "{}", self.help_text())?;
                Ok(true)
            }
            Entry::Command(cmd) => {
                let parsed = match cmd.parse(rest) {
                    Ok(parsed) => parsed,
                    Err(e) => {
                        debug!(command = name, error = %e, "rejected arguments");
                        writeln!(out, "{}", e)?;
                        return Ok(true);
                    }
                };
                debug!(command = name, args = parsed.args.len(), "running command");
                cmd.invoke(parsed, out)?;
                if cmd.is_exit() {
                    debug!(command = name, "exit requested");
                }
                Ok(!cmd.is_exit())
            }
        }
    }

    /// [`dispatch`](Self::dispatch) writing to standard output.
    pub fn handle<S: AsRef<str>>(&self, tokens: &[S]) -> Result<bool> {
        let mut stdout = std::io::stdout().lock();
        let keep_going = self.dispatch(tokens, &mut stdout)?;
        stdout.flush()?;
        Ok(keep_going)
    }

    /// The help listing for every runnable command, without a trailing newline.
    pub fn help_text(&self) -> String {
        let mut lines = vec!["List of Commands:".to_string()];
        for entry in &self.entries {
            let Entry::Command(cmd) = entry else {
                continue;
            };

            let hint = match cmd.arg_count() {
                ArgCount::Exactly(0) => String::new(),
                ArgCount::Exactly(n) => format!(" <arg 1>...<arg {}>", n),
                ArgCount::Unbounded => " [<arg 1>...<arg n>]".to_string(),
            };
            lines.push(format!("{}{}\t-\t{}", cmd.name(), hint, cmd.help()));

            for (trigger, option) in cmd.triggers() {
                let value = if option.takes_value() { " <value>" } else { "" };
                lines.push(format!("\t{}{}\t-\t{}", trigger, value, option.help()));
            }
        }
        lines.join("\n")
    }
}
