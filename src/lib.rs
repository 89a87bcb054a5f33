//! Declarative command tables for command-line tools and small REPLs.
//!
//! A program describes its commands once, as [`CommandSpec`]s with an argument count and
//! a set of [`OptionSpec`]s, and this crate takes care of splitting tokens into positional
//! arguments and options, validating them, dispatching to the right callback and printing
//! a help listing.
//!
//! The main entry points are [`CommandTable`], which dispatches one already tokenized
//! line (e.g. `std::env::args()`), and [`MainLoop`], which wraps a table in an interactive
//! read loop. [`CallingFunction`] covers scripts that expose a single function.
//!
//! ```
//! use cli_commands::{ArgCount, CommandSpec, CommandTable, Entry, HelpMarker, OptionSpec};
//! use std::io::Write;
//!
//! let table = CommandTable::new([
//!     Entry::from(HelpMarker::new("-h")),
//!     CommandSpec::new(
//!         "greet",
//!         |parsed, out| {
//!             let greeting = if parsed.flag("upper") { "HELLO" } else { "hello" };
//!             writeln!(out, "{} {}", greeting, parsed.args[0])?;
//!             Ok(())
//!         },
//!         ArgCount::Exactly(1),
//!         vec![OptionSpec::flag("upper", ["-u"]).with_help("shout")],
//!     )
//!     .with_help("greet someone")
//!     .into(),
//!     CommandSpec::exit("quit", "").into(),
//! ]);
//!
//! let mut out = Vec::new();
//! assert!(table.dispatch(&["greet", "Bob", "-u"], &mut out).unwrap());
//! assert!(!table.dispatch(&["quit"], &mut out).unwrap());
//! assert_eq!(String::from_utf8(out).unwrap(), "HELLO Bob\n");
//! ```

mod command;
mod error;
mod function;
mod io_adapters;
mod option;
mod repl;
mod table;

pub use command::{ArgCount, Callback, CommandSpec, ParsedArgs, Signature};
pub use error::{CallError, ParseError};
pub use function::CallingFunction;
pub use io_adapters::{MemWriter, ScriptedLines};
pub use option::{OptionSpec, OptionValue};
pub use repl::{EditorLines, LineSource, LoopConfig, MainLoop, ReadOutcome, split_line};
pub use table::{CommandTable, Entry, HelpMarker};
