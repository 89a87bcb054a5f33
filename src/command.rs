use crate::error::ParseError;
use crate::option::{OptionSpec, OptionValue};
use anyhow::Result;
use std::collections::HashMap;
use std::fmt;
use std::io::Write;

/// Callback invoked with the parsed arguments of a command.
///
/// Anything the callback prints should go to `out`, so that the output lands wherever the
/// caller of the table decided (stdout for the interactive loop, a buffer in tests).
pub type Callback = dyn Fn(ParsedArgs, &mut dyn Write) -> Result<()>;

/// How many positional arguments a command accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArgCount {
    /// Exactly this many, no more and no less.
    Exactly(usize),
    /// Any number, including none.
    #[default]
    Unbounded,
}

/// Outcome of parsing a command's tokens: positional arguments in order and the options
/// that were present, keyed by their logical name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedArgs {
    pub args: Vec<String>,
    pub options: HashMap<String, OptionValue>,
}

impl ParsedArgs {
    /// True if the option was given, whether as a switch or with a value.
    pub fn flag(&self, name: &str) -> bool {
        self.options.contains_key(name)
    }

    /// The value consumed by a value-taking option.
    pub fn value(&self, name: &str) -> Option<&str> {
        self.options.get(name).and_then(OptionValue::as_str)
    }

    pub fn get(&self, name: &str) -> Option<&OptionValue> {
        self.options.get(name)
    }
}

/// Argument contract shared by everything that parses tokens: the positional count and
/// the option lookup.
///
/// The lookup is built once by flattening the triggers of every [`OptionSpec`]. If two
/// options share a trigger, the one listed later owns it; the trigger keeps the position
/// where it was first seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Signature {
    arg_count: ArgCount,
    options: Vec<OptionSpec>,
    // trigger -> index into `options`
    lookup: HashMap<String, usize>,
    // triggers in first-seen order, for help output
    order: Vec<String>,
}

impl Signature {
    pub fn new(arg_count: ArgCount, options: Vec<OptionSpec>) -> Self {
        let mut lookup = HashMap::new();
        let mut order = Vec::new();
        for (idx, option) in options.iter().enumerate() {
            for trigger in option.triggers() {
                if lookup.insert(trigger.clone(), idx).is_none() {
                    order.push(trigger.clone());
                }
            }
        }
        Self {
            arg_count,
            options,
            lookup,
            order,
        }
    }

    pub fn arg_count(&self) -> ArgCount {
        self.arg_count
    }

    /// The option activated by `trigger`, if any.
    pub fn option(&self, trigger: &str) -> Option<&OptionSpec> {
        self.lookup.get(trigger).map(|&idx| &self.options[idx])
    }

    /// Every trigger with the option it activates, in the order triggers were declared.
    pub fn triggers(&self) -> impl Iterator<Item = (&str, &OptionSpec)> + '_ {
        self.order
            .iter()
            .filter_map(|trigger| Some((trigger.as_str(), self.option(trigger)?)))
    }

    /// Split `tokens` into positional arguments and options, then check the positional
    /// count.
    ///
    /// Options may appear anywhere among the positional arguments. A value-taking option
    /// always claims the next raw token, even if that token is itself a trigger or empty.
    /// Any other empty token is skipped rather than counted as a positional argument.
    pub fn parse<S: AsRef<str>>(&self, tokens: &[S]) -> Result<ParsedArgs, ParseError> {
        let mut parsed = ParsedArgs::default();
        let mut tokens = tokens.iter().map(AsRef::<str>::as_ref);

        while let Some(token) = tokens.next() {
            if token.is_empty() {
                continue;
            }

            let Some(option) = self.option(token) else {
                parsed.args.push(token.to_string());
                continue;
            };

            let value = if option.takes_value() {
                let value = tokens.next().ok_or_else(|| ParseError::OptionMissingValue {
                    trigger: token.to_string(),
                })?;
                OptionValue::Value(value.to_string())
            } else {
                OptionValue::Switch
            };
            parsed.options.insert(option.name().to_string(), value);
        }

        if let ArgCount::Exactly(expected) = self.arg_count {
            if parsed.args.len() != expected {
                return Err(ParseError::ArgumentCountMismatch {
                    expected,
                    actual: parsed.args.len(),
                });
            }
        }

        Ok(parsed)
    }
}

/// A named command: its callback, argument contract and recognized options.
///
/// Example
/// ```
/// use cli_commands::{ArgCount, CommandSpec, OptionSpec};
/// use std::io::Write;
///
/// let greet = CommandSpec::new(
///     "greet",
///     |parsed, out| {
///         writeln!(out, "hello {}", parsed.args[0])?;
///         Ok(())
///     },
///     ArgCount::Exactly(1),
///     vec![OptionSpec::flag("loud", ["-l"])],
/// );
/// let parsed = greet.parse(&["-l", "Bob"]).unwrap();
/// assert_eq!(parsed.args, vec!["Bob"]);
/// assert!(parsed.flag("loud"));
/// ```
pub struct CommandSpec {
    name: String,
    callback: Box<Callback>,
    signature: Signature,
    help: String,
    exit: bool,
}

impl CommandSpec {
    /// Trigger collisions among `options` are not rejected; see [`Signature`].
    pub fn new<F>(
        name: impl Into<String>,
        callback: F,
        arg_count: ArgCount,
        options: Vec<OptionSpec>,
    ) -> Self
    where
        F: Fn(ParsedArgs, &mut dyn Write) -> Result<()> + 'static,
    {
        Self {
            name: name.into(),
            callback: Box::new(callback),
            signature: Signature::new(arg_count, options),
            help: String::new(),
            exit: false,
        }
    }

    /// A command that takes no arguments, prints `farewell` (when non-empty) and asks the
    /// enclosing loop to stop.
    pub fn exit(name: impl Into<String>, farewell: impl Into<String>) -> Self {
        let farewell = farewell.into();
        let mut cmd = Self::new(
            name,
            move |_parsed, out| {
                if !farewell.is_empty() {
                    writeln!(out, "{}", farewell)?;
                }
                Ok(())
            },
            ArgCount::Exactly(0),
            Vec::new(),
        )
        .with_help("exit");
        cmd.exit = true;
        cmd
    }

    /// Set the text shown for this command in the help listing.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = help.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub fn arg_count(&self) -> ArgCount {
        self.signature.arg_count()
    }

    pub fn help(&self) -> &str {
        &self.help
    }

    /// Whether running this command should end the interactive loop.
    pub fn is_exit(&self) -> bool {
        self.exit
    }

    pub fn option(&self, trigger: &str) -> Option<&OptionSpec> {
        self.signature.option(trigger)
    }

    pub fn triggers(&self) -> impl Iterator<Item = (&str, &OptionSpec)> + '_ {
        self.signature.triggers()
    }

    /// Parse `tokens`, everything after the command name. See [`Signature::parse`].
    pub fn parse<S: AsRef<str>>(&self, tokens: &[S]) -> Result<ParsedArgs, ParseError> {
        self.signature.parse(tokens)
    }

    /// Run the callback. Its errors are returned as-is.
    pub fn invoke(&self, parsed: ParsedArgs, out: &mut dyn Write) -> Result<()> {
        (self.callback)(parsed, out)
    }
}

impl fmt::Debug for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandSpec")
            .field("name", &self.name)
            .field("signature", &self.signature)
            .field("help", &self.help)
            .field("exit", &self.exit)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(_parsed: ParsedArgs, _out: &mut dyn Write) -> Result<()> {
        Ok(())
    }

    fn someargs() -> CommandSpec {
        CommandSpec::new(
            "someargs",
            noop,
            ArgCount::Exactly(2),
            vec![
                OptionSpec::flag("b", ["-b"]).with_help("b option"),
                OptionSpec::value("c", ["-c"]).with_help("c option"),
            ],
        )
    }

    #[test]
    fn test_plain_tokens_are_positional() {
        let cmd = CommandSpec::new("all", noop, ArgCount::Unbounded, Vec::new());
        let parsed = cmd.parse(&["x", "-y", "--z"]).unwrap();
        assert_eq!(parsed.args, vec!["x", "-y", "--z"]);
        assert!(parsed.options.is_empty());
    }

    #[test]
    fn test_switch_and_value_options() {
        let parsed = someargs().parse(&["a", "-b", "-c", "7", "d"]).unwrap();
        assert_eq!(parsed.args, vec!["a", "d"]);
        assert_eq!(parsed.get("b"), Some(&OptionValue::Switch));
        assert_eq!(parsed.value("c"), Some("7"));
        assert!(parsed.flag("b"));
        assert!(!parsed.flag("missing"));
    }

    #[test]
    fn test_value_option_takes_trigger_literally() {
        let parsed = someargs().parse(&["-c", "-b", "x", "y"]).unwrap();
        assert_eq!(parsed.args, vec!["x", "y"]);
        assert_eq!(parsed.value("c"), Some("-b"));
        assert!(!parsed.flag("b"));
    }

    #[test]
    fn test_missing_value_at_end() {
        let err = someargs().parse(&["x", "y", "-c"]).unwrap_err();
        assert_eq!(
            err,
            ParseError::OptionMissingValue {
                trigger: "-c".into()
            }
        );
    }

    #[test]
    fn test_argument_count_is_exact() {
        let cmd = someargs();
        assert_eq!(
            cmd.parse(&["x"]).unwrap_err(),
            ParseError::ArgumentCountMismatch {
                expected: 2,
                actual: 1
            }
        );
        assert_eq!(
            cmd.parse(&["x", "y", "z", "-b"]).unwrap_err(),
            ParseError::ArgumentCountMismatch {
                expected: 2,
                actual: 3
            }
        );
    }

    #[test]
    fn test_empty_tokens_are_skipped() {
        let parsed = someargs().parse(&["x", "", "", "y", "-b"]).unwrap();
        assert_eq!(parsed.args, vec!["x", "y"]);
        assert!(parsed.flag("b"));
    }

    #[test]
    fn test_empty_token_can_be_an_option_value() {
        let parsed = someargs().parse(&["-c", "", "a", "b"]).unwrap();
        assert_eq!(parsed.args, vec!["a", "b"]);
        assert_eq!(parsed.value("c"), Some(""));
    }

    #[test]
    fn test_repeated_option_keeps_last_value() {
        let parsed = someargs().parse(&["-c", "1", "x", "-c", "2", "y"]).unwrap();
        assert_eq!(parsed.value("c"), Some("2"));
    }

    #[test]
    fn test_multiple_triggers_share_option() {
        let cmd = CommandSpec::new(
            "v",
            noop,
            ArgCount::Exactly(0),
            vec![OptionSpec::flag("verbose", ["-v", "--verbose"])],
        );
        assert!(cmd.parse(&["--verbose"]).unwrap().flag("verbose"));
        assert!(cmd.parse(&["-v"]).unwrap().flag("verbose"));
        let triggers: Vec<&str> = cmd.triggers().map(|(t, _)| t).collect();
        assert_eq!(triggers, vec!["-v", "--verbose"]);
    }

    #[test]
    fn test_colliding_trigger_goes_to_later_option() {
        let cmd = CommandSpec::new(
            "clash",
            noop,
            ArgCount::Unbounded,
            vec![
                OptionSpec::flag("first", ["-x", "-f"]),
                OptionSpec::value("second", ["-x"]),
            ],
        );
        assert_eq!(cmd.option("-x").map(OptionSpec::name), Some("second"));
        assert_eq!(cmd.option("-f").map(OptionSpec::name), Some("first"));
        let triggers: Vec<(&str, &str)> = cmd.triggers().map(|(t, o)| (t, o.name())).collect();
        assert_eq!(triggers, vec![("-x", "second"), ("-f", "first")]);
    }

    #[test]
    fn test_exit_command_prints_farewell() {
        let cmd = CommandSpec::exit("quit", "bye");
        assert!(cmd.is_exit());
        assert_eq!(cmd.arg_count(), ArgCount::Exactly(0));
        assert_eq!(cmd.help(), "exit");

        let mut out = Vec::new();
        let parsed = cmd.parse::<&str>(&[]).unwrap();
        cmd.invoke(parsed, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "bye\n");

        let silent = CommandSpec::exit("q", "");
        let mut out = Vec::new();
        silent.invoke(ParsedArgs::default(), &mut out).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_callback_errors_pass_through() {
        let cmd = CommandSpec::new(
            "fail",
            |_parsed, _out| Err(anyhow::anyhow!("user failure")),
            ArgCount::Unbounded,
            Vec::new(),
        );
        let err = cmd.invoke(ParsedArgs::default(), &mut Vec::new()).unwrap_err();
        assert_eq!(err.to_string(), "user failure");
    }
}
