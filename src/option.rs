/// Description of a single flag a command understands.
///
/// An option is activated by any of its `triggers` (e.g. `-c` or `--count`) and is
/// reported to the callback under its logical `name`. Options either act as a switch
/// or consume the token that follows the trigger as their value.
///
/// Example
/// ```
/// use cli_commands::OptionSpec;
/// let verbose = OptionSpec::flag("verbose", ["-v", "--verbose"]).with_help("print more");
/// let count = OptionSpec::value("count", ["-c"]);
/// assert!(!verbose.takes_value());
/// assert!(count.takes_value());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionSpec {
    name: String,
    triggers: Vec<String>,
    takes_value: bool,
    help: String,
}

impl OptionSpec {
    /// Create an option with every field spelled out.
    pub fn new<I, S>(name: impl Into<String>, triggers: I, takes_value: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            triggers: triggers.into_iter().map(Into::into).collect(),
            takes_value,
            help: String::new(),
        }
    }

    /// A boolean option; its presence is reported as [`OptionValue::Switch`].
    pub fn flag<I, S>(name: impl Into<String>, triggers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(name, triggers, false)
    }

    /// An option that consumes the next token as its value.
    pub fn value<I, S>(name: impl Into<String>, triggers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(name, triggers, true)
    }

    /// Attach the text shown next to each trigger in the help listing.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = help.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn triggers(&self) -> &[String] {
        &self.triggers
    }

    pub fn takes_value(&self) -> bool {
        self.takes_value
    }

    pub fn help(&self) -> &str {
        &self.help
    }
}

/// Value recorded for an option that appeared on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    /// A flag-only option was present.
    Switch,
    /// The literal token consumed by a value-taking option.
    Value(String),
}

impl OptionValue {
    /// The consumed token, if this option carries one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            OptionValue::Switch => None,
            OptionValue::Value(v) => Some(v),
        }
    }
}
