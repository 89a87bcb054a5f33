use thiserror::Error;

/// Errors produced while turning a command's tokens into [`ParsedArgs`](crate::ParsedArgs).
///
/// These never escape [`CommandTable::dispatch`](crate::CommandTable::dispatch): the table
/// prints them and keeps going.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A value-taking option was the last token on the line.
    #[error("Option {trigger} expects value but reached EOF")]
    OptionMissingValue { trigger: String },

    /// The number of positional arguments differs from what the command declares.
    #[error("Number of arguments mismatch, should be \"{expected}\" is \"{actual}\"")]
    ArgumentCountMismatch { expected: usize, actual: usize },
}

/// Failure of [`CallingFunction::call`](crate::CallingFunction::call).
#[derive(Debug, Error)]
pub enum CallError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The callback itself failed; the error is passed through untouched.
    #[error(transparent)]
    Callback(anyhow::Error),
}
