use crate::command::{ArgCount, ParsedArgs, Signature};
use crate::error::CallError;
use crate::option::OptionSpec;

/// A single nameless command bound directly to a callback, for scripts that take their
/// arguments straight from `argv` and have nothing to dispatch.
///
/// Unlike a [`CommandSpec`](crate::CommandSpec), parse errors are returned instead of
/// printed, and the callback's own return value is handed back to the caller.
///
/// Example
/// ```
/// use cli_commands::{ArgCount, CallingFunction, OptionSpec};
///
/// let func = CallingFunction::new(
///     |parsed| Ok(format!("arg: {}, b: {}", parsed.args[0], parsed.flag("b"))),
///     ArgCount::Exactly(1),
///     vec![OptionSpec::flag("b", ["-b"]), OptionSpec::value("c", ["-c"])],
/// );
/// assert_eq!(func.call(&["-b", "x"]).unwrap(), "arg: x, b: true");
/// assert!(func.call(&["x", "y"]).is_err());
/// ```
pub struct CallingFunction<R> {
    callback: Box<dyn Fn(ParsedArgs) -> anyhow::Result<R>>,
    signature: Signature,
}

impl<R> CallingFunction<R> {
    pub fn new<F>(callback: F, arg_count: ArgCount, options: Vec<OptionSpec>) -> Self
    where
        F: Fn(ParsedArgs) -> anyhow::Result<R> + 'static,
    {
        Self {
            callback: Box::new(callback),
            signature: Signature::new(arg_count, options),
        }
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Parse `tokens` and run the callback with the result.
    pub fn call<S: AsRef<str>>(&self, tokens: &[S]) -> Result<R, CallError> {
        let parsed = self.signature.parse(tokens)?;
        (self.callback)(parsed).map_err(CallError::Callback)
    }
}
