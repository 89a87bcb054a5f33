use anyhow::Result;
use argh::FromArgs;
use cli_commands::{
    ArgCount, CommandSpec, Entry, HelpMarker, LoopConfig, MainLoop, OptionSpec, ParsedArgs,
};
use std::io::Write;

#[derive(FromArgs)]
/// Demo command table. Runs the given command once, or starts an interactive prompt when
/// no command is given.
struct Args {
    #[argh(option, default = "String::from(\">\")")]
    /// symbol shown before each input line.
    prompt: String,

    #[argh(switch)]
    /// do not record entered lines in the history.
    no_history: bool,

    #[argh(positional, greedy)]
    /// command and arguments to run once instead of starting the prompt.
    command: Vec<String>,
}

fn print_example_no_args(_parsed: ParsedArgs, out: &mut dyn Write) -> Result<()> {
    writeln!(out, "example")?;
    Ok(())
}

fn print_example_args(parsed: ParsedArgs, out: &mut dyn Write) -> Result<()> {
    writeln!(
        out,
        "arg1: {}, arg2: {}, b: \"{}\", c: {}",
        parsed.args[0],
        parsed.args[1],
        parsed.flag("b"),
        parsed.value("c").unwrap_or_default()
    )?;
    Ok(())
}

fn print_example_all_the_args(parsed: ParsedArgs, out: &mut dyn Write) -> Result<()> {
    writeln!(out, "example of all the args")?;
    writeln!(out, "{:?}", parsed.args)?;
    Ok(())
}

fn definition() -> Vec<Entry> {
    vec![
        CommandSpec::exit("exit", "bye bye").into(),
        CommandSpec::exit("q", "bye bye 2").into(),
        HelpMarker::new("-h").into(),
        CommandSpec::new("noargs", print_example_no_args, ArgCount::Exactly(0), vec![])
            .with_help("print my str")
            .into(),
        CommandSpec::new(
            "someargs",
            print_example_args,
            ArgCount::Exactly(2),
            vec![
                OptionSpec::flag("b", ["-b"]).with_help("b option"),
                OptionSpec::value("c", ["-c"]).with_help("c option"),
            ],
        )
        .with_help("takes some args and kwargs")
        .into(),
        CommandSpec::new(
            "allargs",
            print_example_all_the_args,
            ArgCount::Unbounded,
            vec![],
        )
        .with_help("print and accept all args")
        .into(),
    ]
}

fn init_tracing() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing subscriber: {e}"))
}

fn main() -> Result<()> {
    init_tracing()?;
    let args: Args = argh::from_env();
    let config = LoopConfig {
        prompt: args.prompt,
        history: !args.no_history,
    };
    let mut main_loop = MainLoop::with_config(definition(), config);

    if args.command.is_empty() {
        main_loop.run()
    } else {
        main_loop.table().handle(args.command.as_slice())?;
        Ok(())
    }
}
