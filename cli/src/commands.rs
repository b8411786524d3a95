use clap::{ArgMatches, Command};

pub fn cli() -> Vec<Command> {
    vec![
        completions::cli(),
        decode::cli(),
        envelope::cli(),
        index::cli(),
    ]
}

pub fn dispatch(matches: ArgMatches) -> anyhow::Result<()> {
    match matches.subcommand() {
        Some(("completions", args)) => completions::exec(args),
        Some(("decode", args)) => decode::exec(args),
        Some(("envelope", args)) => envelope::exec(args),
        Some(("index", args)) => index::exec(args),
        _ => unreachable!(),
    }
}

pub mod completions;
pub mod decode;
pub mod envelope;
pub mod index;
