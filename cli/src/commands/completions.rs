use clap::{ArgMatches, Command, arg, value_parser};
use clap_complete::Shell;

pub fn cli() -> Command {
    Command::new("completions")
        .about("Generate shell completions")
        .arg(
            arg!(<SHELL> "Shell to generate completions for")
                .value_parser(value_parser!(Shell)),
        )
}

pub fn exec(args: &ArgMatches) -> anyhow::Result<()> {
    let shell = args
        .get_one::<Shell>("SHELL")
        .copied()
        .expect("SHELL is a required argument");
    let mut app = crate::app();
    let name = app.get_name().to_string();
    clap_complete::generate(shell, &mut app, name, &mut std::io::stdout());
    Ok(())
}
