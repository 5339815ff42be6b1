use clap::Parser;
use std::process;

use release_helper::{Result, cli, command, forge::github::Github};

const PROGRAM: &str = env!("CARGO_BIN_NAME");

fn initialize_logger(debug: bool) -> Result<()> {
    let filter = if debug {
        simplelog::LevelFilter::Debug
    } else {
        simplelog::LevelFilter::Info
    };

    let config = simplelog::ConfigBuilder::new()
        .add_filter_allow_str("release_helper")
        .build();

    // stdout is reserved for command output
    simplelog::TermLogger::init(
        filter,
        config,
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    )?;

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli_args = cli::Args::parse();

    initialize_logger(cli_args.debug)?;

    let invocation =
        match command::resolve(cli_args.command.as_deref(), &cli_args.args) {
            Ok(invocation) => invocation,
            Err(err) => {
                eprintln!("{err}\n");
                eprintln!("{}", command::usage(PROGRAM));
                process::exit(1);
            }
        };

    let remote = cli_args.get_remote()?;
    let github = Github::new(remote)?;

    if let Some(output) = command::execute(&github, &github, invocation).await?
    {
        println!("{output}");
    }

    Ok(())
}
