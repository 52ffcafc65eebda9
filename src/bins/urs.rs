use clap::Parser;
use std::process::ExitCode;
use tracing::error;
use urs::{
    cli::{check_args, Args, EXAMPLES, TITLE},
    logging::init_tracing,
    reddit::RouxClient,
    scrapers::Console,
    Config, Result, Run, Urs,
};

fn run(args: &Args) -> Result<()> {
    check_args(args)?;
    let config = Config::from_env();
    let client = RouxClient::new(config.clone());
    Run::new(args, Urs::new(client, config, Console::stdio())).run_urs()
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);
    println!("{TITLE}");

    if args.examples {
        println!("{EXAMPLES}");
        return ExitCode::SUCCESS;
    }

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}
