use std::process::ExitCode;

use clap::Parser;
use netmig::cli::Cli;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = netmig::logging::init(cli.verbose, cli.log_file.as_deref()) {
        eprintln!("failed to initialise logging: {e:?}");
        return ExitCode::FAILURE;
    }

    match netmig::run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:?}");
            ExitCode::FAILURE
        }
    }
}
