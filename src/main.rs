use clap::Parser;
use tokio::signal;
use vigia::cli::{self, Cli, CheckCommand, Commands};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run(args) => {
            tokio::select! {
                result = cli::run::execute(args) => result,
                _ = signal::ctrl_c() => Ok(()),
            }
        }
        Commands::Submit(args) => cli::submit::execute(args).await,
        Commands::Check(CheckCommand::Config(args)) => cli::check::config(args),
    };

    if let Err(e) = result {
        cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}
