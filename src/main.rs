use clap::Parser;
use unicorn_feedback_lib::cli::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // RUST_LOG still wins over the verbosity flag
    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    if let Err(e) = unicorn_feedback_lib::run(cli).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
