use clap::Parser;

mod bootstrap;
mod cli;
mod commands;
mod output;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("lexa error: {error:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    let flags = cli.global_flags();
    if let cli::Commands::Tools(args) = &cli.command {
        return commands::tools::handle(args, &flags);
    }

    let config = bootstrap::load_config(&flags)?;
    commands::dispatch::dispatch(cli.command, &config, &flags).await
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("LEXA_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
