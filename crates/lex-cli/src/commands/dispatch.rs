use lex_config::LexConfig;

use crate::cli::{Commands, GlobalFlags};
use crate::commands;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(
    command: Commands,
    config: &LexConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match command {
        Commands::Search(args) => commands::search::handle_search(&args, config, flags).await,
        Commands::Linked(args) => commands::search::handle_linked(&args, config, flags).await,
        Commands::Referrers(args) => commands::search::handle_referrers(&args, config, flags).await,
        Commands::Verify(args) => commands::verify::handle(&args, config, flags).await,
        Commands::Replay(args) => commands::replay::handle(&args, config, flags).await,
        Commands::Ingest(args) => commands::ingest::handle(&args, config, flags),
        Commands::Tools(args) => commands::tools::handle(&args, flags),
    }
}
