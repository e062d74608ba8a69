use clap::Parser;
use log::info;
use thumbcache::{
    utils::cli::{Cli, Command, ResolveArgs},
    AppResult, DownsampleCoordinator,
};
use tokio::task::JoinSet;

async fn resolve(args: ResolveArgs) -> AppResult<()> {
    let size = args.target_size()?;
    let coordinator = DownsampleCoordinator::standard(args.config());

    let mut tasks = JoinSet::new();
    for _ in 0..args.callers() {
        let coordinator = coordinator.clone();
        let locator = args.locator.clone();
        tasks.spawn(async move { coordinator.resolve(&locator, size).await });
    }

    let mut resolved = Vec::with_capacity(tasks.len());
    while let Some(joined) = tasks.join_next().await {
        resolved.push(joined??);
    }

    let stats = coordinator.stats();
    info!(
        "Resolved {} ({} decodes, {} coalesced, {} hits)",
        args.locator, stats.decodes, stats.coalesced, stats.hits
    );

    let image = &resolved[0];
    info!("Thumbnail is {}x{}", image.width(), image.height());

    if let Some(output) = &args.output {
        image.image().save(output)?;
        info!("Wrote {}", output.display());
    }

    Ok(())
}

#[tokio::main]
async fn main() -> AppResult<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Command::Resolve(args) => resolve(args).await?,
    }

    Ok(())
}
