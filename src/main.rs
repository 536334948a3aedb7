// src/main.rs

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use commands::ResolveOptions;
use tracing_subscriber::EnvFilter;
use wingetpack::config::Config;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Catalog {
            url,
            archive,
            search,
            json,
        } => commands::cmd_catalog(
            &config,
            url.as_deref(),
            archive.as_deref(),
            search.as_deref(),
            json,
        ),
        Commands::Show { id, version } => commands::cmd_show(&config, &id, version.as_deref()),
        Commands::Resolve {
            id,
            version,
            arch,
            context,
            installer_type,
            args,
            script_only,
            manifests,
            download,
        } => commands::cmd_resolve(
            &config,
            ResolveOptions {
                id,
                version,
                arch,
                context,
                installer_type,
                args,
                script_only,
                manifests,
                download,
            },
        ),
    }
}
