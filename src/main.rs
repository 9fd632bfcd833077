use anyhow::Result;
use clap::Parser;
use lure_finder::cache::CatalogCache;
use lure_finder::catalog::CatalogSource;
use lure_finder::cli::{Cli, Commands};
use lure_finder::config::{default_log_filter, resolve_catalog_path};
use lure_finder::output::{render, resolutions, variant_views, write_output};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = parse_cli()?;
    init_tracing(cli.verbose);

    let catalog_path = resolve_catalog_path(&cli)?;
    let cache = CatalogCache::open(CatalogSource::file(catalog_path));
    let snapshot = cache.snapshot();

    let content = match cli.command.clone() {
        Commands::Colors {
            query,
            format,
            limit,
        } => render(&snapshot.colors.search_limited(&query, limit), format)?,
        Commands::Variants {
            query,
            format,
            limit,
        } => {
            let found = snapshot.variants.search_limited(&query, limit);
            render(&variant_views(&snapshot, &found), format)?
        }
        Commands::Color { id, format } => {
            let found: Vec<_> = snapshot.colors.get_by_id(&id).into_iter().collect();
            render(&found, format)?
        }
        Commands::Code { company_id, format } => {
            render(&snapshot.colors.get_by_company_id(&company_id), format)?
        }
        Commands::Number { number, format } => {
            let found = snapshot.variants.get_by_number(&number);
            render(&variant_views(&snapshot, &found), format)?
        }
        Commands::Resolve {
            number,
            color_id,
            format,
        } => render(&resolutions(&snapshot, &number, &color_id), format)?,
        Commands::Stats => serde_json::to_string_pretty(&cache.stats())?,
    };

    write_output(&content);
    Ok(())
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_log_filter(verbose)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn parse_cli() -> Result<Cli> {
    let args: Vec<String> = std::env::args().collect();
    Ok(Cli::parse_from(rewrite_args_for_implicit_search(args)))
}

/// `lure-finder frog` reads as `lure-finder colors frog`.
fn rewrite_args_for_implicit_search(mut args: Vec<String>) -> Vec<String> {
    if args.len() <= 1 {
        return args;
    }

    let subcommands = [
        "colors", "variants", "color", "code", "number", "resolve", "stats", "help",
    ];

    let mut idx = 1usize;
    while idx < args.len() {
        let a = args[idx].as_str();
        if a == "--" {
            idx += 1;
            break;
        }

        if a == "--catalog" {
            idx += 2;
            continue;
        }

        if a.starts_with('-') {
            idx += 1;
            continue;
        }

        break;
    }

    if idx < args.len() {
        let token = args[idx].as_str();
        if !subcommands.contains(&token) {
            args.insert(idx, "colors".to_string());
        }
    }

    args
}
