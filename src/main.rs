use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use quakemap::cli::{Cli, Command, ExportArgs, LegendArgs, ServeArgs, SourceArgs};
use quakemap::html_template::{get_standalone_html, MapView};
use quakemap::marker::MarkerStyler;
use quakemap::processing::build_map_layer;
use quakemap::server::{start_server, AppState};
use quakemap::settings::Settings;
use quakemap::store::QuakeStore;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("quakemap=info,tower_http=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Settings file values with the command line applied on top.
fn load_settings(source: &SourceArgs, apply: impl FnOnce(&mut Settings)) -> Result<Settings> {
    let config_path = source.config_path();
    let mut settings = Settings::load_from(&config_path)
        .with_context(|| format!("Failed to load settings from {}", config_path.display()))?;
    apply(&mut settings);

    if source.save_settings {
        settings.save_to(&config_path)?;
        info!("Settings saved to {}", config_path.display());
    }
    Ok(settings)
}

async fn run_serve(args: ServeArgs) -> Result<()> {
    let settings = load_settings(&args.source, |s| args.apply(s))?;
    let source = args.source.source(&settings);
    let store = QuakeStore::new();

    // One fetch per run; a failure is kept and shown on the page.
    match source.load(settings.request_timeout()).await {
        Ok(collection) => {
            let layer = build_map_layer(&collection, &MarkerStyler::new(settings.color_by));
            store.set_layer(layer);
            info!("{} earthquakes ready", store.marker_count());
        }
        Err(e) => {
            error!("Failed to load earthquake feed from {}: {}", source, e);
            store.set_failure(format!("Failed to load earthquake feed: {}", e));
        }
    }

    start_server(AppState::new(store, settings)).await
}

async fn run_export(args: ExportArgs) -> Result<()> {
    let settings = load_settings(&args.source, |s| args.source.apply(s))?;
    let source = args.source.source(&settings);

    let collection = source
        .load(settings.request_timeout())
        .await
        .with_context(|| format!("Failed to load earthquake feed from {}", source))?;
    let layer = build_map_layer(&collection, &MarkerStyler::new(settings.color_by));

    let html = get_standalone_html(&MapView::from_settings(&settings), &layer)?;
    tokio::fs::write(&args.output, html)
        .await
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    info!(
        "Map with {} earthquakes written to {}",
        layer.stats.rendered,
        args.output.display()
    );
    Ok(())
}

fn run_legend(args: LegendArgs) {
    let key = args.color_by;
    println!("{}", key.legend_title());
    for range in key.scale().legend_ranges() {
        println!("  {:<8} {}", range.label, range.color);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command.unwrap_or_default() {
        Command::Serve(args) => run_serve(args).await,
        Command::Export(args) => run_export(args).await,
        Command::Legend(args) => {
            run_legend(args);
            Ok(())
        }
    }
}
