use anyhow::{Context, Result};
use clap::Parser;
use secrecy::SecretString;
use std::path::PathBuf;
use std::time::Duration;

use insights::app::{build_http_client, App};
use insights::config::Config;
use insights::source::RestPostSource;
use insights::ui::{handle_event, RenderOptions, Renderer, StaticPage, UiEvent};

/// Get the config directory path (~/.config/insights/)
fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".config").join("insights"))
}

#[derive(Parser, Debug)]
#[command(
    name = "insights",
    about = "Render published posts as a filterable insight board"
)]
struct Args {
    /// Config file (defaults to ~/.config/insights/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Data service base URL (overrides config)
    #[arg(long, value_name = "URL")]
    source_url: Option<String>,

    /// Select a category
    #[arg(long)]
    category: Option<String>,

    /// Select a tag
    #[arg(long)]
    tag: Option<String>,

    /// Free-text search
    #[arg(long)]
    search: Option<String>,

    /// Open the detail view of the post with this slug
    #[arg(long, value_name = "SLUG")]
    open: Option<String>,

    /// Write the page here instead of stdout
    #[arg(long, short, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Insert post content without sanitizing (local diagnosis only)
    #[arg(long)]
    unsafe_raw_html: bool,
}

impl Args {
    /// Interactions to replay after the load, in the order a reader would
    /// perform them.
    fn events(&self) -> Vec<UiEvent> {
        let mut events = Vec::new();
        if let Some(category) = &self.category {
            events.push(UiEvent::CategorySelected(category.clone()));
        }
        if let Some(tag) = &self.tag {
            events.push(UiEvent::TagClicked(tag.clone()));
        }
        if let Some(query) = &self.search {
            events.push(UiEvent::SearchInput(query.clone()));
        }
        if let Some(slug) = &self.open {
            events.push(UiEvent::OpenPost(slug.clone()));
        }
        events
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config_path = match &args.config {
        Some(path) => path.clone(),
        None => get_config_dir()?.join("config.toml"),
    };
    let mut config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;
    if args.unsafe_raw_html {
        tracing::warn!("--unsafe-raw-html set: post content will not be sanitized");
        config.unsafe_raw_html = true;
    }

    let source_url = args
        .source_url
        .clone()
        .or_else(|| config.source_url.clone())
        .context("No data source configured: set source_url in the config file or pass --source-url")?;

    let client = build_http_client().context("Failed to build HTTP client")?;
    let source = RestPostSource::new(
        client,
        &source_url,
        &config.posts_table,
        config.resolved_api_key().map(SecretString::from),
    )
    .context("Invalid data source")?
    .with_timeout(Duration::from_secs(config.request_timeout_secs));

    let renderer = Renderer::new(RenderOptions::from(&config));
    let mut app = App::new(StaticPage::complete(), renderer);

    let loaded = app.load(&source).await;
    if loaded.is_ok() {
        for event in args.events() {
            handle_event(&mut app, event);
        }
    }

    let document = app.page().to_document("Insights");
    match &args.output {
        Some(path) => {
            std::fs::write(path, &document)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("Wrote {}", path.display());
        }
        None => print!("{document}"),
    }

    if let Err(e) = loaded {
        eprintln!("Error: {}", e.user_message());
        std::process::exit(1);
    }

    Ok(())
}
