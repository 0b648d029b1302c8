//! Inventory Console - terminal front end
//!
//! Loads the monthly inventory lists once, applies the requested month,
//! search and filters, prints one page of the table, and waits for any
//! low-stock audits triggered by a fresh import before exiting.

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use inventory_console::external::InventoryApiClient;
use inventory_console::render;
use inventory_console::services::{AuditQueue, FileStore, InventoryPage, Session};
use inventory_console::Config;
use shared::{CategoryFilter, MonthKey, StatusFilter};

#[derive(Parser, Debug)]
#[command(name = "inventory-console", about = "Browse monthly inventory lists")]
struct Cli {
    /// Month to show (YYYY-MM); defaults to the first month returned
    #[arg(long, value_parser = parse_month)]
    month: Option<MonthKey>,

    /// Case-insensitive search on item code or description
    #[arg(long, default_value = "")]
    search: String,

    /// Category filter (all, meat_material, meat_alternate, food_ingredient, packaging, casing, tin_can, other)
    #[arg(long, default_value = "all", value_parser = parse_category)]
    category: CategoryFilter,

    /// Status filter (all, in-stock, low-stock)
    #[arg(long, default_value = "all", value_parser = parse_status)]
    status: StatusFilter,

    /// Page of the filtered table
    #[arg(long, default_value_t = 1)]
    page: u32,

    /// Session file; overrides the configured path
    #[arg(long)]
    session: Option<PathBuf>,

    /// Mark an import as just completed before loading
    #[arg(long)]
    after_import: bool,
}

fn parse_month(value: &str) -> Result<MonthKey, String> {
    MonthKey::parse(value).map_err(|e| e.to_string())
}

fn parse_category(value: &str) -> Result<CategoryFilter, String> {
    CategoryFilter::parse(value).map_err(|e| e.to_string())
}

fn parse_status(value: &str) -> Result<StatusFilter, String> {
    StatusFilter::parse(value).map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "inventory_console=info,reqwest=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::load()?;

    tracing::info!("Starting inventory console");
    tracing::info!("Environment: {}", config.environment);
    tracing::info!("Backend: {}", config.api.base_url);

    let session_path = cli.session.clone().unwrap_or_else(|| config.session.path.clone());
    let session = Session::new(Arc::new(FileStore::new(session_path)));
    if cli.after_import {
        session.mark_import()?;
    }

    let api = Arc::new(InventoryApiClient::new(&config.api)?);
    let audit = AuditQueue::spawn(api.clone());

    let mut page = InventoryPage::new(config.inventory.page_size);
    page.load(api.as_ref(), &session, &audit).await;

    if let Some(month) = &cli.month {
        if let Err(e) = page.select_month(month) {
            tracing::warn!("{}", e);
        }
    }
    page.set_search(cli.search.clone());
    page.set_category(cli.category);
    page.set_status(cli.status);
    if cli.page != 1 {
        if let Err(e) = page.set_page(cli.page) {
            tracing::warn!("{}", e);
        }
    }

    print!("{}", render::render_page(&page));

    let summary = audit.shutdown().await?;
    if summary.sent + summary.failed > 0 {
        tracing::info!(
            "Low-stock audits: {} sent, {} failed",
            summary.sent,
            summary.failed
        );
    }

    Ok(())
}
