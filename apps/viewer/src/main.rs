use std::{sync::Arc, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{
    entity_path, BlocksClient, CatalogClient, MemoryNavigator, TableQuery, ViewController,
};
use shared::domain::QueryFilter;
use tokio_stream::StreamExt;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod render;

use render::render_snapshot;

#[derive(Parser, Debug)]
#[command(about = "Browse reusable workflow building blocks from the catalog")]
struct Args {
    /// Catalog API base, e.g. http://localhost:7007/api/catalog
    #[arg(long, env = "CATALOG_URL")]
    catalog_url: String,
    /// Building blocks backend base, e.g. http://localhost:7007/api/blocks
    #[arg(long, env = "BLOCKS_URL")]
    blocks_url: Option<String>,
    #[arg(long, default_value = "/building-blocks")]
    base_path: String,
    /// Open the detail view for this workflow, as a deep link would.
    #[arg(long)]
    select: Option<String>,
    #[arg(long, default_value = "")]
    search: String,
    /// One-based page number.
    #[arg(long, default_value_t = 1)]
    page: usize,
    #[arg(long, default_value_t = 5)]
    page_size: usize,
    #[arg(long)]
    timeout_secs: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    if let Some(blocks_url) = &args.blocks_url {
        print_building_blocks(blocks_url).await;
    }

    let source = CatalogClient::with_timeout(
        &args.catalog_url,
        args.timeout_secs.map(Duration::from_secs),
    )?;
    let initial_path = match &args.select {
        Some(name) => entity_path(&args.base_path, name),
        None => args.base_path.clone(),
    };
    let navigator = MemoryNavigator::new(initial_path);
    let controller = ViewController::new(Arc::new(source), navigator, args.base_path.clone());
    controller.follow_location();

    let mut snapshots = controller.snapshots();
    let fetch = controller
        .start(QueryFilter::github_workflows())
        .context("controller refused to start")?;

    let query = TableQuery::new(args.search, args.page.saturating_sub(1), args.page_size);
    while let Some(snapshot) = snapshots.next().await {
        print!("{}", render_snapshot(&snapshot, &query));
        if !snapshot.view_state.is_loading() {
            break;
        }
    }

    if let Some(name) = &args.select {
        if controller.snapshot().selection.is_none() {
            warn!(name = name.as_str(), "requested workflow is not in the catalog");
        }
    }

    controller.stop();
    fetch.await.context("fetch task panicked")?;
    Ok(())
}

async fn print_building_blocks(blocks_url: &str) {
    let client = BlocksClient::new(blocks_url);
    match client.health().await {
        Ok(true) => info!(blocks_url, "building blocks backend healthy"),
        Ok(false) => warn!(blocks_url, "building blocks backend reported unhealthy"),
        Err(error) => {
            warn!(blocks_url, %error, "building blocks backend unreachable");
            return;
        }
    }
    match client.building_blocks().await {
        Ok(blocks) => println!("Reusable building blocks: {}\n", blocks.join(", ")),
        Err(error) => warn!(%error, "failed to list building blocks"),
    }
}
