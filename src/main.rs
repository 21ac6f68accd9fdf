// Command-line entry point.
// Warms the cache and prints one page of a catalog collection.

use bertini::cms::{APPLICATIONS, SMARTPHONES};
use bertini::state::{CollectionPager, PagerConfig};
use bertini::{CmsClient, Config, Prefetcher};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bertini=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = run().await {
        error!(error = %e, "bertini failed");
        std::process::exit(1);
    }
}

async fn run() -> bertini::Result<()> {
    let config = Config::load()?;
    info!(api_url = %config.api_url, "configuration loaded");

    let client = CmsClient::from_config(&config)?;
    let prefetch = Prefetcher::with_defaults(client.clone()).spawn();

    let mut args = std::env::args().skip(1);
    let pager_config = match args.next().as_deref() {
        Some("applications") => PagerConfig::applications(),
        Some("smartphones") | None => PagerConfig::smartphones(),
        Some(other) => PagerConfig::new(format!("/{}", other.trim_start_matches('/'))),
    };
    let page = args.next().and_then(|p| p.parse().ok()).unwrap_or(1);
    let resource = pager_config.resource.clone();

    let pager: CollectionPager<bertini::cms::Product> =
        CollectionPager::mount(client.clone(), pager_config.with_initial_page(page)).await;

    if let Some(message) = pager.error() {
        println!("Could not load {}: {}", resource, message);
        if resource == SMARTPHONES || resource == APPLICATIONS {
            println!("Featured:");
            for product in client.fetch_featured(&resource, 2).await {
                println!("  {}", product.name);
            }
        }
    } else if let Some(pagination) = pager.pagination() {
        println!(
            "{} page {}/{} ({} items)",
            resource, pagination.current_page, pagination.total_pages, pagination.total_items
        );
        for product in pager.items() {
            match &product.price {
                Some(price) => println!("  {} - {}", product.name, price),
                None => println!("  {}", product.name),
            }
        }
    }

    match prefetch.await {
        Ok(report) => info!(
            succeeded = report.succeeded.len(),
            failed = report.failed.len(),
            "prefetch finished"
        ),
        Err(e) => error!(error = %e, "prefetch task panicked"),
    }

    Ok(())
}
