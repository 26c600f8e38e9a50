use perpstats::datasource::{SubgraphSource, VaultReader};
use perpstats::{Config, Snapshotter};
use std::sync::Arc;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into()),
        )
        .init();

    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let source = Arc::new(SubgraphSource::new(&config));
    let chain = match VaultReader::connect(&config) {
        Ok(reader) => Arc::new(reader),
        Err(e) => {
            eprintln!("Failed to set up chain readers: {}", e);
            std::process::exit(1);
        }
    };

    // Run the snapshot pipeline
    let snapshotter = Snapshotter::new(source, chain);
    match snapshotter.run().await {
        Ok(report) => println!("{}", report),
        Err(e) => {
            eprintln!("Snapshot failed: {}", e);
            std::process::exit(1);
        }
    }
}
