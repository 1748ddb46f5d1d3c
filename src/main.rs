//! Edge Resizer - on-demand image resizing for origin responses.
//!
//! This binary wires the S3-backed store and the image handler into the
//! Lambda runtime event loop.

use clap::Parser;
use lambda_runtime::{service_fn, LambdaEvent};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use edge_resizer::{
    config::Config,
    create_s3_client,
    event::EdgeEvent,
    handler::ImageHandler,
    store::S3ObjectStore,
};

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::parse();

    // Initialize logging
    init_logging(config.verbose);

    // Validate configuration
    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    info!("Configuration:");
    info!("  S3 bucket: {}", config.bucket);
    if let Some(ref endpoint) = config.s3_endpoint {
        info!("  S3 endpoint: {}", endpoint);
    }
    info!("  S3 region: {}", config.s3_region);
    info!("  Cache max-age: {}s", config.cache_max_age);

    // The client and handler are created once at cold start and reused
    // across invocations
    let s3_client = create_s3_client(config.s3_endpoint.as_deref(), &config.s3_region).await;
    let store = S3ObjectStore::new(s3_client, config.bucket.clone());
    let handler = ImageHandler::with_cache_max_age(store, config.cache_max_age);

    let handler_ref = &handler;
    let service = service_fn(move |event: LambdaEvent<EdgeEvent>| async move {
        Ok::<_, lambda_runtime::Error>(handler_ref.handle(event.payload).await)
    });

    if let Err(e) = lambda_runtime::run(service).await {
        error!("Runtime error: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "edge_resizer=debug,lambda_runtime=debug"
    } else {
        "edge_resizer=info,lambda_runtime=warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
