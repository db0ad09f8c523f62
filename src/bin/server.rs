use membership_filter::api::create_router;
use membership_filter::common::bits2hr;
use membership_filter::{AppState, FilterParams, ServerConfig};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    // load configuration from environment variables
    let config = ServerConfig::from_env()?;
    let state = Arc::new(AppState::from_config(&config)?);

    // Create router with logging middleware
    let app = create_router(state.clone()).layer(
        tower_http::trace::TraceLayer::new_for_http()
            .make_span_with(|request: &axum::http::Request<_>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            })
            .on_response(
                |response: &axum::http::Response<_>,
                 latency: std::time::Duration,
                 _span: &tracing::Span| {
                    tracing::info!(
                        status = %response.status(),
                        latency = ?latency,
                        "response generated"
                    );
                },
            ),
    );

    let addr = format!("{}:{}", config.server_host, config.server_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    if config.init_on_startup {
        let params = FilterParams::from(&config.filter_config());
        info!(
            r#"
    🦀 Bloom Filter Membership Server Starting! 🚀

    📊 Filter Configuration:
       • Expected Items: {:>12} items
       • False Positive Rate: {:>8.4}%
       • Bit Array Size: {:>12} bits
       • Hash Count: {:>16}
       • Estimated Memory: {:>12}
       • Max Filter Size: {:>11} bits

    🌐 Server Information:
       • Listening on:  http://{}
       • Swagger UI:    http://{}/docs/
       • Health Check:  http://{}/health

    🎯 API Endpoints:
       • POST   /init   - Reinitialize filter
       • POST   /add    - Add item
       • POST   /check  - Check item
       • GET    /stats  - Filter statistics

    🔧 Performance Mode: {}
    "#,
            config.bloom_expected_items,
            config.bloom_false_positive_rate * 100.0,
            params.size,
            params.hash_count,
            bits2hr(params.size),
            state.max_filter_bits(),
            addr,
            addr,
            addr,
            if cfg!(debug_assertions) {
                "DEBUG"
            } else {
                "RELEASE"
            }
        );
    } else {
        warn!("Startup initialization disabled, POST /init before use");
    }

    info!("Starting server on {}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}
