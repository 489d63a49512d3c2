use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, anyhow};
use axum_server::tls_rustls::RustlsConfig;
use clap::Parser;
use http::header::{ACCEPT, CONTENT_TYPE, X_CONTENT_TYPE_OPTIONS, X_FRAME_OPTIONS};
use http::{HeaderValue, Method};
use tokio::net::TcpListener;
use tower_governor::{
    GovernorLayer, governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::{info, warn};

use ddobaki_gateway::{ServerConfig, logging, routes, state::AppState};

/// Rates at or above this value turn the limiter off.
const RATE_LIMIT_DISABLED_AT: u32 = 100_000;

/// Ddobaki Gateway - chat, sentiment, speech-to-text and text-to-speech for the companion app
#[derive(Parser, Debug)]
#[command(name = "ddobaki-gateway")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to configuration file (YAML)
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    config: Option<PathBuf>,
}

/// `*` allows any origin, a comma-separated list allows those origins, and
/// unset keeps the browser's same-origin policy.
fn cors_layer(origins: Option<&str>) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, ACCEPT]);

    match origins {
        Some("*") => base.allow_origin(Any),
        Some(list) => {
            let parsed: Vec<HeaderValue> = list
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .filter_map(|s| match s.parse() {
                    Ok(value) => Some(value),
                    Err(_) => {
                        warn!(origin = s, "Ignoring malformed CORS origin");
                        None
                    }
                })
                .collect();
            base.allow_origin(parsed)
        }
        None => {
            info!("CORS_ALLOWED_ORIGINS unset, cross-origin requests will be blocked");
            base
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env must be loaded before the config is read
    let _ = dotenvy::dotenv();

    logging::init_tracing();

    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| anyhow!("Failed to install default crypto provider"))?;

    let cli = Cli::parse();

    // A missing OPENAI_API_KEY fails here, before anything is bound
    let config = match cli.config {
        Some(path) => {
            info!(path = %path.display(), "Loading configuration file");
            ServerConfig::from_file(&path)?
        }
        None => ServerConfig::from_env()?,
    };

    let socket_addr: SocketAddr = config
        .address()
        .parse()
        .with_context(|| format!("Invalid server address '{}'", config.address()))?;
    let tls = config.tls.clone();
    let scheme = if config.is_tls_enabled() { "https" } else { "http" };
    let cors = cors_layer(config.cors_allowed_origins.as_deref());
    let request_body_limit = config.request_body_limit();
    let (rps, burst) = (
        config.rate_limit_requests_per_second,
        config.rate_limit_burst_size,
    );

    let governor = if rps < RATE_LIMIT_DISABLED_AT {
        let governor_config = GovernorConfigBuilder::default()
            .per_second(u64::from(rps.max(1)))
            .burst_size(burst.max(1))
            .key_extractor(SmartIpKeyExtractor)
            .finish()
            .ok_or_else(|| anyhow!("Failed to build rate limiter config"))?;
        info!(per_second = rps, burst, "Rate limiting enabled");
        Some(GovernorLayer::new(governor_config))
    } else {
        info!("Rate limiting disabled");
        None
    };

    let state = AppState::new(config)?;

    let app = routes::api::create_api_router(request_body_limit)
        .with_state(state)
        .layer(cors)
        .layer(tower::util::option_layer(governor))
        .layer(SetResponseHeaderLayer::overriding(
            X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ));
    let service = app.into_make_service_with_connect_info::<SocketAddr>();

    info!("Ddobaki gateway listening on {}://{}", scheme, socket_addr);

    match tls {
        Some(tls) => {
            let rustls_config = RustlsConfig::from_pem_file(&tls.cert_path, &tls.key_path)
                .await
                .with_context(|| {
                    format!(
                        "Failed to load TLS certificate {} / key {}",
                        tls.cert_path.display(),
                        tls.key_path.display()
                    )
                })?;
            axum_server::bind_rustls(socket_addr, rustls_config)
                .serve(service)
                .await
                .context("TLS server error")?;
        }
        None => {
            let listener = TcpListener::bind(socket_addr).await?;
            axum::serve(listener, service).await?;
        }
    }

    Ok(())
}
