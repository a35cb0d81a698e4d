use std::sync::Arc;

use anyhow::Result;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use clap::Parser;
use clap_serde_derive::ClapSerde;
use serde::Serialize;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::config::Config;
use crate::grading::handler::handle_grading_request;
use crate::llm::gemini::GeminiClient;
use crate::llm::TextGenerator;
use crate::telemetry::init_telemetry;

mod config;
mod error;
mod extractors;
mod grading;
mod llm;
mod telemetry;

#[cfg(unix)]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

const DEFAULT_CONFIG_FILE: &str = "EssayGrader.toml";

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, env, default_value = DEFAULT_CONFIG_FILE)]
    config_file: String,

    /// OTLP endpoint that traces and metrics are exported to
    #[arg(long, env)]
    otel_endpoint: Option<String>,

    /// Keep logging to the console while exporting to an OTLP endpoint
    #[arg(long, env, default_value_t = false)]
    console: bool,

    /// Configuration options
    #[command(flatten)]
    pub opt_config: <Config as ClapSerde>::Opt,
}

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) generator: Arc<dyn TextGenerator>,
    pub(crate) validate_response: bool,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_telemetry(&args.otel_endpoint, args.console)?;

    let config = match Config::from_toml(&args.config_file) {
        Ok(conf) => conf.merge(args.opt_config),
        Err(err) => {
            if args.config_file == DEFAULT_CONFIG_FILE {
                Config::default().merge(args.opt_config)
            } else {
                exit_err!(1, "Failed to load configuration: {:#}", err);
            }
        }
    };
    if config.api_key.is_empty() {
        exit_err!(1, "No Gemini API key configured, set GEMINI_API_KEY or api_key");
    }

    let generator = match GeminiClient::new(&config.api_base_url, &config.model, &config.api_key) {
        Ok(client) => client,
        Err(err) => exit_err!(1, "Failed to create Gemini client: {:#}", err),
    };
    let state = AppState {
        generator: Arc::new(generator),
        validate_response: config.validate_response,
    };

    let listener = TcpListener::bind(format!("{}:{}", config.address, config.port)).await?;
    info!(
        model = %config.model,
        validate_response = config.validate_response,
        "Listening on {}",
        listener.local_addr()?
    );

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

pub(crate) fn router(state: AppState) -> Router {
    Router::new()
        .route("/grade", post(handle_grading_request))
        .route("/health", get(handle_health_request))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn handle_health_request() -> (StatusCode, Json<HealthResponse>) {
    (StatusCode::OK, Json(HealthResponse { status: "ok" }))
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutting down..."),
        Err(e) => error!("Failed to listen for shutdown signal: {}", e),
    }
}

#[macro_export]
macro_rules! exit_err {
    ($code:expr, $fmt:expr $(, $arg:expr)*) => {
        {
            error!($fmt $(, $arg)*);
            std::process::exit($code);
        }
    };
}
