use anyhow::Context;
use axum::http::Request;
use clap::Parser;
use std::{sync::Arc, time::Duration};
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::info;

use apap_app::{
    cli::{self, Cli},
    settings::Settings,
    state::AppState,
};
use apap_upstream::PaapiClient;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    if args.wants_version() {
        println!("{}", cli::version_line());
        return Ok(());
    }

    dotenvy::dotenv().ok();
    let settings = Settings::from_env().context("invalid configuration")?;

    apap_app::telemetry::init(&settings.log_filter);

    let client = PaapiClient::with_timeouts(CONNECT_TIMEOUT, settings.upstream_timeout)
        .context("HTTP client init failed")?;

    let state = Arc::new(AppState::new(&settings, Arc::new(client)));

    let middleware = ServiceBuilder::new()
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http().make_span_with(|req: &Request<_>| {
                let request_id = req
                    .headers()
                    .get("x-request-id")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("-");
                tracing::info_span!(
                    "http_request",
                    method = %req.method(),
                    uri = %req.uri(),
                    request_id = %request_id
                )
            }),
        );

    let app = apap_app::app::build_router()
        .layer(middleware)
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(settings.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", settings.bind_addr))?;

    info!(
        addr = %settings.bind_addr,
        marketplace = %settings.marketplace,
        max_retries = settings.retry.max_retries,
        request_delay_ms = settings.retry.request_delay.as_millis() as u64,
        "{} started on http://localhost:{}",
        cli::NAME,
        settings.bind_addr.port()
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(apap_app::shutdown::shutdown())
        .await
        .context("server error")?;

    Ok(())
}
