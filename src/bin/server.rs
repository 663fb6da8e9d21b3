use std::{
    fs::OpenOptions,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    process::ExitCode,
    sync::Arc,
};

use axum::{
    Router,
    extract::{MatchedPath, Request},
    middleware,
};
use axum_server::Handle;
use clap::Parser;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{EnvFilter, Layer, filter, layer::SubscriberExt, util::SubscriberInitExt};

use slipbook::{
    AppState, DEFAULT_RECENT_LIMIT, build_router, graceful_shutdown, logging_middleware,
};

/// The REST API server for slipbook.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The base URL of the upstream API that stores transactions.
    #[arg(long, env = "SLIPBOOK_UPSTREAM_URL")]
    upstream_url: String,

    /// The port to serve the API from.
    #[arg(short, long, env = "SLIPBOOK_PORT", default_value_t = 3000)]
    port: u16,

    /// The IP address to serve the API from.
    #[arg(short, long, default_value_t = IpAddr::V4(Ipv4Addr::LOCALHOST))]
    address: IpAddr,

    /// The canonical name of the local timezone, e.g. "Pacific/Auckland".
    #[arg(long, env = "SLIPBOOK_TIMEZONE", default_value = "Etc/UTC")]
    timezone: String,

    /// The number of recent transactions to list when a request does not say.
    #[arg(long, default_value_t = DEFAULT_RECENT_LIMIT)]
    recent_limit: usize,
}

#[tokio::main]
async fn main() -> ExitCode {
    setup_logging();

    let args = Args::parse();

    let app_state = match AppState::new(&args.upstream_url, &args.timezone, args.recent_limit) {
        Ok(app_state) => app_state,
        Err(error) => {
            tracing::error!("Could not start the server: {error}");
            return ExitCode::FAILURE;
        }
    };

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let router = add_tracing_layer(
        build_router(app_state).layer(middleware::from_fn(logging_middleware)),
    );

    let addr = SocketAddr::new(args.address, args.port);
    tracing::info!(
        "HTTP server listening on {addr}, reading transactions from {}",
        args.upstream_url
    );

    if let Err(error) = axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await
    {
        tracing::error!("Server stopped with an error: {error}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn setup_logging() {
    let stdout_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")));

    let debug_log = OpenOptions::new()
        .create(true)
        .append(true)
        .open("debug.log")
        .inspect_err(|error| eprintln!("Could not open debug.log, file logging is off: {error}"))
        .ok()
        .map(|log_file| {
            tracing_subscriber::fmt::layer()
                .pretty()
                .with_ansi(false)
                .with_writer(Arc::new(log_file))
                .with_filter(filter::LevelFilter::DEBUG)
        });

    tracing_subscriber::registry()
        .with(stdout_log)
        .with(debug_log)
        .init();
}

fn add_tracing_layer(router: Router) -> Router {
    let tracing_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request| {
            let method = req.method();
            let uri = req.uri();

            let matched_path = req
                .extensions()
                .get::<MatchedPath>()
                .map(|matched_path| matched_path.as_str());

            tracing::debug_span!("request", %method, %uri, matched_path)
        })
        // By default, `TraceLayer` will log 5xx responses but we're doing our specific
        // logging of errors so disable that
        .on_failure(());

    router.layer(tracing_layer)
}
