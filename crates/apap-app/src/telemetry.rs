use tracing::Subscriber;
use tracing_subscriber::{fmt::MakeWriter, EnvFilter};

/// JSON event subscriber writing to `writer`, one object per line.
pub fn subscriber<W>(filter: EnvFilter, writer: W) -> impl Subscriber + Send + Sync + 'static
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_target(false)
        .with_writer(writer)
        .finish()
}

/// Installs the process-wide subscriber on stdout. `RUST_LOG` wins over
/// `APAP_LOG`.
pub fn init(log_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_filter));
    if tracing::subscriber::set_global_default(subscriber(filter, std::io::stdout)).is_err() {
        tracing::warn!("tracing subscriber already installed");
    }
}
