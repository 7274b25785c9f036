use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry,
};

/// Stdout logging for the CLI: a fmt layer plus an `EnvFilter` seeded from
/// `RUST_LOG`, defaulting to `info`.
pub struct StdoutTelemetry {
    logs: fmt::Layer<Registry>,
    filter: EnvFilter,
}

impl StdoutTelemetry {
    fn default_fmt_layer() -> fmt::Layer<Registry> {
        fmt::layer()
            .with_ansi(cfg!(debug_assertions))
            .with_file(true)
            .with_line_number(true)
            .with_target(false)
            .with_thread_names(true)
    }

    pub fn with_filter(mut self, filter: EnvFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn init(self) {
        Registry::default().with(self.logs).with(self.filter).init();
    }
}

impl Default for StdoutTelemetry {
    fn default() -> Self {
        Self {
            logs: Self::default_fmt_layer(),
            filter: EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        }
    }
}
