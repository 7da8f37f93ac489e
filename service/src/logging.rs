use log::{LevelFilter, SetLoggerError};
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};

/// Dependencies whose records are dropped unless running at Trace.
/// Session and HTTP plumbing log every request and drown out the login flow.
const FILTERED_MODULES: &[&str] = &["tower", "tower_sessions", "hyper", "reqwest", "axum", "mio"];

pub struct Logger {}

impl Logger {
    /// Installs the global terminal logger at `level`.
    ///
    /// At Trace everything is shown, dependencies included. Below Trace the
    /// modules in `FILTERED_MODULES` are silenced.
    pub fn init_logger(level: LevelFilter) -> Result<(), SetLoggerError> {
        let log_config = Self::build_log_config(Self::should_filter_dependencies(level));

        TermLogger::init(level, log_config, TerminalMode::Mixed, ColorChoice::Auto)
    }

    fn should_filter_dependencies(level: LevelFilter) -> bool {
        level != LevelFilter::Trace
    }

    fn build_log_config(apply_filters: bool) -> simplelog::Config {
        let mut builder = ConfigBuilder::new();
        builder.set_time_format_rfc3339();

        if apply_filters {
            for module in FILTERED_MODULES {
                builder.add_filter_ignore_str(module);
            }
        }

        builder.build()
    }
}
