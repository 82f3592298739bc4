use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

pub const LOG_ENV: &str = "REPOPULSE_LOG";

/// Machine-readable output owns stdout, so logging is off unless
/// `REPOPULSE_LOG` asks for it.
pub fn level_for(verbosity: u8, machine_readable: bool) -> LevelFilter {
    if machine_readable {
        return LevelFilter::OFF;
    }
    match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Diagnostics go to stdout alongside the report summary.
pub fn setup_logger(verbosity: u8, machine_readable: bool) {
    let env_filter = EnvFilter::builder()
        .with_default_directive(level_for(verbosity, machine_readable).into())
        .with_env_var(LOG_ENV)
        .from_env_lossy();

    let fmt = fmt::layer()
        .with_ansi(console::colors_enabled())
        .with_target(false)
        .without_time()
        .with_writer(std::io::stdout);

    let _ = tracing_subscriber::registry().with(fmt).with(env_filter).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_raises_level() {
        assert_eq!(level_for(0, false), LevelFilter::WARN);
        assert_eq!(level_for(1, false), LevelFilter::INFO);
        assert_eq!(level_for(2, false), LevelFilter::DEBUG);
        assert_eq!(level_for(9, false), LevelFilter::TRACE);
    }

    #[test]
    fn machine_readable_output_silences_logs() {
        assert_eq!(level_for(0, true), LevelFilter::OFF);
        assert_eq!(level_for(3, true), LevelFilter::OFF);
    }
}
