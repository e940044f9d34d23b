use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialise the stderr subscriber.
///
/// An explicit `--log-level` wins, then `RUST_LOG`, then the `-v` count
/// (none: warn, one: info, more: debug).
pub fn setup_logging(log_level: Option<&str>, verbose: u8) {
    let filter = match log_level {
        Some(level) => EnvFilter::try_new(normalise(level)).unwrap_or_else(|_| EnvFilter::new("warn")),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(match verbose {
                0 => "warn",
                1 => "info",
                _ => "debug",
            })
        }),
    };

    let layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry().with(filter).with(layer).init();
}

fn normalise(level: &str) -> String {
    match level.to_uppercase().as_str() {
        "WARNING" => "warn".to_string(),
        "CRITICAL" | "FATAL" => "error".to_string(),
        _ => level.to_lowercase(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_names_normalised() {
        assert_eq!(normalise("WARNING"), "warn");
        assert_eq!(normalise("Debug"), "debug");
        assert_eq!(normalise("critical"), "error");
        assert_eq!(normalise("frete_core=trace"), "frete_core=trace");
    }
}
