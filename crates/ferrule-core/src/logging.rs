use crate::config::Config;

/// Default filter used when neither the config nor `RUST_LOG` names one.
pub const DEFAULT_FILTER: &str = "info,ferrule_widgets=debug";

pub fn init() {
    init_with_filter(DEFAULT_FILTER);
}

pub fn init_from_config(config: &Config) {
    init_with_filter(config.log_filter.as_deref().unwrap_or(DEFAULT_FILTER));
}

/// Install the global fmt subscriber. `RUST_LOG` wins over `filter` when set.
///
/// Calling this twice is harmless; the second subscriber is rejected and the
/// first one stays installed.
pub fn init_with_filter(filter: &str) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter));
    let _ = tracing_subscriber::fmt().with_env_filter(env_filter).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_twice_is_harmless() {
        init_with_filter("warn");
        init_from_config(&Config {
            log_filter: Some(String::from("debug")),
            ..Config::default()
        });
        tracing::debug!("still logging after a second init");
    }
}
