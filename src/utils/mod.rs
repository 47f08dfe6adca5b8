use dirs::home_dir;
use std::{env, path::PathBuf, sync::Once};

static TRACING_INIT: Once = Once::new();

const DEFAULT_DIR_NAME: &str = ".leasing_inquiry";
pub const HOME_ENV: &str = "LEASING_INQUIRY_HOME";

/// Initializes the global tracing subscriber. Output goes to stderr so it
/// never interleaves with the interactive screens on stdout.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let mut filter = EnvFilter::from_default_env();
        if let Ok(directive) = "leasing_inquiry=info".parse() {
            filter = filter.add_directive(directive);
        }

        fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    });
}

/// Application home, defaulting to `~/.leasing_inquiry`.
pub fn app_home() -> PathBuf {
    if let Some(custom) = env::var_os(HOME_ENV) {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

/// Version line stamped by the build script.
pub fn build_info() -> String {
    format!(
        "{} {} ({} {} {}, built {})",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        env!("LEASING_INQUIRY_BUILD_HASH"),
        env!("LEASING_INQUIRY_BUILD_TARGET"),
        env!("LEASING_INQUIRY_BUILD_PROFILE"),
        env!("LEASING_INQUIRY_BUILD_TIMESTAMP"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_info_names_the_package() {
        let info = build_info();
        assert!(info.starts_with("leasing_inquiry 0.0.1"));
    }
}
