//! Tracing subscriber setup.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence. Without it, the binary's crate logs at
/// `default_level` and `tower_http` logs at `info`.
///
/// # Arguments
///
/// * `bin_name` - Binary name, used as the env-filter target (`-` becomes `_`)
/// * `default_level` - Level applied when `RUST_LOG` is not set
pub fn setup_logger(bin_name: &str, default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(bin_name, default_level)));

    // try_init: a second call (e.g. from tests) keeps the first subscriber
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .try_init();
}

/// Build the default filter directives for a binary.
fn default_directives(bin_name: &str, default_level: &str) -> String {
    let target = bin_name.replace('-', "_");
    format!("{target}={default_level},tower_http=info")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directives_normalizes_bin_name() {
        // テスト項目: バイナリ名のハイフンがアンダースコアに変換される
        // when (操作):
        let directives = default_directives("hikyaku-server", "debug");

        // then (期待する結果):
        assert_eq!(
            directives,
            "hikyaku_server=debug,tower_http=info"
        );
    }
}
