//! Logger setup based on `tracing-subscriber`.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` takes precedence. When it is not set, `default_level` is applied to
/// the crate named `bin_name` (with `-` replaced by `_`) and `info` to everything else.
///
/// # Arguments
///
/// * `bin_name` - The binary name, usually `env!("CARGO_BIN_NAME")`
/// * `default_level` - Level used for the binary's own crate, e.g. `"debug"`
pub fn setup_logger(bin_name: &str, default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(bin_name, default_level)));

    // try_init: tests and embedded runs may have installed a subscriber already
    let result = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true).with_ansi(true))
        .try_init();

    if result.is_err() {
        tracing::debug!("Global subscriber already set, skipping logger setup");
    }
}

fn default_directive(bin_name: &str, default_level: &str) -> String {
    let crate_name = bin_name.replace('-', "_");
    format!("info,{crate_name}={default_level},boostroom_shared={default_level}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive_uses_crate_name() {
        // テスト項目: バイナリ名から crate 名のフィルタが組み立てられる
        // when (操作):
        let directive = default_directive("boostroom-client", "debug");

        // then (期待する結果):
        assert_eq!(
            directive,
            "info,boostroom_client=debug,boostroom_shared=debug"
        );
    }

    #[test]
    fn test_setup_logger_twice_does_not_panic() {
        // テスト項目: 2 回呼び出しても panic しない
        setup_logger("boostroom-client", "debug");
        setup_logger("boostroom-client", "info");
    }
}
