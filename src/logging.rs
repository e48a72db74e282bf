//! ログ初期化
//!
//! 出力は標準エラー。標準出力は送信したJSON専用。

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// RUST_LOG があればそれを優先する
pub fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "info,grocery_request=debug,grocery_request_common=debug"
    } else {
        "warn"
    };
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    // テストなどで二重に初期化された場合は既存の設定を使う
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_file(verbose)
                .with_line_number(verbose),
        )
        .try_init();
}
