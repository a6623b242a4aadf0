//! 日誌系統初始化
//!
//! 使用 tracing 和 tracing-subscriber，支援環境變數設定日誌等級。

use tracing_subscriber::{fmt, EnvFilter};

/// 初始化日誌系統
///
/// # 環境變數
/// - RUST_LOG: 日誌等級過濾器（預設: info）
///   例如: RUST_LOG=debug 或 RUST_LOG=alloc_calc=trace
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .init();
}
