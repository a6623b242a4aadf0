//! # Allocation I/O
//!
//! CSV 載入、工作簿匯出與執行摘要

pub mod export;
pub mod loader;
pub mod summary;

// Re-export 主要類型
pub use export::{Sheet, Workbook};
pub use loader::{
    load_purchase_orders, load_purchase_orders_from_path, load_sales_orders,
    load_sales_orders_from_path, ColumnMapping,
};
pub use summary::RunSummary;

use std::path::PathBuf;

/// I/O 錯誤類型
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("無法開啟檔案 {}: {cause}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        cause: std::io::Error,
    },

    #[error("{file} 缺少必要欄位: {column}")]
    MissingColumn { file: String, column: String },

    #[error("{file} 第 {row} 列欄位 {column} 不是有效數量: {value:?}")]
    InvalidQuantity {
        file: String,
        row: usize,
        column: String,
        value: String,
    },

    #[error("CSV 錯誤: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO 錯誤: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON 錯誤: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Alloc(#[from] alloc_core::AllocError),
}

pub type Result<T> = std::result::Result<T, IoError>;
