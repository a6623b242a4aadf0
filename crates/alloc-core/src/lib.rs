//! # Allocation Core
//!
//! 核心資料模型與類型定義

pub mod config;
pub mod key;
pub mod outcome;
pub mod purchase_order;
pub mod sales_order;

// Re-export 主要類型
pub use config::{AllocationConfig, CollisionPolicy, QuantityPolicy};
pub use key::{MatchKey, SupplyKey};
pub use outcome::{Assignment, FreeSupply, Shortfall};
pub use purchase_order::PurchaseOrderLine;
pub use sales_order::SalesOrderLine;

use rust_decimal::Decimal;

/// 單據行類別（用於錯誤與警告訊息）
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum LineKind {
    /// 採購單行
    PurchaseOrder,
    /// 銷售訂單行
    SalesOrder,
}

impl std::fmt::Display for LineKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LineKind::PurchaseOrder => write!(f, "PO"),
            LineKind::SalesOrder => write!(f, "SO"),
        }
    }
}

/// 分配錯誤類型
#[derive(Debug, thiserror::Error)]
pub enum AllocError {
    #[error("{kind} 第 {sequence_index} 行 ({reference}) 數量為負: {quantity}")]
    NegativeQuantity {
        kind: LineKind,
        sequence_index: usize,
        reference: String,
        quantity: Decimal,
    },

    #[error("分配結果違反不變量: {0}")]
    InvariantViolation(String),

    #[error("無效的配置: {0}")]
    InvalidConfig(String),

    #[error("{0} 加總溢位")]
    QuantityOverflow(String),
}

pub type Result<T> = std::result::Result<T, AllocError>;
