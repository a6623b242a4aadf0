//! # Allocation Engine
//!
//! FIFO 供需分配引擎

pub mod allocator;
pub mod batch;
pub mod ledger;
pub mod verify;

// Re-export 主要類型
pub use allocator::Allocator;
pub use batch::AllocationRequest;
pub use ledger::SupplyLedger;
pub use verify::verify;

use alloc_core::{AllocError, Assignment, FreeSupply, Shortfall};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 分配結果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationResult {
    /// 分配記錄（SO 輸入順序，再依 PO FIFO 順序）
    pub assignments: Vec<Assignment>,

    /// 可售供應（PO 輸入順序）
    pub free_supply: Vec<FreeSupply>,

    /// 需求缺口（SO 輸入順序）
    pub shortfalls: Vec<Shortfall>,

    /// 警告信息
    pub warnings: Vec<AllocationWarning>,

    /// 計算耗時（毫秒）
    #[serde(skip)]
    pub calculation_time_ms: Option<u128>,
}

impl AllocationResult {
    /// 創建空的分配結果
    pub fn empty() -> Self {
        Self {
            assignments: Vec::new(),
            free_supply: Vec::new(),
            shortfalls: Vec::new(),
            warnings: Vec::new(),
            calculation_time_ms: None,
        }
    }

    /// 添加警告
    pub fn add_warning(&mut self, warning: AllocationWarning) {
        self.warnings.push(warning);
    }

    /// 已分配總量
    pub fn total_assigned(&self) -> alloc_core::Result<Decimal> {
        checked_total("已分配數量", self.assignments.iter().map(|a| a.quantity_assigned))
    }

    /// 可售總量
    pub fn total_free(&self) -> alloc_core::Result<Decimal> {
        checked_total("可售數量", self.free_supply.iter().map(|f| f.free_quantity))
    }

    /// 未滿足需求總量
    pub fn total_unfulfilled(&self) -> alloc_core::Result<Decimal> {
        checked_total("未滿足數量", self.shortfalls.iter().map(|s| s.unfulfilled))
    }

    /// 檢查所有需求是否都已滿足
    pub fn is_fully_allocated(&self) -> bool {
        self.shortfalls.is_empty()
    }
}

/// 逐筆加總，超出 `Decimal` 範圍時返回錯誤
pub(crate) fn checked_total(
    label: &str,
    quantities: impl IntoIterator<Item = Decimal>,
) -> alloc_core::Result<Decimal> {
    quantities
        .into_iter()
        .try_fold(Decimal::ZERO, |total, q| total.checked_add(q))
        .ok_or_else(|| AllocError::QuantityOverflow(label.to_string()))
}

/// 分配警告
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationWarning {
    /// 相關單據（如 PO/SO 號或組合鍵）
    pub subject: String,
    pub message: String,
    pub severity: WarningSeverity,
}

impl AllocationWarning {
    pub fn new(subject: String, message: String, severity: WarningSeverity) -> Self {
        Self {
            subject,
            message,
            severity,
        }
    }

    pub fn info(subject: String, message: String) -> Self {
        Self::new(subject, message, WarningSeverity::Info)
    }

    pub fn warning(subject: String, message: String) -> Self {
        Self::new(subject, message, WarningSeverity::Warning)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarningSeverity {
    Info,
    Warning,
}
