//! 分配結果模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::purchase_order::PurchaseOrderLine;
use crate::sales_order::SalesOrderLine;

/// 分配記錄（SO 行 ← PO 行）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    /// 物料代碼
    pub item_code: String,

    /// 地點
    pub location: String,

    /// 銷售訂單號
    pub so_number: String,

    /// 採購單號
    pub po_number: String,

    /// 分配數量（恆大於零）
    pub quantity_assigned: Decimal,

    /// 來源 SO 行在輸入中的位置
    pub so_sequence: usize,

    /// 來源 PO 行在輸入中的位置
    pub po_sequence: usize,
}

impl Assignment {
    /// 由一組 SO/PO 行及其輸入位置建立分配記錄
    ///
    /// 位置由呼叫端提供，不取自記錄上的 `sequence_index`。
    pub fn between(
        so_sequence: usize,
        so: &SalesOrderLine,
        po_sequence: usize,
        po: &PurchaseOrderLine,
        quantity_assigned: Decimal,
    ) -> Self {
        Self {
            item_code: so.item_code.clone(),
            location: so.location.clone(),
            so_number: so.so_number.clone(),
            po_number: po.po_number.clone(),
            quantity_assigned,
            so_sequence,
            po_sequence,
        }
    }
}

/// 可售供應（未被消耗的 PO 數量）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FreeSupply {
    pub item_code: String,
    pub location: String,
    pub po_number: String,

    /// 剩餘可售數量（恆大於零）
    pub free_quantity: Decimal,

    pub po_sequence: usize,
}

impl FreeSupply {
    pub fn from_line(po_sequence: usize, po: &PurchaseOrderLine, free_quantity: Decimal) -> Self {
        Self {
            item_code: po.item_code.clone(),
            location: po.location.clone(),
            po_number: po.po_number.clone(),
            free_quantity,
            po_sequence,
        }
    }
}

/// 缺口記錄（SO 需求未完全滿足）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shortfall {
    pub item_code: String,
    pub location: String,
    pub so_number: String,
    pub so_sequence: usize,

    /// 需求數量
    pub requested: Decimal,

    /// 已分配數量
    pub assigned: Decimal,

    /// 未滿足數量
    pub unfulfilled: Decimal,
}

impl Shortfall {
    /// 依需求與已分配數量建立缺口記錄，無缺口時返回 None
    pub fn evaluate(so_sequence: usize, so: &SalesOrderLine, assigned: Decimal) -> Option<Self> {
        let unfulfilled = so.quantity - assigned;
        if unfulfilled <= Decimal::ZERO {
            return None;
        }

        Some(Self {
            item_code: so.item_code.clone(),
            location: so.location.clone(),
            so_number: so.so_number.clone(),
            so_sequence,
            requested: so.quantity,
            assigned,
            unfulfilled,
        })
    }

    /// 檢查是否完全沒有分配
    pub fn is_total(&self) -> bool {
        self.assigned.is_zero()
    }
}
