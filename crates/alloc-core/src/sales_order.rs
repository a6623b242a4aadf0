//! 銷售訂單（需求）模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::key::MatchKey;

/// 銷售訂單行
///
/// 分配期間唯讀，剩餘需求由分配器以區域變數追蹤。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesOrderLine {
    /// 原始輸入順序
    pub sequence_index: usize,

    /// 物料代碼
    pub item_code: String,

    /// 需求地點
    pub location: String,

    /// 銷售訂單號
    pub so_number: String,

    /// 需求數量
    pub quantity: Decimal,
}

impl SalesOrderLine {
    /// 創建新的銷售訂單行
    pub fn new(
        sequence_index: usize,
        item_code: String,
        location: String,
        so_number: String,
        quantity: Decimal,
    ) -> Self {
        Self {
            sequence_index,
            item_code,
            location,
            so_number,
            quantity,
        }
    }

    pub fn match_key(&self) -> MatchKey {
        MatchKey::new(&self.item_code, &self.location)
    }

    /// 檢查是否有待滿足的需求
    pub fn has_demand(&self) -> bool {
        self.quantity > Decimal::ZERO
    }
}
