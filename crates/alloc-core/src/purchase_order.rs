//! 採購單（供應）模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::key::{MatchKey, SupplyKey};

/// 採購單行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseOrderLine {
    /// 原始輸入順序（FIFO 優先級，載入時指定）
    pub sequence_index: usize,

    /// 物料代碼
    pub item_code: String,

    /// 供應地點
    pub location: String,

    /// 採購單號（同一單號可能出現多行）
    pub po_number: String,

    /// 可用數量
    pub quantity: Decimal,
}

impl PurchaseOrderLine {
    /// 創建新的採購單行
    pub fn new(
        sequence_index: usize,
        item_code: String,
        location: String,
        po_number: String,
        quantity: Decimal,
    ) -> Self {
        Self {
            sequence_index,
            item_code,
            location,
            po_number,
            quantity,
        }
    }

    /// 匹配鍵 (物料, 地點)
    pub fn match_key(&self) -> MatchKey {
        MatchKey::new(&self.item_code, &self.location)
    }

    /// 供應鍵 (物料, 地點, 採購單號)
    pub fn supply_key(&self) -> SupplyKey {
        SupplyKey {
            item_code: self.item_code.clone(),
            location: self.location.clone(),
            po_number: self.po_number.clone(),
        }
    }

    /// 檢查是否有可分配的供應
    pub fn has_supply(&self) -> bool {
        self.quantity > Decimal::ZERO
    }
}
