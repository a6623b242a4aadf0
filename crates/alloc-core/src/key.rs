//! 組合鍵

use serde::{Deserialize, Serialize};

/// 匹配鍵：(物料, 地點)
///
/// 採購單行與銷售訂單行只透過此鍵關聯，不允許跨地點替代。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MatchKey {
    pub item_code: String,
    pub location: String,
}

impl MatchKey {
    pub fn new(item_code: &str, location: &str) -> Self {
        Self {
            item_code: item_code.to_string(),
            location: location.to_string(),
        }
    }

    /// 檢查是否與指定物料/地點相符
    pub fn matches(&self, item_code: &str, location: &str) -> bool {
        self.item_code == item_code && self.location == location
    }
}

impl std::fmt::Display for MatchKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.item_code, self.location)
    }
}

/// 供應鍵：(物料, 地點, 採購單號)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SupplyKey {
    pub item_code: String,
    pub location: String,
    pub po_number: String,
}

impl SupplyKey {
    /// 取得對應的匹配鍵
    pub fn match_key(&self) -> MatchKey {
        MatchKey::new(&self.item_code, &self.location)
    }
}

impl std::fmt::Display for SupplyKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}#{}", self.item_code, self.location, self.po_number)
    }
}
