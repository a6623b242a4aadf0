//! 分配配置模型

use serde::{Deserialize, Serialize};

use crate::AllocError;

/// 分配參數配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AllocationConfig {
    /// 相同 (物料, 地點, 採購單號) 的 PO 行處理方式
    pub collision_policy: CollisionPolicy,

    /// 負數量處理方式
    pub quantity_policy: QuantityPolicy,

    /// 匯出時是否附加缺口工作表
    pub export_shortfall: bool,
}

impl Default for AllocationConfig {
    fn default() -> Self {
        Self {
            collision_policy: CollisionPolicy::DistinctLines,
            quantity_policy: QuantityPolicy::Lenient,
            export_shortfall: false,
        }
    }
}

impl AllocationConfig {
    /// 創建預設配置
    pub fn new() -> Self {
        Self::default()
    }

    /// 建構器模式：設置鍵衝突策略
    pub fn with_collision_policy(mut self, policy: CollisionPolicy) -> Self {
        self.collision_policy = policy;
        self
    }

    /// 建構器模式：設置負數量策略
    pub fn with_quantity_policy(mut self, policy: QuantityPolicy) -> Self {
        self.quantity_policy = policy;
        self
    }

    /// 建構器模式：設置是否匯出缺口
    pub fn with_export_shortfall(mut self, export: bool) -> Self {
        self.export_shortfall = export;
        self
    }

    /// 從 JSON 字串載入配置，未提供的欄位使用預設值
    ///
    /// # 範例
    /// ```
    /// # use alloc_core::{AllocationConfig, CollisionPolicy};
    /// let config = AllocationConfig::from_json(r#"{"collision_policy":"merge_last_wins"}"#).unwrap();
    /// assert_eq!(config.collision_policy, CollisionPolicy::MergeLastWins);
    /// ```
    pub fn from_json(json: &str) -> crate::Result<Self> {
        serde_json::from_str(json).map_err(|e| AllocError::InvalidConfig(e.to_string()))
    }

    /// 是否拒絕負數量
    pub fn is_strict(&self) -> bool {
        self.quantity_policy == QuantityPolicy::Strict
    }
}

/// 鍵衝突策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionPolicy {
    /// 每一輸入行都是獨立供應（以行身份識別）
    DistinctLines,

    /// 以 (物料, 地點, 採購單號) 合併：保留首次出現的位置，數量取最後一行
    MergeLastWins,
}

/// 負數量策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuantityPolicy {
    /// 負 PO 數量視為無供應，負 SO 數量視為無需求，僅產生警告
    Lenient,

    /// 任何負數量都使整次分配失敗
    Strict,
}
