//! 批次分配（多組獨立輸入並行計算）

use alloc_core::{PurchaseOrderLine, SalesOrderLine};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{AllocationResult, Allocator};

/// 一組獨立的分配輸入
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AllocationRequest {
    pub purchase_orders: Vec<PurchaseOrderLine>,
    pub sales_orders: Vec<SalesOrderLine>,
}

impl AllocationRequest {
    pub fn new(purchase_orders: Vec<PurchaseOrderLine>, sales_orders: Vec<SalesOrderLine>) -> Self {
        Self {
            purchase_orders,
            sales_orders,
        }
    }
}

impl Allocator {
    /// 並行執行多組分配
    ///
    /// 各組互不共享帳本；結果順序與請求順序相同，單組失敗不影響其他組。
    pub fn allocate_batch(
        &self,
        requests: &[AllocationRequest],
    ) -> Vec<alloc_core::Result<AllocationResult>> {
        tracing::info!("批次分配：{} 組", requests.len());

        requests
            .par_iter()
            .map(|request| self.allocate(&request.purchase_orders, &request.sales_orders))
            .collect()
    }
}
