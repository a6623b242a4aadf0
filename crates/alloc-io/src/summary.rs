//! 執行摘要

use alloc_calc::AllocationResult;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::io::Write;
use uuid::Uuid;

use crate::Result;

/// 一次分配執行的摘要
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    /// 執行ID
    pub run_id: Uuid,

    /// 產生時間
    pub generated_at: DateTime<Utc>,

    pub purchase_order_lines: usize,
    pub sales_order_lines: usize,

    pub assignment_count: usize,
    pub free_supply_count: usize,
    pub shortfall_count: usize,
    pub warning_count: usize,

    pub total_assigned: Decimal,
    pub total_free: Decimal,
    pub total_unfulfilled: Decimal,

    /// 計算耗時（毫秒）
    pub calculation_time_ms: Option<u128>,
}

impl RunSummary {
    /// 由分配結果建立摘要
    ///
    /// 數量加總超出 `Decimal` 範圍時返回錯誤。
    pub fn new(
        result: &AllocationResult,
        purchase_order_lines: usize,
        sales_order_lines: usize,
    ) -> Result<Self> {
        Ok(Self {
            run_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            purchase_order_lines,
            sales_order_lines,
            assignment_count: result.assignments.len(),
            free_supply_count: result.free_supply.len(),
            shortfall_count: result.shortfalls.len(),
            warning_count: result.warnings.len(),
            total_assigned: result.total_assigned()?,
            total_free: result.total_free()?,
            total_unfulfilled: result.total_unfulfilled()?,
            calculation_time_ms: result.calculation_time_ms,
        })
    }

    pub fn write_json<W: Write>(&self, writer: W) -> Result<()> {
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }
}
