//! FIFO 分配器

use alloc_core::{
    AllocError, AllocationConfig, Assignment, LineKind, PurchaseOrderLine, QuantityPolicy,
    SalesOrderLine, Shortfall,
};
use rust_decimal::Decimal;

use crate::ledger::SupplyLedger;
use crate::{AllocationResult, AllocationWarning};

/// FIFO 分配器
///
/// 不保存任何跨次狀態，每次呼叫都使用獨立的供應帳本。
#[derive(Debug, Clone, Default)]
pub struct Allocator {
    config: AllocationConfig,
}

impl Allocator {
    /// 創建新的分配器
    pub fn new(config: AllocationConfig) -> Self {
        Self { config }
    }

    /// 主分配入口
    ///
    /// 依 SO 輸入順序逐筆處理，每筆需求依 PO 輸入順序（FIFO）消耗
    /// 相同 (物料, 地點) 的供應。輸入記錄不會被修改。
    pub fn allocate(
        &self,
        purchase_orders: &[PurchaseOrderLine],
        sales_orders: &[SalesOrderLine],
    ) -> alloc_core::Result<AllocationResult> {
        tracing::info!(
            "開始分配：PO {} 行，SO {} 行",
            purchase_orders.len(),
            sales_orders.len()
        );

        let start_time = std::time::Instant::now();
        let mut result = AllocationResult::empty();

        // Step 1: 數量檢查
        tracing::debug!("Step 1: 數量檢查");
        self.check_quantities(purchase_orders, sales_orders, &mut result)?;

        // Step 2: 建立供應帳本
        tracing::debug!("Step 2: 建立供應帳本");
        let mut ledger = SupplyLedger::build(purchase_orders, self.config.collision_policy);
        for collision in ledger.collisions() {
            let message = if collision.overwritten {
                format!(
                    "PO 第 {} 行與第 {} 行鍵相同，數量已被覆蓋",
                    collision.sequence, collision.first_sequence
                )
            } else {
                format!(
                    "PO 第 {} 行與第 {} 行鍵相同，視為獨立供應",
                    collision.sequence, collision.first_sequence
                )
            };
            tracing::warn!("{}: {}", collision.key, message);
            result.add_warning(AllocationWarning::warning(
                collision.key.to_string(),
                message,
            ));
        }
        tracing::debug!(
            "帳本條目: {}，分桶: {}",
            ledger.entries().len(),
            ledger.bucket_count()
        );

        // Step 3: 逐筆 SO 分配
        tracing::debug!("Step 3: 逐筆 SO 分配");
        for (so_sequence, so) in sales_orders.iter().enumerate() {
            let draws = ledger.draw(&so.match_key(), so.quantity);

            let mut assigned = Decimal::ZERO;
            for draw in draws {
                assigned += draw.quantity;
                result
                    .assignments
                    .push(Assignment::between(
                        so_sequence,
                        so,
                        draw.position,
                        draw.line,
                        draw.quantity,
                    ));
            }

            if let Some(shortfall) = Shortfall::evaluate(so_sequence, so, assigned) {
                tracing::debug!(
                    "SO {} ({}) 未完全滿足: 需求 {}, 已分配 {}",
                    so.so_number,
                    so.match_key(),
                    shortfall.requested,
                    shortfall.assigned
                );
                result.shortfalls.push(shortfall);
            }
        }

        // Step 4: 剩餘可售供應
        tracing::debug!("Step 4: 剩餘可售供應");
        result.free_supply = ledger.free_supply();

        result.calculation_time_ms = Some(start_time.elapsed().as_millis());

        tracing::info!("分配完成，耗時 {:?}", start_time.elapsed());
        tracing::info!(
            "分配記錄 {} 筆，可售 {} 筆，缺口 {} 筆",
            result.assignments.len(),
            result.free_supply.len(),
            result.shortfalls.len()
        );

        Ok(result)
    }

    /// 檢查負數量；嚴格模式下直接失敗，寬鬆模式下記錄警告
    fn check_quantities(
        &self,
        purchase_orders: &[PurchaseOrderLine],
        sales_orders: &[SalesOrderLine],
        result: &mut AllocationResult,
    ) -> alloc_core::Result<()> {
        let negatives = purchase_orders
            .iter()
            .enumerate()
            .filter(|(_, po)| po.quantity < Decimal::ZERO)
            .map(|(position, po)| {
                (
                    LineKind::PurchaseOrder,
                    position,
                    &po.po_number,
                    po.quantity,
                )
            })
            .chain(
                sales_orders
                    .iter()
                    .enumerate()
                    .filter(|(_, so)| so.quantity < Decimal::ZERO)
                    .map(|(position, so)| {
                        (
                            LineKind::SalesOrder,
                            position,
                            &so.so_number,
                            so.quantity,
                        )
                    }),
            );

        for (kind, sequence_index, reference, quantity) in negatives {
            if self.config.quantity_policy == QuantityPolicy::Strict {
                return Err(AllocError::NegativeQuantity {
                    kind,
                    sequence_index,
                    reference: reference.clone(),
                    quantity,
                });
            }

            tracing::warn!(
                "{} 第 {} 行 ({}) 數量為負: {}，視為零",
                kind,
                sequence_index,
                reference,
                quantity
            );
            result.add_warning(AllocationWarning::warning(
                reference.clone(),
                format!("{} 第 {} 行數量為負 ({})，視為零", kind, sequence_index, quantity),
            ));
        }

        Ok(())
    }

    /// 獲取配置引用
    pub fn config(&self) -> &AllocationConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc_core::{CollisionPolicy, FreeSupply};
    use rstest::rstest;

    fn po(seq: usize, item: &str, loc: &str, po_number: &str, qty: i64) -> PurchaseOrderLine {
        PurchaseOrderLine::new(
            seq,
            item.to_string(),
            loc.to_string(),
            po_number.to_string(),
            Decimal::from(qty),
        )
    }

    fn so(seq: usize, item: &str, loc: &str, so_number: &str, qty: i64) -> SalesOrderLine {
        SalesOrderLine::new(
            seq,
            item.to_string(),
            loc.to_string(),
            so_number.to_string(),
            Decimal::from(qty),
        )
    }

    /// (物料, 地點, SO, PO, 數量)
    fn assigned(result: &AllocationResult) -> Vec<(&str, &str, &str, &str, Decimal)> {
        result
            .assignments
            .iter()
            .map(|a| {
                (
                    a.item_code.as_str(),
                    a.location.as_str(),
                    a.so_number.as_str(),
                    a.po_number.as_str(),
                    a.quantity_assigned,
                )
            })
            .collect()
    }

    /// (物料, 地點, PO, 數量)
    fn free(result: &AllocationResult) -> Vec<(&str, &str, &str, Decimal)> {
        result
            .free_supply
            .iter()
            .map(|f: &FreeSupply| {
                (
                    f.item_code.as_str(),
                    f.location.as_str(),
                    f.po_number.as_str(),
                    f.free_quantity,
                )
            })
            .collect()
    }

    fn d(value: i64) -> Decimal {
        Decimal::from(value)
    }

    #[test]
    fn test_split_demand_across_pos() {
        let pos = vec![po(0, "X", "L1", "P1", 5), po(1, "X", "L1", "P2", 3)];
        let sos = vec![so(0, "X", "L1", "S1", 6)];

        let result = Allocator::default().allocate(&pos, &sos).unwrap();

        assert_eq!(
            assigned(&result),
            vec![("X", "L1", "S1", "P1", d(5)), ("X", "L1", "S1", "P2", d(1))]
        );
        assert_eq!(free(&result), vec![("X", "L1", "P2", d(2))]);
        assert!(result.is_fully_allocated());
    }

    #[test]
    fn test_one_po_supplies_several_sos() {
        let pos = vec![po(0, "X", "L1", "P1", 5)];
        let sos = vec![so(0, "X", "L1", "S1", 2), so(1, "X", "L1", "S2", 2)];

        let result = Allocator::default().allocate(&pos, &sos).unwrap();

        assert_eq!(
            assigned(&result),
            vec![("X", "L1", "S1", "P1", d(2)), ("X", "L1", "S2", "P1", d(2))]
        );
        assert_eq!(free(&result), vec![("X", "L1", "P1", d(1))]);
    }

    #[rstest]
    #[case::item_mismatch("Y", "L1")]
    #[case::location_mismatch("X", "L2")]
    fn test_no_cross_key_matching(#[case] item: &str, #[case] loc: &str) {
        let pos = vec![po(0, "X", "L1", "P1", 5)];
        let sos = vec![so(0, item, loc, "S1", 2)];

        let result = Allocator::default().allocate(&pos, &sos).unwrap();

        assert!(result.assignments.is_empty());
        assert_eq!(free(&result), vec![("X", "L1", "P1", d(5))]);
        assert_eq!(result.shortfalls.len(), 1);
        assert!(result.shortfalls[0].is_total());
    }

    #[test]
    fn test_insufficient_supply_is_silent_shortfall() {
        let pos = vec![po(0, "X", "L1", "P1", 5)];
        let sos = vec![so(0, "X", "L1", "S1", 10)];

        let result = Allocator::default().allocate(&pos, &sos).unwrap();

        assert_eq!(assigned(&result), vec![("X", "L1", "S1", "P1", d(5))]);
        assert!(result.free_supply.is_empty());
        assert_eq!(result.shortfalls.len(), 1);
        assert_eq!(result.shortfalls[0].unfulfilled, d(5));
        assert_eq!(result.total_unfulfilled().unwrap(), d(5));
    }

    #[test]
    fn test_inputs_are_not_mutated() {
        let pos = vec![po(0, "X", "L1", "P1", 5)];
        let sos = vec![so(0, "X", "L1", "S1", 4)];
        let pos_before = pos.clone();
        let sos_before = sos.clone();

        Allocator::default().allocate(&pos, &sos).unwrap();

        assert_eq!(pos, pos_before);
        assert_eq!(sos, sos_before);
    }

    #[test]
    fn test_decimal_quantities() {
        let pos = vec![PurchaseOrderLine::new(
            0,
            "X".to_string(),
            "L1".to_string(),
            "P1".to_string(),
            Decimal::new(125, 1), // 12.5
        )];
        let sos = vec![SalesOrderLine::new(
            0,
            "X".to_string(),
            "L1".to_string(),
            "S1".to_string(),
            Decimal::new(1025, 2), // 10.25
        )];

        let result = Allocator::default().allocate(&pos, &sos).unwrap();

        assert_eq!(result.assignments[0].quantity_assigned, Decimal::new(1025, 2));
        assert_eq!(result.free_supply[0].free_quantity, Decimal::new(225, 2));
    }

    #[test]
    fn test_duplicate_key_distinct_lines() {
        let pos = vec![po(0, "X", "L1", "P1", 5), po(1, "X", "L1", "P1", 3)];
        let sos = vec![so(0, "X", "L1", "S1", 6)];

        let result = Allocator::default().allocate(&pos, &sos).unwrap();

        assert_eq!(
            assigned(&result),
            vec![("X", "L1", "S1", "P1", d(5)), ("X", "L1", "S1", "P1", d(1))]
        );
        assert_eq!(result.assignments[1].po_sequence, 1);
        assert_eq!(free(&result), vec![("X", "L1", "P1", d(2))]);
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_duplicate_key_merge_last_wins() {
        let pos = vec![po(0, "X", "L1", "P1", 5), po(1, "X", "L1", "P1", 3)];
        let sos = vec![so(0, "X", "L1", "S1", 6)];
        let config = AllocationConfig::new().with_collision_policy(CollisionPolicy::MergeLastWins);

        let result = Allocator::new(config).allocate(&pos, &sos).unwrap();

        // 第二行覆蓋第一行的數量，只剩 3 可用
        assert_eq!(assigned(&result), vec![("X", "L1", "S1", "P1", d(3))]);
        assert!(result.free_supply.is_empty());
        assert_eq!(result.shortfalls[0].unfulfilled, d(3));
    }

    #[test]
    fn test_negative_quantities_lenient() {
        let pos = vec![po(0, "X", "L1", "P1", -5), po(1, "X", "L1", "P2", 4)];
        let sos = vec![so(0, "X", "L1", "S1", -2), so(1, "X", "L1", "S2", 3)];

        let result = Allocator::default().allocate(&pos, &sos).unwrap();

        assert_eq!(assigned(&result), vec![("X", "L1", "S2", "P2", d(3))]);
        assert_eq!(free(&result), vec![("X", "L1", "P2", d(1))]);
        assert!(result.shortfalls.is_empty());
        assert_eq!(result.warnings.len(), 2);
    }

    #[test]
    fn test_negative_quantities_strict() {
        let pos = vec![po(0, "X", "L1", "P1", 5)];
        let sos = vec![so(0, "X", "L1", "S1", 1), so(1, "X", "L1", "S2", -3)];
        let config = AllocationConfig::new().with_quantity_policy(QuantityPolicy::Strict);

        let err = Allocator::new(config).allocate(&pos, &sos).unwrap_err();

        match err {
            AllocError::NegativeQuantity {
                kind,
                sequence_index,
                reference,
                ..
            } => {
                assert_eq!(kind, LineKind::SalesOrder);
                assert_eq!(sequence_index, 1);
                assert_eq!(reference, "S2");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_sequences_follow_input_position() {
        // 呼叫端的 sequence_index 重複或不連續
        let pos = vec![po(0, "X", "L1", "P1", 5), po(0, "X", "L1", "P2", 3)];
        let sos = vec![so(4, "X", "L1", "S1", 6), so(4, "X", "L1", "S2", 4)];

        let result = Allocator::default().allocate(&pos, &sos).unwrap();

        let sequences: Vec<_> = result
            .assignments
            .iter()
            .map(|a| (a.so_sequence, a.po_sequence))
            .collect();
        assert_eq!(sequences, vec![(0, 0), (0, 1), (1, 1)]);
        assert_eq!(result.shortfalls[0].so_sequence, 1);
    }

    #[test]
    fn test_empty_inputs() {
        let result = Allocator::default().allocate(&[], &[]).unwrap();

        assert!(result.assignments.is_empty());
        assert!(result.free_supply.is_empty());
        assert!(result.shortfalls.is_empty());
    }

    #[test]
    fn test_fifo_across_interleaved_keys() {
        let pos = vec![
            po(0, "X", "L1", "P1", 2),
            po(1, "Y", "L1", "P2", 10),
            po(2, "X", "L1", "P3", 2),
            po(3, "X", "L2", "P4", 9),
            po(4, "X", "L1", "P5", 2),
        ];
        let sos = vec![so(0, "X", "L1", "S1", 3), so(1, "X", "L1", "S2", 2)];

        let result = Allocator::default().allocate(&pos, &sos).unwrap();

        assert_eq!(
            assigned(&result),
            vec![
                ("X", "L1", "S1", "P1", d(2)),
                ("X", "L1", "S1", "P3", d(1)),
                ("X", "L1", "S2", "P3", d(1)),
                ("X", "L1", "S2", "P5", d(1)),
            ]
        );
        assert_eq!(
            free(&result),
            vec![
                ("Y", "L1", "P2", d(10)),
                ("X", "L2", "P4", d(9)),
                ("X", "L1", "P5", d(1)),
            ]
        );
    }
}
