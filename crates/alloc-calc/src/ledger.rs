//! 供應帳本（分配期間的剩餘數量工作副本）

use alloc_core::{CollisionPolicy, FreeSupply, MatchKey, PurchaseOrderLine, SupplyKey};
use rust_decimal::Decimal;
use std::collections::HashMap;

/// 帳本條目
#[derive(Debug, Clone)]
pub struct LedgerEntry<'a> {
    /// 代表此條目的 PO 行（合併時為首次出現的行）
    pub line: &'a PurchaseOrderLine,

    /// 該行在 PO 輸入中的位置
    pub position: usize,

    /// 剩餘數量
    pub remaining: Decimal,
}

/// 一次消耗
#[derive(Debug, Clone, Copy)]
pub struct Draw<'a> {
    pub line: &'a PurchaseOrderLine,
    pub position: usize,
    pub quantity: Decimal,
}

/// 供應鍵衝突（相同物料、地點、採購單號的多行）
#[derive(Debug, Clone)]
pub struct KeyCollision {
    pub key: SupplyKey,
    /// 首次出現的 PO 行位置
    pub first_sequence: usize,
    /// 衝突的 PO 行位置
    pub sequence: usize,
    /// 衝突行是否覆蓋了先前的數量
    pub overwritten: bool,
}

/// (物料, 地點) 分桶，條目依 FIFO 順序排列
#[derive(Debug, Default)]
struct Bucket {
    entries: Vec<usize>,
    /// 第一個可能仍有剩餘的條目位置
    cursor: usize,
}

/// 供應帳本
///
/// 條目順序即 PO 輸入順序；另以 (物料, 地點) 建立索引，
/// 每個 SO 只掃描相符的條目，消耗順序與全表線性掃描相同。
#[derive(Debug)]
pub struct SupplyLedger<'a> {
    entries: Vec<LedgerEntry<'a>>,
    buckets: HashMap<MatchKey, Bucket>,
    collisions: Vec<KeyCollision>,
}

impl<'a> SupplyLedger<'a> {
    /// 依 PO 輸入順序建立帳本
    pub fn build(purchase_orders: &'a [PurchaseOrderLine], policy: CollisionPolicy) -> Self {
        let mut entries: Vec<LedgerEntry<'a>> = Vec::with_capacity(purchase_orders.len());
        let mut buckets: HashMap<MatchKey, Bucket> = HashMap::new();
        let mut by_supply_key: HashMap<SupplyKey, usize> = HashMap::new();
        let mut collisions = Vec::new();

        for (position, line) in purchase_orders.iter().enumerate() {
            let supply_key = line.supply_key();

            if let Some(&existing) = by_supply_key.get(&supply_key) {
                let overwritten = policy == CollisionPolicy::MergeLastWins;
                collisions.push(KeyCollision {
                    key: supply_key.clone(),
                    first_sequence: entries[existing].position,
                    sequence: position,
                    overwritten,
                });

                if overwritten {
                    // 保留原位置，數量以最後一行為準
                    entries[existing].remaining = line.quantity;
                    continue;
                }
            } else {
                by_supply_key.insert(supply_key, entries.len());
            }

            buckets
                .entry(line.match_key())
                .or_default()
                .entries
                .push(entries.len());
            entries.push(LedgerEntry {
                line,
                position,
                remaining: line.quantity,
            });
        }

        Self {
            entries,
            buckets,
            collisions,
        }
    }

    /// 為一筆需求依 FIFO 順序消耗供應
    ///
    /// 需求一旦滿足即停止；無相符供應時返回空列表。
    pub fn draw(&mut self, key: &MatchKey, need: Decimal) -> Vec<Draw<'a>> {
        let mut draws = Vec::new();
        let Some(bucket) = self.buckets.get_mut(key) else {
            return draws;
        };

        // 剩餘數量只減不增，已耗盡的前綴不需重複掃描
        while bucket.cursor < bucket.entries.len()
            && self.entries[bucket.entries[bucket.cursor]].remaining <= Decimal::ZERO
        {
            bucket.cursor += 1;
        }

        let mut remaining_need = need;
        for &idx in &bucket.entries[bucket.cursor..] {
            if remaining_need <= Decimal::ZERO {
                break;
            }

            let entry = &mut self.entries[idx];
            if entry.remaining <= Decimal::ZERO {
                continue;
            }

            let consumed = entry.remaining.min(remaining_need);
            entry.remaining -= consumed;
            remaining_need -= consumed;

            draws.push(Draw {
                line: entry.line,
                position: entry.position,
                quantity: consumed,
            });
        }

        draws
    }

    /// 剩餘數量大於零的條目，依帳本順序
    pub fn free_supply(&self) -> Vec<FreeSupply> {
        self.entries
            .iter()
            .filter(|e| e.remaining > Decimal::ZERO)
            .map(|e| FreeSupply::from_line(e.position, e.line, e.remaining))
            .collect()
    }

    pub fn entries(&self) -> &[LedgerEntry<'a>] {
        &self.entries
    }

    pub fn collisions(&self) -> &[KeyCollision] {
        &self.collisions
    }

    /// 不同 (物料, 地點) 組合數
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn po(seq: usize, item: &str, po_number: &str, qty: i64) -> PurchaseOrderLine {
        PurchaseOrderLine::new(
            seq,
            item.to_string(),
            "L1".to_string(),
            po_number.to_string(),
            Decimal::from(qty),
        )
    }

    #[test]
    fn test_draw_in_fifo_order() {
        let pos = vec![po(0, "X", "P1", 5), po(1, "Y", "P9", 7), po(2, "X", "P2", 3)];
        let mut ledger = SupplyLedger::build(&pos, CollisionPolicy::DistinctLines);

        assert_eq!(ledger.bucket_count(), 2);

        let draws = ledger.draw(&MatchKey::new("X", "L1"), Decimal::from(6));
        assert_eq!(draws.len(), 2);
        assert_eq!(draws[0].line.po_number, "P1");
        assert_eq!(draws[0].quantity, Decimal::from(5));
        assert_eq!(draws[1].line.po_number, "P2");
        assert_eq!(draws[1].quantity, Decimal::from(1));

        let free = ledger.free_supply();
        assert_eq!(free.len(), 2);
        assert_eq!(free[0].po_number, "P9");
        assert_eq!(free[1].po_number, "P2");
        assert_eq!(free[1].free_quantity, Decimal::from(2));
    }

    #[test]
    fn test_draw_stops_when_need_met() {
        let pos = vec![po(0, "X", "P1", 5), po(1, "X", "P2", 5)];
        let mut ledger = SupplyLedger::build(&pos, CollisionPolicy::DistinctLines);

        let draws = ledger.draw(&MatchKey::new("X", "L1"), Decimal::from(5));
        assert_eq!(draws.len(), 1);
        assert_eq!(ledger.entries()[1].remaining, Decimal::from(5));
    }

    #[test]
    fn test_draw_unknown_key() {
        let pos = vec![po(0, "X", "P1", 5)];
        let mut ledger = SupplyLedger::build(&pos, CollisionPolicy::DistinctLines);

        assert!(ledger.draw(&MatchKey::new("X", "L2"), Decimal::from(1)).is_empty());
        assert!(ledger.draw(&MatchKey::new("Y", "L1"), Decimal::from(1)).is_empty());
    }

    #[test]
    fn test_negative_supply_is_skipped() {
        let pos = vec![po(0, "X", "P1", -4), po(1, "X", "P2", 2)];
        let mut ledger = SupplyLedger::build(&pos, CollisionPolicy::DistinctLines);

        let draws = ledger.draw(&MatchKey::new("X", "L1"), Decimal::from(3));
        assert_eq!(draws.len(), 1);
        assert_eq!(draws[0].line.po_number, "P2");
        assert_eq!(ledger.entries()[0].remaining, Decimal::from(-4));
        // 負數條目不列為可售
        assert!(ledger.free_supply().is_empty());
    }

    #[test]
    fn test_non_positive_need_draws_nothing() {
        let pos = vec![po(0, "X", "P1", 5)];
        let mut ledger = SupplyLedger::build(&pos, CollisionPolicy::DistinctLines);

        assert!(ledger.draw(&MatchKey::new("X", "L1"), Decimal::ZERO).is_empty());
        assert!(ledger.draw(&MatchKey::new("X", "L1"), Decimal::from(-2)).is_empty());
        assert_eq!(ledger.entries()[0].remaining, Decimal::from(5));
    }

    #[test]
    fn test_distinct_lines_keep_duplicates() {
        let pos = vec![po(0, "X", "P1", 5), po(1, "X", "P1", 3)];
        let ledger = SupplyLedger::build(&pos, CollisionPolicy::DistinctLines);

        assert_eq!(ledger.entries().len(), 2);
        assert_eq!(ledger.collisions().len(), 1);
        assert!(!ledger.collisions()[0].overwritten);

        let free = ledger.free_supply();
        assert_eq!(free[0].free_quantity, Decimal::from(5));
        assert_eq!(free[1].free_quantity, Decimal::from(3));
    }

    #[test]
    fn test_merge_last_wins_keeps_first_position() {
        let pos = vec![
            po(0, "X", "P1", 5),
            po(1, "X", "P2", 4),
            po(2, "X", "P1", 3),
        ];
        let ledger = SupplyLedger::build(&pos, CollisionPolicy::MergeLastWins);

        assert_eq!(ledger.entries().len(), 2);
        let collision = &ledger.collisions()[0];
        assert_eq!(collision.first_sequence, 0);
        assert_eq!(collision.sequence, 2);
        assert!(collision.overwritten);

        let free = ledger.free_supply();
        assert_eq!(free.len(), 2);
        assert_eq!(free[0].po_number, "P1");
        assert_eq!(free[0].po_sequence, 0);
        assert_eq!(free[0].free_quantity, Decimal::from(3));
        assert_eq!(free[1].po_number, "P2");
    }

    #[test]
    fn test_positions_ignore_record_sequence() {
        let pos = vec![po(9, "X", "P1", 5), po(9, "X", "P2", 3)];
        let mut ledger = SupplyLedger::build(&pos, CollisionPolicy::DistinctLines);

        let draws = ledger.draw(&MatchKey::new("X", "L1"), Decimal::from(6));
        let positions: Vec<_> = draws.iter().map(|d| d.position).collect();
        assert_eq!(positions, vec![0, 1]);
        assert_eq!(ledger.free_supply()[0].po_sequence, 1);
    }
}
