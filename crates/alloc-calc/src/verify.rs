//! 分配結果不變量檢查

use alloc_core::{
    AllocError, CollisionPolicy, MatchKey, PurchaseOrderLine, SalesOrderLine, SupplyKey,
};
use rust_decimal::Decimal;
use std::collections::HashMap;

use crate::{checked_total, AllocationResult};

/// 每個供應條目的初始數量（帳本順序）
struct Seed {
    /// PO 輸入位置
    po_sequence: usize,
    key: MatchKey,
    quantity: Decimal,
    consumed: Decimal,
}

/// 檢查分配結果是否滿足以下不變量：
///
/// 結果中的 `so_sequence`/`po_sequence` 視為輸入切片中的位置。
///
/// - 分配與可售數量皆大於零，且物料/地點與來源行相符
/// - 每個 SO 行的分配總量不超過需求
/// - 每個 PO 條目：初始數量 = 分配總量 + 可售數量（負數條目不得被分配）
/// - FIFO：同一 (物料, 地點) 中，較早的條目耗盡之前，較晚的條目不得被消耗
pub fn verify(
    result: &AllocationResult,
    purchase_orders: &[PurchaseOrderLine],
    sales_orders: &[SalesOrderLine],
    policy: CollisionPolicy,
) -> alloc_core::Result<()> {
    let mut seeds = seed_entries(purchase_orders, policy);
    let seed_index: HashMap<usize, usize> = seeds
        .iter()
        .enumerate()
        .map(|(idx, seed)| (seed.po_sequence, idx))
        .collect();

    let mut assigned_per_so: HashMap<usize, Decimal> = HashMap::new();

    for assignment in &result.assignments {
        if assignment.quantity_assigned <= Decimal::ZERO {
            return violation(format!(
                "SO {} ← PO {} 分配數量非正: {}",
                assignment.so_number, assignment.po_number, assignment.quantity_assigned
            ));
        }

        let so = sales_orders.get(assignment.so_sequence).ok_or_else(|| {
            AllocError::InvariantViolation(format!(
                "分配引用了不存在的 SO 行 {}",
                assignment.so_sequence
            ))
        })?;
        let &seed_idx = seed_index.get(&assignment.po_sequence).ok_or_else(|| {
            AllocError::InvariantViolation(format!(
                "分配引用了不存在的 PO 條目 {}",
                assignment.po_sequence
            ))
        })?;

        if !seeds[seed_idx].key.matches(&so.item_code, &so.location)
            || !seeds[seed_idx]
                .key
                .matches(&assignment.item_code, &assignment.location)
        {
            return violation(format!(
                "SO {} 與 PO {} 的物料/地點不相符",
                assignment.so_number, assignment.po_number
            ));
        }

        // 同鍵中較早的條目必須已耗盡
        if let Some(earlier) = seeds[..seed_idx].iter().find(|s| {
            s.key == seeds[seed_idx].key
                && s.quantity > Decimal::ZERO
                && s.consumed < s.quantity
        }) {
            return violation(format!(
                "PO 條目 {} 在較早的條目 {} 耗盡前被消耗",
                assignment.po_sequence, earlier.po_sequence
            ));
        }

        seeds[seed_idx].consumed = checked_total(
            "PO 條目分配數量",
            [seeds[seed_idx].consumed, assignment.quantity_assigned],
        )?;

        let per_so = assigned_per_so
            .entry(assignment.so_sequence)
            .or_insert(Decimal::ZERO);
        *per_so = checked_total("SO 分配數量", [*per_so, assignment.quantity_assigned])?;
    }

    for (position, so) in sales_orders.iter().enumerate() {
        let assigned = assigned_per_so
            .get(&position)
            .copied()
            .unwrap_or(Decimal::ZERO);
        if assigned > so.quantity.max(Decimal::ZERO) {
            return violation(format!(
                "SO {} 分配總量 {} 超過需求 {}",
                so.so_number, assigned, so.quantity
            ));
        }
    }

    let mut free_per_seed: HashMap<usize, Decimal> = HashMap::new();
    for free in &result.free_supply {
        if free.free_quantity <= Decimal::ZERO {
            return violation(format!(
                "PO {} 可售數量非正: {}",
                free.po_number, free.free_quantity
            ));
        }
        if free_per_seed.insert(free.po_sequence, free.free_quantity).is_some() {
            return violation(format!("PO 條目 {} 重複列為可售", free.po_sequence));
        }
    }

    for seed in &seeds {
        let free = free_per_seed
            .get(&seed.po_sequence)
            .copied()
            .unwrap_or(Decimal::ZERO);
        let expected = seed.quantity.max(Decimal::ZERO);

        if seed.consumed.checked_add(free) != Some(expected) {
            return violation(format!(
                "PO 條目 {} 數量不守恆: 初始 {}, 分配 {}, 可售 {}",
                seed.po_sequence, seed.quantity, seed.consumed, free
            ));
        }
    }

    Ok(())
}

/// 依衝突策略計算各供應條目的初始數量
fn seed_entries(purchase_orders: &[PurchaseOrderLine], policy: CollisionPolicy) -> Vec<Seed> {
    let mut seeds: Vec<Seed> = Vec::with_capacity(purchase_orders.len());
    let mut merged: HashMap<SupplyKey, usize> = HashMap::new();

    for (position, po) in purchase_orders.iter().enumerate() {
        if policy == CollisionPolicy::MergeLastWins {
            if let Some(&idx) = merged.get(&po.supply_key()) {
                seeds[idx].quantity = po.quantity;
                continue;
            }
            merged.insert(po.supply_key(), seeds.len());
        }

        seeds.push(Seed {
            po_sequence: position,
            key: po.match_key(),
            quantity: po.quantity,
            consumed: Decimal::ZERO,
        });
    }

    seeds
}

fn violation(message: String) -> alloc_core::Result<()> {
    Err(AllocError::InvariantViolation(message))
}
