//! 簡單 FIFO 分配示例

use alloc_calc::Allocator;
use alloc_core::{AllocationConfig, PurchaseOrderLine, SalesOrderLine};
use rust_decimal::Decimal;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== 簡單 FIFO 分配示例 ===\n");

    // 兩張 PO 供應同一物料/地點，先進先出
    let purchase_orders = vec![
        PurchaseOrderLine::new(
            0,
            "BIKE-001".to_string(),
            "TPE".to_string(),
            "PO-1001".to_string(),
            Decimal::from(5),
        ),
        PurchaseOrderLine::new(
            1,
            "BIKE-001".to_string(),
            "TPE".to_string(),
            "PO-1002".to_string(),
            Decimal::from(3),
        ),
    ];

    let sales_orders = vec![SalesOrderLine::new(
        0,
        "BIKE-001".to_string(),
        "TPE".to_string(),
        "SO-2001".to_string(),
        Decimal::from(6),
    )];

    let allocator = Allocator::new(AllocationConfig::default());
    let result = allocator.allocate(&purchase_orders, &sales_orders)?;

    println!("分配記錄:");
    for a in &result.assignments {
        println!(
            "  - {} @ {}: {} ← {} 數量 {}",
            a.item_code, a.location, a.so_number, a.po_number, a.quantity_assigned
        );
    }

    println!("\n可售供應:");
    for f in &result.free_supply {
        println!(
            "  - {} @ {}: {} 剩餘 {}",
            f.item_code, f.location, f.po_number, f.free_quantity
        );
    }

    Ok(())
}
