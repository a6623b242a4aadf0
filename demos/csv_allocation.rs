//! 從 CSV 載入並輸出工作簿
//!
//! 用法: cargo run --example csv_allocation [po.csv] [so.csv]

use alloc_calc::Allocator;
use alloc_core::AllocationConfig;
use alloc_io::Workbook;
use std::path::PathBuf;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let po_path = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("demos/data/purchase_orders.csv"));
    let so_path = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("demos/data/sales_orders.csv"));

    let purchase_orders = alloc_io::load_purchase_orders_from_path(&po_path)?;
    let sales_orders = alloc_io::load_sales_orders_from_path(&so_path)?;

    let config = AllocationConfig::new().with_export_shortfall(true);
    let result = Allocator::new(config.clone()).allocate(&purchase_orders, &sales_orders)?;

    let workbook = Workbook::from_result(&result, &config);
    for sheet in &workbook.sheets {
        println!("=== {} ===", sheet.name);
        println!("{}", sheet.columns.join(","));
        for row in &sheet.rows {
            println!("{}", row.join(","));
        }
        println!();
    }

    Ok(())
}
