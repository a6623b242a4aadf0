//! FIFO 採購單/銷售訂單分配工具

mod cli;
mod logging;

use alloc_calc::Allocator;
use alloc_core::AllocationConfig;
use alloc_io::export::ASSIGNED_SHEET;
use alloc_io::{RunSummary, Workbook};
use anyhow::Context;
use std::fs::File;
use std::io::BufWriter;

use cli::{Command, RunArgs};

/// 預覽列數
const PREVIEW_ROWS: usize = 10;

fn main() -> anyhow::Result<()> {
    logging::init();

    match Command::parse(std::env::args().skip(1))? {
        Command::Help => {
            print!("{}", cli::USAGE);
            Ok(())
        }
        Command::Run(args) => run(args),
    }
}

fn run(args: RunArgs) -> anyhow::Result<()> {
    let config = match &args.config_path {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("無法讀取配置 {}", path.display()))?;
            AllocationConfig::from_json(&json)?
        }
        None => AllocationConfig::default(),
    };
    tracing::debug!("分配配置: {:?}", config);

    let purchase_orders = alloc_io::load_purchase_orders_from_path(&args.po_path)
        .context("載入採購單失敗")?;
    let sales_orders =
        alloc_io::load_sales_orders_from_path(&args.so_path).context("載入銷售訂單失敗")?;

    let allocator = Allocator::new(config.clone());
    let result = allocator.allocate(&purchase_orders, &sales_orders)?;

    if tracing::enabled!(tracing::Level::DEBUG) {
        alloc_calc::verify(
            &result,
            &purchase_orders,
            &sales_orders,
            config.collision_policy,
        )?;
        tracing::debug!("不變量檢查通過");
    }

    let workbook = Workbook::from_result(&result, &config);

    println!("✅ 分配完成");
    println!(
        "分配 {} 筆，可售 {} 筆，缺口 {} 筆",
        result.assignments.len(),
        result.free_supply.len(),
        result.shortfalls.len()
    );
    if let Some(assigned) = workbook.sheet(ASSIGNED_SHEET) {
        println!("\n{}", assigned.columns.join(" | "));
        for row in assigned.head(PREVIEW_ROWS) {
            println!("{}", row.join(" | "));
        }
    }

    let written = workbook
        .write_dir(&args.out_dir)
        .with_context(|| format!("無法寫出工作簿到 {}", args.out_dir.display()))?;

    if args.json {
        let path = args.out_dir.join("workbook.json");
        workbook.write_json(BufWriter::new(File::create(&path)?))?;
        tracing::info!("工作簿 JSON 已寫出: {}", path.display());
    }

    let summary = RunSummary::new(&result, purchase_orders.len(), sales_orders.len())?;
    let summary_path = args.out_dir.join("summary.json");
    summary.write_json(BufWriter::new(File::create(&summary_path)?))?;

    println!("\n📥 已輸出 {} 張工作表到 {}", written.len(), args.out_dir.display());
    Ok(())
}
