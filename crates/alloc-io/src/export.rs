//! 工作簿匯出
//!
//! 工作表：`Assigned`、`Free To Sell`，以及可選的 `Shortfall`。

use alloc_calc::AllocationResult;
use alloc_core::AllocationConfig;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::Result;

pub const ASSIGNED_SHEET: &str = "Assigned";
pub const FREE_TO_SELL_SHEET: &str = "Free To Sell";
pub const SHORTFALL_SHEET: &str = "Shortfall";

pub const ASSIGNED_COLUMNS: [&str; 5] = [
    "Item Code",
    "Location",
    "SO Number",
    "PO Number",
    "Quantity Assigned",
];
pub const FREE_TO_SELL_COLUMNS: [&str; 4] = ["Item Code", "Location", "PO Number", "Free Quantity"];
pub const SHORTFALL_COLUMNS: [&str; 6] = [
    "Item Code",
    "Location",
    "SO Number",
    "Requested",
    "Assigned",
    "Unfulfilled",
];

/// 工作表
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sheet {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Sheet {
    pub fn new(name: &str, columns: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    /// 以 CSV 寫出（空表仍寫出標題列）
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(&self.columns)?;
        for row in &self.rows {
            csv_writer.write_record(row)?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    /// 前 n 列預覽
    pub fn head(&self, n: usize) -> &[Vec<String>] {
        &self.rows[..self.rows.len().min(n)]
    }
}

/// 工作簿
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    /// 由分配結果建立工作簿
    pub fn from_result(result: &AllocationResult, config: &AllocationConfig) -> Self {
        let mut assigned = Sheet::new(ASSIGNED_SHEET, &ASSIGNED_COLUMNS);
        for a in &result.assignments {
            assigned.push_row(vec![
                a.item_code.clone(),
                a.location.clone(),
                a.so_number.clone(),
                a.po_number.clone(),
                format_quantity(a.quantity_assigned),
            ]);
        }

        let mut free = Sheet::new(FREE_TO_SELL_SHEET, &FREE_TO_SELL_COLUMNS);
        for f in &result.free_supply {
            free.push_row(vec![
                f.item_code.clone(),
                f.location.clone(),
                f.po_number.clone(),
                format_quantity(f.free_quantity),
            ]);
        }

        let mut sheets = vec![assigned, free];

        if config.export_shortfall {
            let mut shortfall = Sheet::new(SHORTFALL_SHEET, &SHORTFALL_COLUMNS);
            for s in &result.shortfalls {
                shortfall.push_row(vec![
                    s.item_code.clone(),
                    s.location.clone(),
                    s.so_number.clone(),
                    format_quantity(s.requested),
                    format_quantity(s.assigned),
                    format_quantity(s.unfulfilled),
                ]);
            }
            sheets.push(shortfall);
        }

        Self { sheets }
    }

    /// 依名稱取得工作表
    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    /// 每張工作表寫成 `<名稱>.csv`，返回寫出的檔案路徑
    pub fn write_dir(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        std::fs::create_dir_all(dir)?;

        let mut written = Vec::with_capacity(self.sheets.len());
        for sheet in &self.sheets {
            let path = dir.join(format!("{}.csv", sheet.name));
            let file = std::fs::File::create(&path)?;
            sheet.write_csv(std::io::BufWriter::new(file))?;
            tracing::info!(
                "工作表 {} 已寫出 {} 列: {}",
                sheet.name,
                sheet.rows.len(),
                path.display()
            );
            written.push(path);
        }

        Ok(written)
    }

    /// 整本工作簿寫成單一 JSON 文件
    pub fn write_json<W: Write>(&self, writer: W) -> Result<()> {
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }
}

/// 數量輸出格式（去除多餘的小數零）
pub fn format_quantity(quantity: Decimal) -> String {
    quantity.normalize().to_string()
}
