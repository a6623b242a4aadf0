//! CSV 記錄載入
//!
//! 依資料列順序指定 `sequence_index`（從 0 開始）。任何一列不合格即整批失敗。

use alloc_core::{PurchaseOrderLine, SalesOrderLine};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use crate::{IoError, Result};

/// 欄位名稱對應
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    pub item_code: String,
    pub location: String,
    /// 單號欄位（`PO Number` 或 `SO Number`）
    pub order_number: String,
    pub quantity: String,
}

impl ColumnMapping {
    /// 採購單預設欄位
    pub fn purchase_orders() -> Self {
        Self {
            item_code: "Item Code".to_string(),
            location: "Location".to_string(),
            order_number: "PO Number".to_string(),
            quantity: "Quantity".to_string(),
        }
    }

    /// 銷售訂單預設欄位
    pub fn sales_orders() -> Self {
        Self {
            order_number: "SO Number".to_string(),
            ..Self::purchase_orders()
        }
    }
}

/// 一列已解析的資料
struct ParsedRow {
    item_code: String,
    location: String,
    order_number: String,
    quantity: Decimal,
}

/// 從任意來源載入採購單
pub fn load_purchase_orders<R: Read>(
    reader: R,
    mapping: &ColumnMapping,
    file: &str,
) -> Result<Vec<PurchaseOrderLine>> {
    let rows = parse_rows(reader, mapping, file)?;
    tracing::info!("{}: 載入採購單 {} 行", file, rows.len());

    Ok(rows
        .into_iter()
        .enumerate()
        .map(|(seq, row)| {
            PurchaseOrderLine::new(seq, row.item_code, row.location, row.order_number, row.quantity)
        })
        .collect())
}

/// 從任意來源載入銷售訂單
pub fn load_sales_orders<R: Read>(
    reader: R,
    mapping: &ColumnMapping,
    file: &str,
) -> Result<Vec<SalesOrderLine>> {
    let rows = parse_rows(reader, mapping, file)?;
    tracing::info!("{}: 載入銷售訂單 {} 行", file, rows.len());

    Ok(rows
        .into_iter()
        .enumerate()
        .map(|(seq, row)| {
            SalesOrderLine::new(seq, row.item_code, row.location, row.order_number, row.quantity)
        })
        .collect())
}

/// 從檔案載入採購單（預設欄位）
pub fn load_purchase_orders_from_path(path: &Path) -> Result<Vec<PurchaseOrderLine>> {
    let file = open(path)?;
    load_purchase_orders(file, &ColumnMapping::purchase_orders(), &path.display().to_string())
}

/// 從檔案載入銷售訂單（預設欄位）
pub fn load_sales_orders_from_path(path: &Path) -> Result<Vec<SalesOrderLine>> {
    let file = open(path)?;
    load_sales_orders(file, &ColumnMapping::sales_orders(), &path.display().to_string())
}

fn open(path: &Path) -> Result<std::fs::File> {
    std::fs::File::open(path).map_err(|cause| IoError::Open {
        path: path.to_path_buf(),
        cause,
    })
}

fn parse_rows<R: Read>(reader: R, mapping: &ColumnMapping, file: &str) -> Result<Vec<ParsedRow>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let column = |name: &str| -> Result<usize> {
        headers
            .iter()
            .position(|h| h.trim_start_matches('\u{feff}') == name)
            .ok_or_else(|| IoError::MissingColumn {
                file: file.to_string(),
                column: name.to_string(),
            })
    };

    let item_idx = column(&mapping.item_code)?;
    let location_idx = column(&mapping.location)?;
    let number_idx = column(&mapping.order_number)?;
    let quantity_idx = column(&mapping.quantity)?;

    let mut rows = Vec::new();
    for (idx, record) in csv_reader.records().enumerate() {
        let record = record?;
        // 標題為第 1 列
        let row = idx + 2;
        let field = |i: usize| record.get(i).unwrap_or_default().to_string();

        let raw_quantity = field(quantity_idx);
        let quantity = parse_quantity(&raw_quantity).ok_or_else(|| IoError::InvalidQuantity {
            file: file.to_string(),
            row,
            column: mapping.quantity.clone(),
            value: raw_quantity.clone(),
        })?;

        rows.push(ParsedRow {
            item_code: field(item_idx),
            location: field(location_idx),
            order_number: field(number_idx),
            quantity,
        });
    }

    tracing::debug!("{}: 解析 {} 列", file, rows.len());
    Ok(rows)
}

/// 解析數量，接受一般小數與科學記號
pub fn parse_quantity(raw: &str) -> Option<Decimal> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
}
