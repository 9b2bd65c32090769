use std::collections::HashMap;
use std::path::Path;

use serde::Serialize;

use crate::config::{in_month, Ledger, Session, Supplier};
use crate::error::{MilkboothError, Result};
use crate::rates::MilkType;
use crate::report::monthly_report;

/// One collection row in the monthly CSV. Column order is part of the
/// export format; downstream spreadsheets depend on it.
#[derive(Debug, Serialize)]
pub struct CollectionCsvRow {
    pub supplier_id: String,
    pub name: String,
    pub date: String,
    pub session: Session,
    pub liters: f64,
    pub fat: f64,
    pub milk_type: MilkType,
    pub rate_per_liter: f64,
    pub amount: i64,
}

/// One supplier settlement row in the monthly summary CSV.
#[derive(Debug, Serialize)]
pub struct SummaryCsvRow {
    pub supplier_id: String,
    pub name: String,
    pub total_liters: f64,
    pub total_amount: i64,
    pub withdrawn: i64,
    pub balance: i64,
}

/// Collect a month's collections joined with supplier names, ordered by
/// supplier name then date.
pub fn collection_rows(
    suppliers: &HashMap<String, Supplier>,
    ledger: &Ledger,
    month: &str,
) -> Vec<CollectionCsvRow> {
    let mut rows: Vec<CollectionCsvRow> = ledger
        .collections
        .iter()
        .filter(|c| in_month(&c.date, month))
        .map(|c| CollectionCsvRow {
            supplier_id: c.supplier.clone(),
            name: suppliers
                .get(&c.supplier)
                .map(|s| s.name.clone())
                .unwrap_or_else(|| c.supplier.clone()),
            date: c.date.clone(),
            session: c.session,
            liters: c.liters,
            fat: c.fat,
            milk_type: c.milk_type,
            rate_per_liter: c.rate_per_liter,
            amount: c.amount,
        })
        .collect();
    rows.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.date.cmp(&b.date)));
    rows
}

/// Build the per-supplier settlement rows for the summary export.
pub fn summary_rows(
    suppliers: &HashMap<String, Supplier>,
    ledger: &Ledger,
    month: &str,
) -> Vec<SummaryCsvRow> {
    monthly_report(suppliers, &HashMap::new(), ledger, month)
        .suppliers
        .into_iter()
        .map(|r| SummaryCsvRow {
            supplier_id: r.supplier_id,
            name: r.name,
            total_liters: r.total_liters,
            total_amount: r.total_amount,
            withdrawn: r.withdrawn,
            balance: r.balance,
        })
        .collect()
}

/// Write rows to a CSV file with a header derived from the row struct.
pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let mut writer =
        csv::Writer::from_path(path).map_err(|e| MilkboothError::CsvExport(e.to_string()))?;
    for row in rows {
        writer
            .serialize(row)
            .map_err(|e| MilkboothError::CsvExport(e.to_string()))?;
    }
    writer
        .flush()
        .map_err(|e| MilkboothError::CsvExport(e.to_string()))?;
    Ok(())
}
