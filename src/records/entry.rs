use std::path::PathBuf;

use chrono::NaiveDate;

use crate::clock;
use crate::config::{
    load_customers, load_ledger, load_suppliers, save_ledger, Collection, Sale, Session,
    Withdrawal,
};
use crate::error::{MilkboothError, Result};
use crate::rates::{amount_for, find_rate_on, round_fat, MilkType};

/// Input for a new collection or sale, as entered by the operator.
#[derive(Debug, Clone)]
pub struct DeliveryInput {
    pub entity_id: String,
    pub date: String,
    pub session: Session,
    pub liters: f64,
    pub fat: f64,
    pub milk_type: MilkType,
    pub note: Option<String>,
}

/// Field overrides for an edit; anything left as None keeps the stored
/// value. `clear_note` removes the note, which `Option<String>` alone
/// cannot express. Edits always re-resolve the rate and recompute the
/// amount.
#[derive(Debug, Default, Clone)]
pub struct DeliveryEdit {
    pub date: Option<String>,
    pub session: Option<Session>,
    pub liters: Option<f64>,
    pub fat: Option<f64>,
    pub milk_type: Option<MilkType>,
    pub note: Option<String>,
    pub clear_note: bool,
}

/// Validate an entered date and normalize it to YYYY-MM-DD.
pub fn normalize_date(input: &str) -> Result<String> {
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .map(|d| d.format("%Y-%m-%d").to_string())
        .map_err(|_| MilkboothError::InvalidDate(input.to_string()))
}

/// Parse a YYYY-MM month argument into (year, month).
pub fn parse_month(input: &str) -> Result<(i32, u32)> {
    let parsed = input.split_once('-').and_then(|(y, m)| {
        if y.len() != 4 || m.len() != 2 {
            return None;
        }
        let year: i32 = y.parse().ok()?;
        let month: u32 = m.parse().ok()?;
        (1..=12).contains(&month).then_some((year, month))
    });
    parsed.ok_or_else(|| MilkboothError::InvalidMonth(input.to_string()))
}

/// Resolve rate and amount for a delivery. The rate must come out of the
/// chart in force on the record's date; an unresolvable fat rejects the
/// whole record.
fn price_delivery(liters: f64, fat: f64, milk_type: MilkType, date: &str) -> Result<(f64, f64, i64)> {
    if liters <= 0.0 {
        return Err(MilkboothError::InvalidLiters(liters));
    }
    let rate = find_rate_on(fat, milk_type, date)
        .ok_or(MilkboothError::RateNotFound { milk_type, fat })?;
    Ok((round_fat(fat), rate, amount_for(liters, rate)))
}

/// Record a milk collection from a supplier.
pub fn add_collection(cfg_dir: &PathBuf, input: DeliveryInput) -> Result<Collection> {
    let suppliers = load_suppliers(cfg_dir)?;
    if !suppliers.contains_key(&input.entity_id) {
        return Err(MilkboothError::SupplierNotFound(input.entity_id));
    }

    let date = normalize_date(&input.date)?;
    let (fat, rate, amount) = price_delivery(input.liters, input.fat, input.milk_type, &date)?;

    let mut ledger = load_ledger(cfg_dir)?;
    let record = Collection {
        id: ledger.counter.next_collection(),
        supplier: input.entity_id,
        date,
        session: input.session,
        liters: input.liters,
        fat,
        milk_type: input.milk_type,
        rate_per_liter: rate,
        amount,
        note: input.note,
        created_at: clock::now_stamp(),
    };
    ledger.collections.push(record.clone());
    save_ledger(cfg_dir, &ledger)?;

    Ok(record)
}

/// Record a milk sale to a customer.
pub fn add_sale(cfg_dir: &PathBuf, input: DeliveryInput) -> Result<Sale> {
    let customers = load_customers(cfg_dir)?;
    if !customers.contains_key(&input.entity_id) {
        return Err(MilkboothError::CustomerNotFound(input.entity_id));
    }

    let date = normalize_date(&input.date)?;
    let (fat, rate, amount) = price_delivery(input.liters, input.fat, input.milk_type, &date)?;

    let mut ledger = load_ledger(cfg_dir)?;
    let record = Sale {
        id: ledger.counter.next_sale(),
        customer: input.entity_id,
        date,
        session: input.session,
        liters: input.liters,
        fat,
        milk_type: input.milk_type,
        rate_per_liter: rate,
        amount,
        note: input.note,
        created_at: clock::now_stamp(),
    };
    ledger.sales.push(record.clone());
    save_ledger(cfg_dir, &ledger)?;

    Ok(record)
}

/// Edit an existing collection. Rate and amount are recomputed together
/// from the effective inputs, using the chart in force on the (possibly
/// changed) record date. A failed re-resolve leaves the record untouched.
pub fn edit_collection(cfg_dir: &PathBuf, id: u64, edit: DeliveryEdit) -> Result<Collection> {
    let mut ledger = load_ledger(cfg_dir)?;
    let idx = ledger
        .collections
        .iter()
        .position(|c| c.id == id)
        .ok_or(MilkboothError::RecordNotFound { kind: "collection", id })?;

    let current = &ledger.collections[idx];
    let date = match edit.date {
        Some(d) => normalize_date(&d)?,
        None => current.date.clone(),
    };
    let liters = edit.liters.unwrap_or(current.liters);
    let fat = edit.fat.unwrap_or(current.fat);
    let milk_type = edit.milk_type.unwrap_or(current.milk_type);

    let (fat, rate, amount) = price_delivery(liters, fat, milk_type, &date)?;

    let record = &mut ledger.collections[idx];
    record.date = date;
    record.liters = liters;
    record.fat = fat;
    record.milk_type = milk_type;
    record.rate_per_liter = rate;
    record.amount = amount;
    if let Some(session) = edit.session {
        record.session = session;
    }
    if edit.clear_note {
        record.note = None;
    } else if let Some(note) = edit.note {
        record.note = Some(note);
    }

    let updated = record.clone();
    save_ledger(cfg_dir, &ledger)?;
    Ok(updated)
}

/// Hard-delete a collection by id.
pub fn delete_collection(cfg_dir: &PathBuf, id: u64) -> Result<Collection> {
    let mut ledger = load_ledger(cfg_dir)?;
    let idx = ledger
        .collections
        .iter()
        .position(|c| c.id == id)
        .ok_or(MilkboothError::RecordNotFound { kind: "collection", id })?;
    let removed = ledger.collections.remove(idx);
    save_ledger(cfg_dir, &ledger)?;
    Ok(removed)
}

/// Hard-delete a sale by id.
pub fn delete_sale(cfg_dir: &PathBuf, id: u64) -> Result<Sale> {
    let mut ledger = load_ledger(cfg_dir)?;
    let idx = ledger
        .sales
        .iter()
        .position(|s| s.id == id)
        .ok_or(MilkboothError::RecordNotFound { kind: "sale", id })?;
    let removed = ledger.sales.remove(idx);
    save_ledger(cfg_dir, &ledger)?;
    Ok(removed)
}

/// Record a payment made to a supplier.
pub fn add_withdrawal(
    cfg_dir: &PathBuf,
    supplier_id: &str,
    amount: i64,
    date: Option<String>,
    note: Option<String>,
) -> Result<Withdrawal> {
    let suppliers = load_suppliers(cfg_dir)?;
    if !suppliers.contains_key(supplier_id) {
        return Err(MilkboothError::SupplierNotFound(supplier_id.to_string()));
    }
    if amount <= 0 {
        return Err(MilkboothError::InvalidAmount);
    }

    let date = match date {
        Some(d) => normalize_date(&d)?,
        None => clock::today(),
    };

    let mut ledger = load_ledger(cfg_dir)?;
    let record = Withdrawal {
        id: ledger.counter.next_withdrawal(),
        supplier: supplier_id.to_string(),
        date,
        amount,
        note,
        created_at: clock::now_stamp(),
    };
    ledger.withdrawals.push(record.clone());
    save_ledger(cfg_dir, &ledger)?;

    Ok(record)
}

/// Edit a withdrawal's amount, date, or note. `clear_note` removes the
/// stored note.
pub fn edit_withdrawal(
    cfg_dir: &PathBuf,
    id: u64,
    amount: Option<i64>,
    date: Option<String>,
    note: Option<String>,
    clear_note: bool,
) -> Result<Withdrawal> {
    let mut ledger = load_ledger(cfg_dir)?;
    let record = ledger
        .withdrawals
        .iter_mut()
        .find(|w| w.id == id)
        .ok_or(MilkboothError::RecordNotFound { kind: "withdrawal", id })?;

    if let Some(amount) = amount {
        if amount <= 0 {
            return Err(MilkboothError::InvalidAmount);
        }
        record.amount = amount;
    }
    if let Some(d) = date {
        record.date = normalize_date(&d)?;
    }
    if clear_note {
        record.note = None;
    } else if let Some(note) = note {
        record.note = Some(note);
    }

    let updated = record.clone();
    save_ledger(cfg_dir, &ledger)?;
    Ok(updated)
}

/// Hard-delete a withdrawal by id.
pub fn delete_withdrawal(cfg_dir: &PathBuf, id: u64) -> Result<Withdrawal> {
    let mut ledger = load_ledger(cfg_dir)?;
    let idx = ledger
        .withdrawals
        .iter()
        .position(|w| w.id == id)
        .ok_or(MilkboothError::RecordNotFound { kind: "withdrawal", id })?;
    let removed = ledger.withdrawals.remove(idx);
    save_ledger(cfg_dir, &ledger)?;
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dates_normalize_or_reject() {
        assert_eq!(normalize_date("2026-03-01").unwrap(), "2026-03-01");
        assert_eq!(normalize_date("2026-3-1").unwrap(), "2026-03-01");
        assert!(normalize_date("01-03-2026").is_err());
        assert!(normalize_date("2026-02-30").is_err());
        assert!(normalize_date("yesterday").is_err());
    }

    #[test]
    fn months_parse_strictly() {
        assert_eq!(parse_month("2026-02").unwrap(), (2026, 2));
        assert_eq!(parse_month("2024-12").unwrap(), (2024, 12));
        assert!(parse_month("2026-13").is_err());
        assert!(parse_month("2026-2").is_err());
        assert!(parse_month("2026").is_err());
    }

    #[test]
    fn pricing_rejects_out_of_domain_fat() {
        let err = price_delivery(10.0, 4.2, MilkType::Buffalo, "2026-03-01").unwrap_err();
        assert!(err.to_string().contains("buffalo"));
        assert!(err.to_string().contains("4.2"));
    }

    #[test]
    fn pricing_floors_and_rounds_fat() {
        let (fat, rate, amount) = price_delivery(7.35, 6.47, MilkType::Buffalo, "2025-06-01").unwrap();
        assert_eq!(fat, 6.5);
        assert_eq!(rate, 50.31);
        assert_eq!(amount, 369); // floor(7.35 * 50.31) = floor(369.77...)
    }
}
