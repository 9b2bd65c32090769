use std::path::PathBuf;

use crate::config::{load_ledger, save_ledger};
use crate::error::Result;
use crate::rates::{amount_for, find_rate_on, MilkType, BUFFALO_RATE_CHANGE};

/// One repriced record from a migration sweep.
#[derive(Debug)]
pub struct RateFix {
    pub kind: &'static str,
    pub id: u64,
    pub entity: String,
    pub date: String,
    pub fat: f64,
    pub old_rate: f64,
    pub new_rate: f64,
    pub old_amount: i64,
    pub new_amount: i64,
}

#[derive(Debug, Default)]
pub struct MigrationOutcome {
    pub fixes: Vec<RateFix>,
    pub collections_updated: usize,
    pub sales_updated: usize,
    pub total_difference: i64,
}

/// One-time sweep after the 2026 buffalo chart change: reprice every
/// buffalo record dated on/after the threshold whose stored rate no
/// longer matches the resolver. Resolution uses each record's own date,
/// so pre-threshold records are never touched. With `apply` false the
/// sweep only reports what it would change.
pub fn migrate_buffalo_rates(cfg_dir: &PathBuf, apply: bool) -> Result<MigrationOutcome> {
    let mut ledger = load_ledger(cfg_dir)?;
    let mut outcome = MigrationOutcome::default();

    for coll in ledger.collections.iter_mut() {
        if coll.milk_type != MilkType::Buffalo || coll.date.as_str() < BUFFALO_RATE_CHANGE {
            continue;
        }
        let Some(new_rate) = find_rate_on(coll.fat, coll.milk_type, &coll.date) else {
            continue;
        };
        if new_rate == coll.rate_per_liter {
            continue;
        }
        let new_amount = amount_for(coll.liters, new_rate);
        outcome.fixes.push(RateFix {
            kind: "collection",
            id: coll.id,
            entity: coll.supplier.clone(),
            date: coll.date.clone(),
            fat: coll.fat,
            old_rate: coll.rate_per_liter,
            new_rate,
            old_amount: coll.amount,
            new_amount,
        });
        outcome.total_difference += new_amount - coll.amount;
        outcome.collections_updated += 1;
        if apply {
            coll.rate_per_liter = new_rate;
            coll.amount = new_amount;
        }
    }

    for sale in ledger.sales.iter_mut() {
        if sale.milk_type != MilkType::Buffalo || sale.date.as_str() < BUFFALO_RATE_CHANGE {
            continue;
        }
        let Some(new_rate) = find_rate_on(sale.fat, sale.milk_type, &sale.date) else {
            continue;
        };
        if new_rate == sale.rate_per_liter {
            continue;
        }
        let new_amount = amount_for(sale.liters, new_rate);
        outcome.fixes.push(RateFix {
            kind: "sale",
            id: sale.id,
            entity: sale.customer.clone(),
            date: sale.date.clone(),
            fat: sale.fat,
            old_rate: sale.rate_per_liter,
            new_rate,
            old_amount: sale.amount,
            new_amount,
        });
        outcome.total_difference += new_amount - sale.amount;
        outcome.sales_updated += 1;
        if apply {
            sale.rate_per_liter = new_rate;
            sale.amount = new_amount;
        }
    }

    if apply && !outcome.fixes.is_empty() {
        save_ledger(cfg_dir, &ledger)?;
    }

    Ok(outcome)
}
