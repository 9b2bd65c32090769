use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::rates::MilkType;

/// One of the two daily collection/sale slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Session {
    Morning,
    Evening,
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Session::Morning => write!(f, "morning"),
            Session::Evening => write!(f, "evening"),
        }
    }
}

/// The single-file database: every committed record lives in ledger.toml.
/// Dates are kept as YYYY-MM-DD strings so month filtering is a prefix
/// match and old records with a bad date can still be carried along.
#[derive(Debug, Deserialize, Serialize, Default)]
pub struct Ledger {
    #[serde(default)]
    pub counter: Counter,
    #[serde(default)]
    pub collections: Vec<Collection>,
    #[serde(default)]
    pub sales: Vec<Sale>,
    #[serde(default)]
    pub withdrawals: Vec<Withdrawal>,
}

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct Counter {
    #[serde(default)]
    pub last_collection: u64,
    #[serde(default)]
    pub last_sale: u64,
    #[serde(default)]
    pub last_withdrawal: u64,
}

/// Milk delivered by a supplier. Invariant: amount == floor(liters x
/// rate_per_liter) and rate_per_liter is the resolver's output for
/// (fat, milk_type, date) at the time of the write.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Collection {
    pub id: u64,
    pub supplier: String,
    pub date: String,
    pub session: Session,
    pub liters: f64,
    pub fat: f64,
    pub milk_type: MilkType,
    pub rate_per_liter: f64,
    pub amount: i64,
    #[serde(default)]
    pub note: Option<String>,
    pub created_at: String,
}

/// Milk sold to a customer. Same pricing invariant as Collection.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Sale {
    pub id: u64,
    pub customer: String,
    pub date: String,
    pub session: Session,
    pub liters: f64,
    pub fat: f64,
    pub milk_type: MilkType,
    pub rate_per_liter: f64,
    pub amount: i64,
    #[serde(default)]
    pub note: Option<String>,
    pub created_at: String,
}

/// A payment made to a supplier against their collection balance.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Withdrawal {
    pub id: u64,
    pub supplier: String,
    pub date: String,
    pub amount: i64,
    #[serde(default)]
    pub note: Option<String>,
    pub created_at: String,
}

impl Counter {
    pub fn next_collection(&mut self) -> u64 {
        self.last_collection += 1;
        self.last_collection
    }

    pub fn next_sale(&mut self) -> u64 {
        self.last_sale += 1;
        self.last_sale
    }

    pub fn next_withdrawal(&mut self) -> u64 {
        self.last_withdrawal += 1;
        self.last_withdrawal
    }
}

impl Ledger {
    pub fn collections_for<'a>(&'a self, supplier_id: &str) -> Vec<&'a Collection> {
        self.collections.iter().filter(|c| c.supplier == supplier_id).collect()
    }

    pub fn sales_for<'a>(&'a self, customer_id: &str) -> Vec<&'a Sale> {
        self.sales.iter().filter(|s| s.customer == customer_id).collect()
    }

    pub fn withdrawals_for<'a>(&'a self, supplier_id: &str) -> Vec<&'a Withdrawal> {
        self.withdrawals.iter().filter(|w| w.supplier == supplier_id).collect()
    }
}

/// Month filter over stored date strings ("2026-03" matches "2026-03-14").
pub fn in_month(date: &str, month: &str) -> bool {
    date.len() > month.len() && date.starts_with(month) && date.as_bytes()[month.len()] == b'-'
}
