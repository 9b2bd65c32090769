use std::collections::HashMap;

use crate::config::{id_sort_key, in_month, Customer, Ledger, Supplier};

/// One supplier's month: what they delivered, what they were paid, and
/// what the booth still owes them (signed).
#[derive(Debug, Clone)]
pub struct SupplierMonthRow {
    pub supplier_id: String,
    pub name: String,
    pub mobile: Option<String>,
    pub total_liters: f64,
    pub total_amount: i64,
    pub withdrawn: i64,
    pub balance: i64,
}

/// One customer's month of purchases.
#[derive(Debug, Clone)]
pub struct CustomerMonthRow {
    pub customer_id: String,
    pub name: String,
    pub mobile: Option<String>,
    pub total_liters: f64,
    pub total_amount: i64,
}

#[derive(Debug, Clone)]
pub struct MonthlyReport {
    pub month: String,
    pub suppliers: Vec<SupplierMonthRow>,
    pub customers: Vec<CustomerMonthRow>,
    pub total_liters: f64,
    pub total_amount: i64,
    pub total_withdrawn: i64,
    pub total_sales: i64,
}

/// Build the monthly settlement report: per-supplier collection totals
/// reconciled against that month's withdrawals, plus per-customer sales.
/// Suppliers appear only when they delivered in the month (withdrawals
/// without collections do not create a row, matching the books as the
/// booth has always kept them).
pub fn monthly_report(
    suppliers: &HashMap<String, Supplier>,
    customers: &HashMap<String, Customer>,
    ledger: &Ledger,
    month: &str,
) -> MonthlyReport {
    let mut collected: HashMap<&str, (f64, i64)> = HashMap::new();
    for coll in ledger.collections.iter().filter(|c| in_month(&c.date, month)) {
        let slot = collected.entry(coll.supplier.as_str()).or_default();
        slot.0 += coll.liters;
        slot.1 += coll.amount;
    }

    let mut withdrawn: HashMap<&str, i64> = HashMap::new();
    for wd in ledger.withdrawals.iter().filter(|w| in_month(&w.date, month)) {
        *withdrawn.entry(wd.supplier.as_str()).or_default() += wd.amount;
    }

    let mut supplier_rows: Vec<SupplierMonthRow> = collected
        .iter()
        .map(|(id, (liters, amount))| {
            let paid = withdrawn.get(id).copied().unwrap_or(0);
            let supplier = suppliers.get(*id);
            SupplierMonthRow {
                supplier_id: id.to_string(),
                name: supplier.map(|s| s.name.clone()).unwrap_or_else(|| id.to_string()),
                mobile: supplier.and_then(|s| s.mobile.clone()),
                total_liters: *liters,
                total_amount: *amount,
                withdrawn: paid,
                balance: amount - paid,
            }
        })
        .collect();
    supplier_rows.sort_by_key(|r| id_sort_key(&r.supplier_id));

    let mut sold: HashMap<&str, (f64, i64)> = HashMap::new();
    for sale in ledger.sales.iter().filter(|s| in_month(&s.date, month)) {
        let slot = sold.entry(sale.customer.as_str()).or_default();
        slot.0 += sale.liters;
        slot.1 += sale.amount;
    }

    let mut customer_rows: Vec<CustomerMonthRow> = sold
        .iter()
        .map(|(id, (liters, amount))| {
            let customer = customers.get(*id);
            CustomerMonthRow {
                customer_id: id.to_string(),
                name: customer.map(|c| c.name.clone()).unwrap_or_else(|| id.to_string()),
                mobile: customer.and_then(|c| c.mobile.clone()),
                total_liters: *liters,
                total_amount: *amount,
            }
        })
        .collect();
    customer_rows.sort_by_key(|r| id_sort_key(&r.customer_id));

    let total_liters = supplier_rows.iter().map(|r| r.total_liters).sum();
    let total_amount = supplier_rows.iter().map(|r| r.total_amount).sum();
    let total_withdrawn = supplier_rows.iter().map(|r| r.withdrawn).sum();
    let total_sales = customer_rows.iter().map(|r| r.total_amount).sum();

    MonthlyReport {
        month: month.to_string(),
        suppliers: supplier_rows,
        customers: customer_rows,
        total_liters,
        total_amount,
        total_withdrawn,
        total_sales,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Collection, Sale, Session, Withdrawal};
    use crate::rates::MilkType;

    fn supplier(name: &str) -> Supplier {
        Supplier { name: name.to_string(), mobile: None, address: None }
    }

    fn customer(name: &str) -> Customer {
        Customer { name: name.to_string(), mobile: None, address: None }
    }

    fn coll(supplier: &str, date: &str, liters: f64, amount: i64) -> Collection {
        Collection {
            id: 0,
            supplier: supplier.to_string(),
            date: date.to_string(),
            session: Session::Morning,
            liters,
            fat: 6.5,
            milk_type: MilkType::Buffalo,
            rate_per_liter: 52.0,
            amount,
            note: None,
            created_at: String::new(),
        }
    }

    fn sale(customer: &str, date: &str, liters: f64, amount: i64) -> Sale {
        Sale {
            id: 0,
            customer: customer.to_string(),
            date: date.to_string(),
            session: Session::Evening,
            liters,
            fat: 6.0,
            milk_type: MilkType::Cow,
            rate_per_liter: 32.2,
            amount,
            note: None,
            created_at: String::new(),
        }
    }

    fn wd(supplier: &str, date: &str, amount: i64) -> Withdrawal {
        Withdrawal {
            id: 0,
            supplier: supplier.to_string(),
            date: date.to_string(),
            amount,
            note: None,
            created_at: String::new(),
        }
    }

    #[test]
    fn per_supplier_balances_and_numeric_ordering() {
        let mut suppliers = HashMap::new();
        suppliers.insert("2".to_string(), supplier("Beena"));
        suppliers.insert("10".to_string(), supplier("Ramu"));

        let ledger = Ledger {
            collections: vec![
                coll("10", "2026-03-02", 10.0, 520),
                coll("2", "2026-03-03", 5.0, 260),
                coll("2", "2026-04-01", 5.0, 260), // outside month
            ],
            withdrawals: vec![wd("2", "2026-03-10", 300), wd("10", "2026-02-28", 100)],
            ..Ledger::default()
        };

        let report = monthly_report(&suppliers, &HashMap::new(), &ledger, "2026-03");

        // numeric id order: 2 before 10
        assert_eq!(report.suppliers[0].supplier_id, "2");
        assert_eq!(report.suppliers[1].supplier_id, "10");
        assert_eq!(report.suppliers[0].balance, -40); // 260 - 300
        assert_eq!(report.suppliers[1].withdrawn, 0); // Feb withdrawal excluded
        assert_eq!(report.total_amount, 780);
        assert_eq!(report.total_withdrawn, 300);
    }

    #[test]
    fn per_customer_sales_totals() {
        let mut customers = HashMap::new();
        customers.insert("c1".to_string(), customer("Asha"));

        let ledger = Ledger {
            sales: vec![
                sale("c1", "2026-03-02", 2.0, 64),
                sale("c1", "2026-03-05", 1.5, 48),
                sale("c2", "2026-03-07", 1.0, 32),
                sale("c1", "2026-04-01", 2.0, 64), // outside month
            ],
            ..Ledger::default()
        };

        let report = monthly_report(&HashMap::new(), &customers, &ledger, "2026-03");

        assert!(report.suppliers.is_empty());
        assert_eq!(report.customers.len(), 2);
        assert_eq!(report.customers[0].customer_id, "c1");
        assert_eq!(report.customers[0].name, "Asha");
        assert_eq!(report.customers[0].total_liters, 3.5);
        assert_eq!(report.customers[0].total_amount, 112);
        // unconfigured customer falls back to its id
        assert_eq!(report.customers[1].name, "c2");
        assert_eq!(report.total_sales, 144);
    }
}
