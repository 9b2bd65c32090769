use crate::config::{Collection, Withdrawal};

/// Collected amount minus withdrawn amount over pre-filtered slices.
/// The result is signed: a supplier can be paid ahead of deliveries,
/// which is normal business, not an error.
pub fn reconcile(collections: &[&Collection], withdrawals: &[&Withdrawal]) -> i64 {
    let collected: i64 = collections.iter().map(|c| c.amount).sum();
    let withdrawn: i64 = withdrawals.iter().map(|w| w.amount).sum();
    collected - withdrawn
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Session;
    use crate::rates::MilkType;

    fn coll(amount: i64) -> Collection {
        Collection {
            id: 0,
            supplier: "1".to_string(),
            date: "2026-03-01".to_string(),
            session: Session::Morning,
            liters: 1.0,
            fat: 6.5,
            milk_type: MilkType::Buffalo,
            rate_per_liter: 52.0,
            amount,
            note: None,
            created_at: String::new(),
        }
    }

    fn wd(amount: i64) -> Withdrawal {
        Withdrawal {
            id: 0,
            supplier: "1".to_string(),
            date: "2026-03-05".to_string(),
            amount,
            note: None,
            created_at: String::new(),
        }
    }

    #[test]
    fn balance_is_signed_and_exact() {
        let collections = vec![coll(4000), coll(6000)];
        let withdrawals = vec![wd(12000)];
        let c: Vec<&Collection> = collections.iter().collect();
        let w: Vec<&Withdrawal> = withdrawals.iter().collect();
        assert_eq!(reconcile(&c, &w), -2000);
    }

    #[test]
    fn empty_slices_balance_to_zero() {
        assert_eq!(reconcile(&[], &[]), 0);
    }
}
