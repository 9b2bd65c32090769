use chrono::{Datelike, NaiveDate};

use crate::config::{Collection, Session};

/// Per-session accumulator within a payment cycle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionTotals {
    pub liters: f64,
    pub amount: i64,
    pub count: usize,
}

/// One semi-monthly settlement window.
#[derive(Debug, Clone, PartialEq)]
pub struct Cycle {
    pub start: String,
    pub end: String,
    pub morning: SessionTotals,
    pub evening: SessionTotals,
    pub total_liters: f64,
    pub total_amount: i64,
}

impl Cycle {
    fn new(start: String, end: String) -> Cycle {
        Cycle {
            start,
            end,
            morning: SessionTotals::default(),
            evening: SessionTotals::default(),
            total_liters: 0.0,
            total_amount: 0,
        }
    }
}

/// The two settlement windows of a month: days 1-15 and 16-end.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentCycles {
    pub cycle_1: Cycle,
    pub cycle_2: Cycle,
}

/// Calendar-correct last day of a month (handles leap Februaries).
pub fn last_day_of_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .unwrap_or(31)
}

/// Bucket a supplier's collections for one month into the two payment
/// cycles, split by session. Every in-month record lands in exactly one
/// cycle, decided solely by the numeric day of its date; records whose
/// day component fails to parse are skipped so one bad historical date
/// cannot sink the whole report. Pure reduction, no hidden state.
pub fn calculate_payment_cycles(collections: &[Collection], year: i32, month: u32) -> PaymentCycles {
    let month_str = format!("{year}-{month:02}");
    let last_day = last_day_of_month(year, month);

    let mut cycles = PaymentCycles {
        cycle_1: Cycle::new(format!("{month_str}-01"), format!("{month_str}-15")),
        cycle_2: Cycle::new(format!("{month_str}-16"), format!("{month_str}-{last_day:02}")),
    };

    for coll in collections {
        if !coll.date.starts_with(&month_str) {
            continue;
        }
        let Some(day) = coll.date.split('-').nth(2).and_then(|d| d.parse::<u32>().ok()) else {
            continue;
        };

        let cycle = if (1..=15).contains(&day) {
            &mut cycles.cycle_1
        } else {
            &mut cycles.cycle_2
        };

        let slot = match coll.session {
            Session::Morning => &mut cycle.morning,
            Session::Evening => &mut cycle.evening,
        };
        slot.liters += coll.liters;
        slot.amount += coll.amount;
        slot.count += 1;

        cycle.total_liters += coll.liters;
        cycle.total_amount += coll.amount;
    }

    cycles
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rates::MilkType;

    fn coll(date: &str, session: Session, liters: f64, amount: i64) -> Collection {
        Collection {
            id: 0,
            supplier: "1".to_string(),
            date: date.to_string(),
            session,
            liters,
            fat: 6.5,
            milk_type: MilkType::Buffalo,
            rate_per_liter: 52.0,
            amount,
            note: None,
            created_at: String::new(),
        }
    }

    #[test]
    fn month_ends_respect_the_calendar() {
        assert_eq!(last_day_of_month(2026, 2), 28);
        assert_eq!(last_day_of_month(2024, 2), 29); // leap year
        assert_eq!(last_day_of_month(2026, 4), 30);
        assert_eq!(last_day_of_month(2026, 12), 31);
    }

    #[test]
    fn partition_is_exhaustive_and_disjoint() {
        let records = vec![
            coll("2026-03-01", Session::Morning, 10.0, 520),
            coll("2026-03-15", Session::Evening, 8.0, 416),
            coll("2026-03-16", Session::Morning, 12.0, 624),
            coll("2026-03-31", Session::Evening, 5.0, 260),
            coll("2026-04-01", Session::Morning, 9.0, 468), // other month
        ];
        let cycles = calculate_payment_cycles(&records, 2026, 3);

        assert_eq!(cycles.cycle_1.morning.count, 1);
        assert_eq!(cycles.cycle_1.evening.count, 1);
        assert_eq!(cycles.cycle_2.morning.count, 1);
        assert_eq!(cycles.cycle_2.evening.count, 1);
        assert_eq!(cycles.cycle_1.total_amount, 936);
        assert_eq!(cycles.cycle_2.total_amount, 884);

        // cycle totals cover exactly the in-month records
        let in_month: i64 = records
            .iter()
            .filter(|c| c.date.starts_with("2026-03"))
            .map(|c| c.amount)
            .sum();
        assert_eq!(cycles.cycle_1.total_amount + cycles.cycle_2.total_amount, in_month);
    }

    #[test]
    fn february_boundaries() {
        let cycles = calculate_payment_cycles(
            &[coll("2026-02-28", Session::Morning, 10.0, 520)],
            2026,
            2,
        );
        assert_eq!(cycles.cycle_2.end, "2026-02-28");
        assert_eq!(cycles.cycle_2.morning.count, 1);

        let leap = calculate_payment_cycles(
            &[coll("2024-02-29", Session::Evening, 10.0, 520)],
            2024,
            2,
        );
        assert_eq!(leap.cycle_2.end, "2024-02-29");
        assert_eq!(leap.cycle_2.evening.count, 1);
    }

    #[test]
    fn malformed_dates_are_skipped_not_fatal() {
        let records = vec![
            coll("2026-03-xx", Session::Morning, 10.0, 520),
            coll("2026-03-10", Session::Morning, 10.0, 520),
        ];
        let cycles = calculate_payment_cycles(&records, 2026, 3);
        assert_eq!(cycles.cycle_1.morning.count, 1);
        assert_eq!(cycles.cycle_1.total_amount, 520);
    }

    #[test]
    fn aggregation_is_idempotent() {
        let records = vec![
            coll("2026-03-02", Session::Morning, 10.0, 520),
            coll("2026-03-20", Session::Evening, 4.5, 234),
        ];
        let first = calculate_payment_cycles(&records, 2026, 3);
        let second = calculate_payment_cycles(&records, 2026, 3);
        assert_eq!(first, second);
    }
}
