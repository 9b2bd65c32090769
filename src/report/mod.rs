mod balance;
mod cycles;
mod monthly;

pub use balance::reconcile;
pub use cycles::{calculate_payment_cycles, last_day_of_month, Cycle, PaymentCycles, SessionTotals};
pub use monthly::{monthly_report, CustomerMonthRow, MonthlyReport, SupplierMonthRow};
