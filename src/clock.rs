use chrono::Local;

/// Today's date as YYYY-MM-DD. All defaulting and rate selection goes
/// through here so the whole system agrees on what "today" means.
pub fn today() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}

/// Current month as YYYY-MM.
pub fn this_month() -> String {
    Local::now().format("%Y-%m").to_string()
}

/// Creation timestamp for ledger records.
pub fn now_stamp() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}
