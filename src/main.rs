mod clock;
mod config;
mod error;
mod export;
mod notify;
mod rates;
mod records;
mod report;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tabled::{settings::Style, Table, Tabled};

use crate::config::{
    config_dir, load_customers, load_ledger, load_settings, load_suppliers, resolve_output_dir,
    save_customers, save_suppliers, Collection, Customer, Sale, Session, Supplier,
    CUSTOMERS_TEMPLATE, SETTINGS_TEMPLATE, SUPPLIERS_TEMPLATE,
};
use crate::error::{MilkboothError, Result};
use crate::notify::{GatewayNotifier, Notifier};
use crate::rates::MilkType;
use crate::records::{DeliveryEdit, DeliveryInput};
use crate::report::{calculate_payment_cycles, reconcile, Cycle};

#[derive(Parser)]
#[command(name = "milkbooth")]
#[command(version, about = "Minimal CLI milk collection ledger", long_about = None)]
struct Cli {
    /// Path to config directory (default: ~/.milkbooth or XDG config)
    #[arg(short = 'C', long, global = true)]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize config directory with template files
    Init,

    /// Show booth status and record counts
    Status,

    /// List configured suppliers
    Suppliers,

    /// Add a supplier to suppliers.toml
    AddSupplier {
        /// Supplier identifier (usually a plain number)
        id: String,

        /// Supplier name
        name: String,

        /// Mobile number for notifications
        #[arg(long)]
        mobile: Option<String>,

        /// Address
        #[arg(long)]
        address: Option<String>,
    },

    /// Show a supplier's recent records and balance
    Supplier {
        /// Supplier identifier from suppliers.toml
        id: String,
    },

    /// List configured customers
    Customers,

    /// Add a customer to customers.toml
    AddCustomer {
        /// Customer identifier
        id: String,

        /// Customer name
        name: String,

        /// Mobile number
        #[arg(long)]
        mobile: Option<String>,

        /// Address
        #[arg(long)]
        address: Option<String>,
    },

    /// Show a customer's recent sales
    Customer {
        /// Customer identifier from customers.toml
        id: String,
    },

    /// Record a milk collection from a supplier
    Collect {
        /// Supplier identifier from suppliers.toml
        #[arg(short, long)]
        supplier: String,

        /// Liters delivered
        #[arg(short, long)]
        liters: f64,

        /// Fat percentage reading
        #[arg(short, long)]
        fat: f64,

        /// Milk type
        #[arg(long, value_enum, default_value_t = MilkType::Buffalo)]
        milk_type: MilkType,

        /// Collection session
        #[arg(long, value_enum, default_value_t = Session::Morning)]
        session: Session,

        /// Collection date (default: today)
        #[arg(short, long)]
        date: Option<String>,

        /// Free-text note
        #[arg(short, long)]
        note: Option<String>,
    },

    /// Record a milk sale to a customer
    Sell {
        /// Customer identifier from customers.toml
        #[arg(short, long)]
        customer: String,

        /// Liters sold
        #[arg(short, long)]
        liters: f64,

        /// Fat percentage reading
        #[arg(short, long)]
        fat: f64,

        /// Milk type
        #[arg(long, value_enum, default_value_t = MilkType::Buffalo)]
        milk_type: MilkType,

        /// Sale session
        #[arg(long, value_enum, default_value_t = Session::Morning)]
        session: Session,

        /// Sale date (default: today)
        #[arg(short, long)]
        date: Option<String>,

        /// Free-text note
        #[arg(short, long)]
        note: Option<String>,
    },

    /// Edit a collection (re-resolves rate and recomputes amount)
    EditCollection {
        /// Collection id from the daily listing
        id: u64,

        /// New liters
        #[arg(short, long)]
        liters: Option<f64>,

        /// New fat percentage
        #[arg(short, long)]
        fat: Option<f64>,

        /// New milk type
        #[arg(long, value_enum)]
        milk_type: Option<MilkType>,

        /// New session
        #[arg(long, value_enum)]
        session: Option<Session>,

        /// New date
        #[arg(short, long)]
        date: Option<String>,

        /// New note
        #[arg(short, long)]
        note: Option<String>,

        /// Remove the stored note
        #[arg(long, conflicts_with = "note")]
        clear_note: bool,
    },

    /// Delete a collection record
    DeleteCollection {
        /// Collection id from the daily listing
        id: u64,
    },

    /// Delete a sale record
    DeleteSale {
        /// Sale id from the daily-sales listing
        id: u64,
    },

    /// Record a payment made to a supplier
    Withdraw {
        /// Supplier identifier from suppliers.toml
        #[arg(short, long)]
        supplier: String,

        /// Amount paid (whole rupees)
        #[arg(short, long)]
        amount: i64,

        /// Payment date (default: today)
        #[arg(short, long)]
        date: Option<String>,

        /// Free-text note
        #[arg(short, long)]
        note: Option<String>,
    },

    /// Edit a withdrawal record
    EditWithdrawal {
        /// Withdrawal id
        id: u64,

        /// New amount
        #[arg(short, long)]
        amount: Option<i64>,

        /// New date
        #[arg(short, long)]
        date: Option<String>,

        /// New note
        #[arg(short, long)]
        note: Option<String>,

        /// Remove the stored note
        #[arg(long, conflicts_with = "note")]
        clear_note: bool,
    },

    /// Delete a withdrawal record
    DeleteWithdrawal {
        /// Withdrawal id
        id: u64,
    },

    /// List collections for a day
    Daily {
        /// Date to list (default: today)
        #[arg(short, long)]
        date: Option<String>,

        /// Only one session
        #[arg(long, value_enum)]
        session: Option<Session>,
    },

    /// List sales for a day
    DailySales {
        /// Date to list (default: today)
        #[arg(short, long)]
        date: Option<String>,

        /// Only one session
        #[arg(long, value_enum)]
        session: Option<Session>,
    },

    /// Monthly settlement report for all suppliers and customers
    Monthly {
        /// Month as YYYY-MM (default: current month)
        #[arg(short, long)]
        month: Option<String>,
    },

    /// Semi-monthly payment cycles for one supplier
    Cycles {
        /// Supplier identifier from suppliers.toml
        #[arg(short, long)]
        supplier: String,

        /// Month as YYYY-MM (default: current month)
        #[arg(short, long)]
        month: Option<String>,
    },

    /// Export a month's collections to CSV
    Export {
        /// Month as YYYY-MM (default: current month)
        #[arg(short, long)]
        month: Option<String>,

        /// Custom output file path (default: export dir/collections_YYYY-MM.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Export a month's per-supplier settlement summary to CSV
    ExportSummary {
        /// Month as YYYY-MM (default: current month)
        #[arg(short, long)]
        month: Option<String>,

        /// Custom output file path (default: export dir/summary_YYYY-MM.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Reprice buffalo records against the 2026 rate chart
    MigrateRates {
        /// Write the changes (default is a dry-run preview)
        #[arg(long)]
        apply: bool,
    },
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Determine config directory
    let cfg_dir = match cli.config_dir {
        Some(p) => p,
        None => config_dir()?,
    };

    match cli.command {
        Commands::Init => cmd_init(&cfg_dir),
        Commands::Status => cmd_status(&cfg_dir),
        Commands::Suppliers => cmd_suppliers(&cfg_dir),
        Commands::AddSupplier { id, name, mobile, address } => {
            cmd_add_supplier(&cfg_dir, id, name, mobile, address)
        }
        Commands::Supplier { id } => cmd_supplier(&cfg_dir, &id),
        Commands::Customers => cmd_customers(&cfg_dir),
        Commands::AddCustomer { id, name, mobile, address } => {
            cmd_add_customer(&cfg_dir, id, name, mobile, address)
        }
        Commands::Customer { id } => cmd_customer(&cfg_dir, &id),
        Commands::Collect {
            supplier,
            liters,
            fat,
            milk_type,
            session,
            date,
            note,
        } => cmd_collect(&cfg_dir, supplier, liters, fat, milk_type, session, date, note),
        Commands::Sell {
            customer,
            liters,
            fat,
            milk_type,
            session,
            date,
            note,
        } => cmd_sell(&cfg_dir, customer, liters, fat, milk_type, session, date, note),
        Commands::EditCollection {
            id,
            liters,
            fat,
            milk_type,
            session,
            date,
            note,
            clear_note,
        } => cmd_edit_collection(&cfg_dir, id, liters, fat, milk_type, session, date, note, clear_note),
        Commands::DeleteCollection { id } => cmd_delete_collection(&cfg_dir, id),
        Commands::DeleteSale { id } => cmd_delete_sale(&cfg_dir, id),
        Commands::Withdraw { supplier, amount, date, note } => {
            cmd_withdraw(&cfg_dir, &supplier, amount, date, note)
        }
        Commands::EditWithdrawal { id, amount, date, note, clear_note } => {
            cmd_edit_withdrawal(&cfg_dir, id, amount, date, note, clear_note)
        }
        Commands::DeleteWithdrawal { id } => cmd_delete_withdrawal(&cfg_dir, id),
        Commands::Daily { date, session } => cmd_daily(&cfg_dir, date, session),
        Commands::DailySales { date, session } => cmd_daily_sales(&cfg_dir, date, session),
        Commands::Monthly { month } => cmd_monthly(&cfg_dir, month),
        Commands::Cycles { supplier, month } => cmd_cycles(&cfg_dir, &supplier, month),
        Commands::Export { month, output } => cmd_export(&cfg_dir, month, output),
        Commands::ExportSummary { month, output } => cmd_export_summary(&cfg_dir, month, output),
        Commands::MigrateRates { apply } => cmd_migrate_rates(&cfg_dir, apply),
    }
}

/// Initialize config directory with template files
fn cmd_init(cfg_dir: &PathBuf) -> Result<()> {
    use std::fs;

    if cfg_dir.exists() {
        return Err(MilkboothError::AlreadyInitialized(cfg_dir.clone()));
    }

    fs::create_dir_all(cfg_dir)?;

    fs::write(cfg_dir.join("settings.toml"), SETTINGS_TEMPLATE)?;
    fs::write(cfg_dir.join("suppliers.toml"), SUPPLIERS_TEMPLATE)?;
    fs::write(cfg_dir.join("customers.toml"), CUSTOMERS_TEMPLATE)?;

    println!("Initialized milkbooth config at: {}", cfg_dir.display());
    println!();
    println!("Next steps:");
    println!(
        "  1. Set your booth details:  $EDITOR {}/settings.toml",
        cfg_dir.display()
    );
    println!(
        "  2. Add your suppliers:      $EDITOR {}/suppliers.toml",
        cfg_dir.display()
    );
    println!(
        "  3. Add your customers:      $EDITOR {}/customers.toml",
        cfg_dir.display()
    );
    println!();
    println!("Then record your first collection:");
    println!("  milkbooth collect --supplier <id> --liters <liters> --fat <fat>");

    Ok(())
}

fn require_config(cfg_dir: &PathBuf) -> Result<()> {
    if !cfg_dir.exists() {
        return Err(MilkboothError::ConfigNotFound(cfg_dir.clone()));
    }
    Ok(())
}

// Table row structs for tabled
#[derive(Tabled)]
struct EntityRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "MOBILE")]
    mobile: String,
    #[tabled(rename = "ADDRESS")]
    address: String,
}

#[derive(Tabled)]
struct DayRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "SUPPLIER")]
    entity: String,
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "SESSION")]
    session: String,
    #[tabled(rename = "LITERS")]
    liters: String,
    #[tabled(rename = "FAT")]
    fat: String,
    #[tabled(rename = "TYPE")]
    milk_type: String,
    #[tabled(rename = "RATE")]
    rate: String,
    #[tabled(rename = "AMOUNT")]
    amount: String,
}

#[derive(Tabled)]
struct SaleDayRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "CUSTOMER")]
    entity: String,
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "SESSION")]
    session: String,
    #[tabled(rename = "LITERS")]
    liters: String,
    #[tabled(rename = "FAT")]
    fat: String,
    #[tabled(rename = "TYPE")]
    milk_type: String,
    #[tabled(rename = "RATE")]
    rate: String,
    #[tabled(rename = "AMOUNT")]
    amount: String,
}

#[derive(Tabled)]
struct HistoryRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "DATE")]
    date: String,
    #[tabled(rename = "SESSION")]
    session: String,
    #[tabled(rename = "LITERS")]
    liters: String,
    #[tabled(rename = "FAT")]
    fat: String,
    #[tabled(rename = "TYPE")]
    milk_type: String,
    #[tabled(rename = "RATE")]
    rate: String,
    #[tabled(rename = "AMOUNT")]
    amount: String,
}

#[derive(Tabled)]
struct WithdrawalRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "DATE")]
    date: String,
    #[tabled(rename = "AMOUNT")]
    amount: String,
    #[tabled(rename = "NOTE")]
    note: String,
}

#[derive(Tabled)]
struct MonthlySupplierRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "LITERS")]
    liters: String,
    #[tabled(rename = "AMOUNT")]
    amount: String,
    #[tabled(rename = "WITHDRAWN")]
    withdrawn: String,
    #[tabled(rename = "BALANCE")]
    balance: String,
}

#[derive(Tabled)]
struct MonthlyCustomerRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "LITERS")]
    liters: String,
    #[tabled(rename = "AMOUNT")]
    amount: String,
}

#[derive(Tabled)]
struct CycleRow {
    #[tabled(rename = "CYCLE")]
    cycle: String,
    #[tabled(rename = "WINDOW")]
    window: String,
    #[tabled(rename = "SESSION")]
    session: String,
    #[tabled(rename = "COUNT")]
    count: String,
    #[tabled(rename = "LITERS")]
    liters: String,
    #[tabled(rename = "AMOUNT")]
    amount: String,
}

fn format_grouped_int(value: i64) -> String {
    let negative = value < 0;
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    let mut grouped: String = out.chars().rev().collect();
    if negative {
        grouped.insert(0, '-');
    }
    grouped
}

/// Whole-rupee amount with the currency symbol ("₹1,234", "-₹40").
fn money(symbol: &str, value: i64) -> String {
    if value < 0 {
        format!("-{}{}", symbol, format_grouped_int(-value))
    } else {
        format!("{}{}", symbol, format_grouped_int(value))
    }
}

/// Show booth status and record counts
fn cmd_status(cfg_dir: &PathBuf) -> Result<()> {
    require_config(cfg_dir)?;

    let settings = load_settings(cfg_dir)?;
    let suppliers = load_suppliers(cfg_dir)?;
    let customers = load_customers(cfg_dir)?;
    let ledger = load_ledger(cfg_dir)?;

    println!("Milkbooth Status");
    println!("{}", "-".repeat(50));
    println!("Config directory: {}", cfg_dir.display());
    println!("Booth:            {}", settings.booth.name);
    println!("Suppliers:        {}", suppliers.len());
    println!("Customers:        {}", customers.len());
    println!("Collections:      {}", ledger.collections.len());
    println!("Sales:            {}", ledger.sales.len());
    println!("Withdrawals:      {}", ledger.withdrawals.len());

    let month = clock::this_month();
    let month_liters: f64 = ledger
        .collections
        .iter()
        .filter(|c| config::in_month(&c.date, &month))
        .map(|c| c.liters)
        .sum();
    let month_amount: i64 = ledger
        .collections
        .iter()
        .filter(|c| config::in_month(&c.date, &month))
        .map(|c| c.amount)
        .sum();
    let month_withdrawn: i64 = ledger
        .withdrawals
        .iter()
        .filter(|w| config::in_month(&w.date, &month))
        .map(|w| w.amount)
        .sum();

    println!();
    println!("This month ({month}):");
    println!(
        "  Collected: {:.2} L for {}",
        month_liters,
        money(&settings.booth.currency_symbol, month_amount)
    );
    println!(
        "  Withdrawn: {}",
        money(&settings.booth.currency_symbol, month_withdrawn)
    );

    Ok(())
}

/// List configured suppliers
fn cmd_suppliers(cfg_dir: &PathBuf) -> Result<()> {
    require_config(cfg_dir)?;

    let suppliers = load_suppliers(cfg_dir)?;

    if suppliers.is_empty() {
        println!("No suppliers configured.");
        println!("Add suppliers to: {}/suppliers.toml", cfg_dir.display());
        return Ok(());
    }

    let mut sorted: Vec<_> = suppliers.iter().collect();
    sorted.sort_by_key(|(id, _)| config::id_sort_key(id));

    let rows: Vec<EntityRow> = sorted
        .iter()
        .map(|(id, s)| EntityRow {
            id: id.to_string(),
            name: s.name.clone(),
            mobile: s.mobile.clone().unwrap_or_default(),
            address: s.address.clone().unwrap_or_default(),
        })
        .collect();

    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{table}");

    Ok(())
}

/// Add a supplier
fn cmd_add_supplier(
    cfg_dir: &PathBuf,
    id: String,
    name: String,
    mobile: Option<String>,
    address: Option<String>,
) -> Result<()> {
    require_config(cfg_dir)?;

    let mut suppliers = load_suppliers(cfg_dir)?;
    if suppliers.contains_key(&id) {
        return Err(MilkboothError::SupplierExists(id));
    }

    suppliers.insert(id.clone(), Supplier { name: name.clone(), mobile, address });
    save_suppliers(cfg_dir, &suppliers)?;

    println!("Added supplier {id} - {name}");
    Ok(())
}

/// Show one supplier's recent records and balance
fn cmd_supplier(cfg_dir: &PathBuf, id: &str) -> Result<()> {
    require_config(cfg_dir)?;

    let settings = load_settings(cfg_dir)?;
    let suppliers = load_suppliers(cfg_dir)?;
    let supplier = suppliers
        .get(id)
        .ok_or_else(|| MilkboothError::SupplierNotFound(id.to_string()))?;
    let ledger = load_ledger(cfg_dir)?;
    let symbol = &settings.booth.currency_symbol;

    let mut collections = ledger.collections_for(id);
    collections.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| b.id.cmp(&a.id)));
    let mut withdrawals = ledger.withdrawals_for(id);
    withdrawals.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| b.id.cmp(&a.id)));

    println!("Supplier {id} - {}", supplier.name);
    if let Some(mobile) = &supplier.mobile {
        println!("Mobile: {mobile}");
    }
    println!();

    if collections.is_empty() {
        println!("No collections recorded.");
    } else {
        let rows: Vec<HistoryRow> = collections
            .iter()
            .take(20)
            .map(|c| HistoryRow {
                id: c.id,
                date: c.date.clone(),
                session: c.session.to_string(),
                liters: format!("{:.2}", c.liters),
                fat: format!("{:.1}", c.fat),
                milk_type: c.milk_type.to_string(),
                rate: format!("{:.2}", c.rate_per_liter),
                amount: money(symbol, c.amount),
            })
            .collect();
        let table = Table::new(rows).with(Style::rounded()).to_string();
        println!("{table}");
    }

    if !withdrawals.is_empty() {
        println!();
        println!("Withdrawals:");
        let rows: Vec<WithdrawalRow> = withdrawals
            .iter()
            .take(10)
            .map(|w| WithdrawalRow {
                id: w.id,
                date: w.date.clone(),
                amount: money(symbol, w.amount),
                note: w.note.clone().unwrap_or_default(),
            })
            .collect();
        let table = Table::new(rows).with(Style::rounded()).to_string();
        println!("{table}");
    }

    let total_liters: f64 = collections.iter().map(|c| c.liters).sum();
    let total_amount: i64 = collections.iter().map(|c| c.amount).sum();
    let total_withdrawn: i64 = withdrawals.iter().map(|w| w.amount).sum();
    let balance = reconcile(&collections, &withdrawals);

    println!();
    println!("Total collected: {:.2} L for {}", total_liters, money(symbol, total_amount));
    println!("Total withdrawn: {}", money(symbol, total_withdrawn));
    println!("Balance:         {}", money(symbol, balance));

    Ok(())
}

/// List configured customers
fn cmd_customers(cfg_dir: &PathBuf) -> Result<()> {
    require_config(cfg_dir)?;

    let customers = load_customers(cfg_dir)?;

    if customers.is_empty() {
        println!("No customers configured.");
        println!("Add customers to: {}/customers.toml", cfg_dir.display());
        return Ok(());
    }

    let mut sorted: Vec<_> = customers.iter().collect();
    sorted.sort_by_key(|(id, _)| config::id_sort_key(id));

    let rows: Vec<EntityRow> = sorted
        .iter()
        .map(|(id, c)| EntityRow {
            id: id.to_string(),
            name: c.name.clone(),
            mobile: c.mobile.clone().unwrap_or_default(),
            address: c.address.clone().unwrap_or_default(),
        })
        .collect();

    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{table}");

    Ok(())
}

/// Add a customer
fn cmd_add_customer(
    cfg_dir: &PathBuf,
    id: String,
    name: String,
    mobile: Option<String>,
    address: Option<String>,
) -> Result<()> {
    require_config(cfg_dir)?;

    let mut customers = load_customers(cfg_dir)?;
    if customers.contains_key(&id) {
        return Err(MilkboothError::CustomerExists(id));
    }

    customers.insert(id.clone(), Customer { name: name.clone(), mobile, address });
    save_customers(cfg_dir, &customers)?;

    println!("Added customer {id} - {name}");
    Ok(())
}

/// Show one customer's recent sales
fn cmd_customer(cfg_dir: &PathBuf, id: &str) -> Result<()> {
    require_config(cfg_dir)?;

    let settings = load_settings(cfg_dir)?;
    let customers = load_customers(cfg_dir)?;
    let customer = customers
        .get(id)
        .ok_or_else(|| MilkboothError::CustomerNotFound(id.to_string()))?;
    let ledger = load_ledger(cfg_dir)?;
    let symbol = &settings.booth.currency_symbol;

    let mut sales = ledger.sales_for(id);
    sales.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| b.id.cmp(&a.id)));

    println!("Customer {id} - {}", customer.name);
    println!();

    if sales.is_empty() {
        println!("No sales recorded.");
        return Ok(());
    }

    let rows: Vec<HistoryRow> = sales
        .iter()
        .take(20)
        .map(|s| HistoryRow {
            id: s.id,
            date: s.date.clone(),
            session: s.session.to_string(),
            liters: format!("{:.2}", s.liters),
            fat: format!("{:.1}", s.fat),
            milk_type: s.milk_type.to_string(),
            rate: format!("{:.2}", s.rate_per_liter),
            amount: money(symbol, s.amount),
        })
        .collect();
    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{table}");

    let total_liters: f64 = sales.iter().map(|s| s.liters).sum();
    let total_amount: i64 = sales.iter().map(|s| s.amount).sum();
    println!();
    println!("Total sold: {:.2} L for {}", total_liters, money(symbol, total_amount));

    Ok(())
}

/// Send a notification if a gateway and mobile number are configured.
/// Delivery failure never unwinds a committed record.
fn notify_mobile(gateway_url: Option<&str>, mobile: Option<&str>, message: &str) {
    let Some(url) = gateway_url else { return };
    let Some(phone) = mobile.and_then(notify::format_phone) else {
        return;
    };

    let notifier = GatewayNotifier::new(url);
    if let Err(e) = notifier.send(&phone, message) {
        eprintln!("Warning: notification not sent: {e}");
    }
}

/// Record a milk collection
#[allow(clippy::too_many_arguments)]
fn cmd_collect(
    cfg_dir: &PathBuf,
    supplier: String,
    liters: f64,
    fat: f64,
    milk_type: MilkType,
    session: Session,
    date: Option<String>,
    note: Option<String>,
) -> Result<()> {
    require_config(cfg_dir)?;

    let settings = load_settings(cfg_dir)?;
    let symbol = settings.booth.currency_symbol.clone();

    let input = DeliveryInput {
        entity_id: supplier,
        date: date.unwrap_or_else(clock::today),
        session,
        liters,
        fat,
        milk_type,
        note,
    };
    let record = records::add_collection(cfg_dir, input)?;

    let suppliers = load_suppliers(cfg_dir)?;
    let name = suppliers
        .get(&record.supplier)
        .map(|s| s.name.clone())
        .unwrap_or_else(|| record.supplier.clone());

    println!("Recorded collection #{} from {}", record.id, name);
    println!("  Date:    {} ({})", record.date, record.session);
    println!("  Milk:    {}, {:.2} L @ fat {:.1}", record.milk_type, record.liters, record.fat);
    println!("  Rate:    {}{:.2}/L", symbol, record.rate_per_liter);
    println!("  Amount:  {}", money(&symbol, record.amount));

    let message = format!(
        "{}: collection {:.2} L @ {}{:.2}/L = {} ({} {})",
        settings.booth.name,
        record.liters,
        symbol,
        record.rate_per_liter,
        money(&symbol, record.amount),
        record.date,
        record.session
    );
    notify_mobile(
        settings.notify.gateway_url.as_deref(),
        suppliers.get(&record.supplier).and_then(|s| s.mobile.as_deref()),
        &message,
    );

    Ok(())
}

/// Record a milk sale
#[allow(clippy::too_many_arguments)]
fn cmd_sell(
    cfg_dir: &PathBuf,
    customer: String,
    liters: f64,
    fat: f64,
    milk_type: MilkType,
    session: Session,
    date: Option<String>,
    note: Option<String>,
) -> Result<()> {
    require_config(cfg_dir)?;

    let settings = load_settings(cfg_dir)?;
    let symbol = settings.booth.currency_symbol;

    let input = DeliveryInput {
        entity_id: customer,
        date: date.unwrap_or_else(clock::today),
        session,
        liters,
        fat,
        milk_type,
        note,
    };
    let record = records::add_sale(cfg_dir, input)?;

    let customers = load_customers(cfg_dir)?;
    let name = customers
        .get(&record.customer)
        .map(|c| c.name.clone())
        .unwrap_or_else(|| record.customer.clone());

    println!("Recorded sale #{} to {}", record.id, name);
    println!("  Date:    {} ({})", record.date, record.session);
    println!("  Milk:    {}, {:.2} L @ fat {:.1}", record.milk_type, record.liters, record.fat);
    println!("  Rate:    {}{:.2}/L", symbol, record.rate_per_liter);
    println!("  Amount:  {}", money(&symbol, record.amount));

    Ok(())
}

/// Edit a collection record
#[allow(clippy::too_many_arguments)]
fn cmd_edit_collection(
    cfg_dir: &PathBuf,
    id: u64,
    liters: Option<f64>,
    fat: Option<f64>,
    milk_type: Option<MilkType>,
    session: Option<Session>,
    date: Option<String>,
    note: Option<String>,
    clear_note: bool,
) -> Result<()> {
    require_config(cfg_dir)?;

    let settings = load_settings(cfg_dir)?;
    let symbol = settings.booth.currency_symbol;

    let edit = DeliveryEdit { date, session, liters, fat, milk_type, note, clear_note };
    let record = records::edit_collection(cfg_dir, id, edit)?;

    println!("Updated collection #{}", record.id);
    println!("  Date:    {} ({})", record.date, record.session);
    println!("  Milk:    {}, {:.2} L @ fat {:.1}", record.milk_type, record.liters, record.fat);
    println!("  Rate:    {}{:.2}/L", symbol, record.rate_per_liter);
    println!("  Amount:  {}", money(&symbol, record.amount));

    Ok(())
}

/// Delete a collection record
fn cmd_delete_collection(cfg_dir: &PathBuf, id: u64) -> Result<()> {
    require_config(cfg_dir)?;

    let settings = load_settings(cfg_dir)?;
    let removed = records::delete_collection(cfg_dir, id)?;
    println!(
        "Deleted collection #{} ({}, {} from supplier {})",
        removed.id,
        removed.date,
        money(&settings.booth.currency_symbol, removed.amount),
        removed.supplier
    );
    Ok(())
}

/// Delete a sale record
fn cmd_delete_sale(cfg_dir: &PathBuf, id: u64) -> Result<()> {
    require_config(cfg_dir)?;

    let settings = load_settings(cfg_dir)?;
    let removed = records::delete_sale(cfg_dir, id)?;
    println!(
        "Deleted sale #{} ({}, {} to customer {})",
        removed.id,
        removed.date,
        money(&settings.booth.currency_symbol, removed.amount),
        removed.customer
    );
    Ok(())
}

/// Record a withdrawal (payment to a supplier)
fn cmd_withdraw(
    cfg_dir: &PathBuf,
    supplier: &str,
    amount: i64,
    date: Option<String>,
    note: Option<String>,
) -> Result<()> {
    require_config(cfg_dir)?;

    let settings = load_settings(cfg_dir)?;
    let symbol = settings.booth.currency_symbol.clone();

    let record = records::add_withdrawal(cfg_dir, supplier, amount, date, note)?;

    let suppliers = load_suppliers(cfg_dir)?;
    let name = suppliers
        .get(supplier)
        .map(|s| s.name.clone())
        .unwrap_or_else(|| supplier.to_string());

    println!(
        "Recorded withdrawal #{} of {} for {} ({})",
        record.id,
        money(&symbol, record.amount),
        name,
        record.date
    );

    let message = format!(
        "{}: payment of {} recorded on {}",
        settings.booth.name,
        money(&symbol, record.amount),
        record.date
    );
    notify_mobile(
        settings.notify.gateway_url.as_deref(),
        suppliers.get(supplier).and_then(|s| s.mobile.as_deref()),
        &message,
    );

    Ok(())
}

/// Edit a withdrawal record
fn cmd_edit_withdrawal(
    cfg_dir: &PathBuf,
    id: u64,
    amount: Option<i64>,
    date: Option<String>,
    note: Option<String>,
    clear_note: bool,
) -> Result<()> {
    require_config(cfg_dir)?;

    let settings = load_settings(cfg_dir)?;
    let record = records::edit_withdrawal(cfg_dir, id, amount, date, note, clear_note)?;
    println!(
        "Updated withdrawal #{}: {} on {}",
        record.id,
        money(&settings.booth.currency_symbol, record.amount),
        record.date
    );
    Ok(())
}

/// Delete a withdrawal record
fn cmd_delete_withdrawal(cfg_dir: &PathBuf, id: u64) -> Result<()> {
    require_config(cfg_dir)?;

    let settings = load_settings(cfg_dir)?;
    let removed = records::delete_withdrawal(cfg_dir, id)?;
    println!(
        "Deleted withdrawal #{} ({}, {} for supplier {})",
        removed.id,
        removed.date,
        money(&settings.booth.currency_symbol, removed.amount),
        removed.supplier
    );
    Ok(())
}

fn session_rank(session: Session) -> u8 {
    match session {
        Session::Morning => 0,
        Session::Evening => 1,
    }
}

/// List collections for one day
fn cmd_daily(cfg_dir: &PathBuf, date: Option<String>, session: Option<Session>) -> Result<()> {
    require_config(cfg_dir)?;

    let settings = load_settings(cfg_dir)?;
    let suppliers = load_suppliers(cfg_dir)?;
    let ledger = load_ledger(cfg_dir)?;
    let symbol = &settings.booth.currency_symbol;

    let date = match date {
        Some(d) => records::normalize_date(&d)?,
        None => clock::today(),
    };

    let mut rows: Vec<&Collection> = ledger
        .collections
        .iter()
        .filter(|c| c.date == date)
        .filter(|c| session.map_or(true, |s| c.session == s))
        .collect();
    rows.sort_by_key(|c| (session_rank(c.session), config::id_sort_key(&c.supplier)));

    let session_label = match session {
        Some(s) => s.to_string(),
        None => "all sessions".to_string(),
    };
    println!("Collections for {date} ({session_label})");

    if rows.is_empty() {
        println!("No collections recorded.");
        return Ok(());
    }

    let table_rows: Vec<DayRow> = rows
        .iter()
        .map(|c| DayRow {
            id: c.id,
            entity: c.supplier.clone(),
            name: suppliers
                .get(&c.supplier)
                .map(|s| s.name.clone())
                .unwrap_or_else(|| c.supplier.clone()),
            session: c.session.to_string(),
            liters: format!("{:.2}", c.liters),
            fat: format!("{:.1}", c.fat),
            milk_type: c.milk_type.to_string(),
            rate: format!("{:.2}", c.rate_per_liter),
            amount: money(symbol, c.amount),
        })
        .collect();
    let table = Table::new(table_rows).with(Style::rounded()).to_string();
    println!("{table}");

    let total_liters: f64 = rows.iter().map(|c| c.liters).sum();
    let total_amount: i64 = rows.iter().map(|c| c.amount).sum();
    let avg_fat: f64 = rows.iter().map(|c| c.fat).sum::<f64>() / rows.len() as f64;
    println!();
    println!(
        "Total: {:.2} L, {} (avg fat {:.1})",
        total_liters,
        money(symbol, total_amount),
        avg_fat
    );

    Ok(())
}

/// List sales for one day
fn cmd_daily_sales(cfg_dir: &PathBuf, date: Option<String>, session: Option<Session>) -> Result<()> {
    require_config(cfg_dir)?;

    let settings = load_settings(cfg_dir)?;
    let customers = load_customers(cfg_dir)?;
    let ledger = load_ledger(cfg_dir)?;
    let symbol = &settings.booth.currency_symbol;

    let date = match date {
        Some(d) => records::normalize_date(&d)?,
        None => clock::today(),
    };

    let mut rows: Vec<&Sale> = ledger
        .sales
        .iter()
        .filter(|s| s.date == date)
        .filter(|s| session.map_or(true, |f| s.session == f))
        .collect();
    rows.sort_by_key(|s| (session_rank(s.session), config::id_sort_key(&s.customer)));

    let session_label = match session {
        Some(s) => s.to_string(),
        None => "all sessions".to_string(),
    };
    println!("Sales for {date} ({session_label})");

    if rows.is_empty() {
        println!("No sales recorded.");
        return Ok(());
    }

    let table_rows: Vec<SaleDayRow> = rows
        .iter()
        .map(|s| SaleDayRow {
            id: s.id,
            entity: s.customer.clone(),
            name: customers
                .get(&s.customer)
                .map(|c| c.name.clone())
                .unwrap_or_else(|| s.customer.clone()),
            session: s.session.to_string(),
            liters: format!("{:.2}", s.liters),
            fat: format!("{:.1}", s.fat),
            milk_type: s.milk_type.to_string(),
            rate: format!("{:.2}", s.rate_per_liter),
            amount: money(symbol, s.amount),
        })
        .collect();
    let table = Table::new(table_rows).with(Style::rounded()).to_string();
    println!("{table}");

    let total_liters: f64 = rows.iter().map(|s| s.liters).sum();
    let total_amount: i64 = rows.iter().map(|s| s.amount).sum();
    let avg_fat: f64 = rows.iter().map(|s| s.fat).sum::<f64>() / rows.len() as f64;
    println!();
    println!(
        "Total: {:.2} L, {} (avg fat {:.1})",
        total_liters,
        money(symbol, total_amount),
        avg_fat
    );

    Ok(())
}

/// Monthly settlement report
fn cmd_monthly(cfg_dir: &PathBuf, month: Option<String>) -> Result<()> {
    require_config(cfg_dir)?;

    let settings = load_settings(cfg_dir)?;
    let suppliers = load_suppliers(cfg_dir)?;
    let customers = load_customers(cfg_dir)?;
    let ledger = load_ledger(cfg_dir)?;
    let symbol = &settings.booth.currency_symbol;

    let month = month.unwrap_or_else(clock::this_month);
    records::parse_month(&month)?;

    let report = report::monthly_report(&suppliers, &customers, &ledger, &month);

    println!("Monthly report for {month}");
    println!();

    if report.suppliers.is_empty() {
        println!("No collections recorded for {month}.");
    } else {
        let rows: Vec<MonthlySupplierRow> = report
            .suppliers
            .iter()
            .map(|r| MonthlySupplierRow {
                id: r.supplier_id.clone(),
                name: r.name.clone(),
                liters: format!("{:.2}", r.total_liters),
                amount: money(symbol, r.total_amount),
                withdrawn: money(symbol, r.withdrawn),
                balance: money(symbol, r.balance),
            })
            .collect();
        let table = Table::new(rows).with(Style::rounded()).to_string();
        println!("{table}");
        println!();
        println!(
            "Collections: {:.2} L for {}, withdrawn {}, outstanding {}",
            report.total_liters,
            money(symbol, report.total_amount),
            money(symbol, report.total_withdrawn),
            money(symbol, report.total_amount - report.total_withdrawn)
        );
    }

    if !report.customers.is_empty() {
        println!();
        println!("Sales:");
        let rows: Vec<MonthlyCustomerRow> = report
            .customers
            .iter()
            .map(|r| MonthlyCustomerRow {
                id: r.customer_id.clone(),
                name: r.name.clone(),
                liters: format!("{:.2}", r.total_liters),
                amount: money(symbol, r.total_amount),
            })
            .collect();
        let table = Table::new(rows).with(Style::rounded()).to_string();
        println!("{table}");
        println!();
        println!("Total sales: {}", money(symbol, report.total_sales));
    }

    Ok(())
}

fn cycle_rows(label: &str, cycle: &Cycle, symbol: &str) -> Vec<CycleRow> {
    let window = format!("{} to {}", cycle.start, cycle.end);
    vec![
        CycleRow {
            cycle: label.to_string(),
            window: window.clone(),
            session: "morning".to_string(),
            count: cycle.morning.count.to_string(),
            liters: format!("{:.2}", cycle.morning.liters),
            amount: money(symbol, cycle.morning.amount),
        },
        CycleRow {
            cycle: label.to_string(),
            window: window.clone(),
            session: "evening".to_string(),
            count: cycle.evening.count.to_string(),
            liters: format!("{:.2}", cycle.evening.liters),
            amount: money(symbol, cycle.evening.amount),
        },
        CycleRow {
            cycle: label.to_string(),
            window,
            session: "total".to_string(),
            count: (cycle.morning.count + cycle.evening.count).to_string(),
            liters: format!("{:.2}", cycle.total_liters),
            amount: money(symbol, cycle.total_amount),
        },
    ]
}

/// Semi-monthly payment cycles for one supplier
fn cmd_cycles(cfg_dir: &PathBuf, supplier_id: &str, month: Option<String>) -> Result<()> {
    require_config(cfg_dir)?;

    let settings = load_settings(cfg_dir)?;
    let suppliers = load_suppliers(cfg_dir)?;
    let supplier = suppliers
        .get(supplier_id)
        .ok_or_else(|| MilkboothError::SupplierNotFound(supplier_id.to_string()))?;
    let ledger = load_ledger(cfg_dir)?;
    let symbol = &settings.booth.currency_symbol;

    let month = month.unwrap_or_else(clock::this_month);
    let (year, month_num) = records::parse_month(&month)?;

    let collections: Vec<Collection> = ledger
        .collections_for(supplier_id)
        .into_iter()
        .cloned()
        .collect();
    let cycles = calculate_payment_cycles(&collections, year, month_num);

    println!("Payment cycles for {} - {} ({month})", supplier_id, supplier.name);
    println!();

    let mut rows = cycle_rows("1", &cycles.cycle_1, symbol);
    rows.extend(cycle_rows("2", &cycles.cycle_2, symbol));
    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{table}");

    let month_total = cycles.cycle_1.total_amount + cycles.cycle_2.total_amount;
    let month_withdrawn: i64 = ledger
        .withdrawals_for(supplier_id)
        .iter()
        .filter(|w| config::in_month(&w.date, &month))
        .map(|w| w.amount)
        .sum();

    println!();
    println!("Month total: {}", money(symbol, month_total));
    println!("Withdrawn:   {}", money(symbol, month_withdrawn));
    println!("Balance:     {}", money(symbol, month_total - month_withdrawn));

    Ok(())
}

/// Export a month's collections to CSV
fn cmd_export(cfg_dir: &PathBuf, month: Option<String>, output: Option<PathBuf>) -> Result<()> {
    require_config(cfg_dir)?;

    let settings = load_settings(cfg_dir)?;
    let suppliers = load_suppliers(cfg_dir)?;
    let ledger = load_ledger(cfg_dir)?;

    let month = month.unwrap_or_else(clock::this_month);
    records::parse_month(&month)?;

    let rows = export::collection_rows(&suppliers, &ledger, &month);
    if rows.is_empty() {
        println!("No collections found for {month}.");
        return Ok(());
    }

    let path = match output {
        Some(p) => p,
        None => {
            let output_dir = resolve_output_dir(&settings.export.output_dir, cfg_dir);
            std::fs::create_dir_all(&output_dir)?;
            output_dir.join(format!("collections_{month}.csv"))
        }
    };

    export::write_csv(&path, &rows)?;

    println!("Exported {} collection rows to {}", rows.len(), path.display());
    Ok(())
}

/// Export a month's settlement summary to CSV
fn cmd_export_summary(
    cfg_dir: &PathBuf,
    month: Option<String>,
    output: Option<PathBuf>,
) -> Result<()> {
    require_config(cfg_dir)?;

    let settings = load_settings(cfg_dir)?;
    let suppliers = load_suppliers(cfg_dir)?;
    let ledger = load_ledger(cfg_dir)?;

    let month = month.unwrap_or_else(clock::this_month);
    records::parse_month(&month)?;

    let rows = export::summary_rows(&suppliers, &ledger, &month);
    if rows.is_empty() {
        println!("No collections found for {month}.");
        return Ok(());
    }

    let path = match output {
        Some(p) => p,
        None => {
            let output_dir = resolve_output_dir(&settings.export.output_dir, cfg_dir);
            std::fs::create_dir_all(&output_dir)?;
            output_dir.join(format!("summary_{month}.csv"))
        }
    };

    export::write_csv(&path, &rows)?;

    println!("Exported {} summary rows to {}", rows.len(), path.display());
    Ok(())
}

/// Reprice buffalo records against the 2026 chart
fn cmd_migrate_rates(cfg_dir: &PathBuf, apply: bool) -> Result<()> {
    require_config(cfg_dir)?;

    let settings = load_settings(cfg_dir)?;
    let symbol = &settings.booth.currency_symbol;

    let outcome = records::migrate_buffalo_rates(cfg_dir, apply)?;

    if outcome.fixes.is_empty() {
        println!("All buffalo rates already match the current chart.");
        return Ok(());
    }

    for fix in &outcome.fixes {
        println!(
            "{} #{} ({}) {} fat {:.1}: rate {:.2} -> {:.2}, amount {} -> {}",
            fix.kind,
            fix.id,
            fix.entity,
            fix.date,
            fix.fat,
            fix.old_rate,
            fix.new_rate,
            money(symbol, fix.old_amount),
            money(symbol, fix.new_amount)
        );
    }

    println!();
    if apply {
        println!(
            "Updated {} collections and {} sales",
            outcome.collections_updated, outcome.sales_updated
        );
    } else {
        println!(
            "Would update {} collections and {} sales (re-run with --apply to write)",
            outcome.collections_updated, outcome.sales_updated
        );
    }
    println!("Total amount difference: {}", money(symbol, outcome.total_difference));

    Ok(())
}
