use chrono::{Datelike, Local};
use clap::{Parser, Subcommand};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use tabled::{settings::Style, Table, Tabled};
use tracing_subscriber::EnvFilter;

use waterdesk::api::{ApiClient, Order, OrderStatus};
use waterdesk::auth::{Route, Session};
use waterdesk::config::{
    config_dir, load_config, resolve_output_dir, Config, SessionStore, CONFIG_TEMPLATE,
};
use waterdesk::error::{DashError, Result};
use waterdesk::invoice::{format_date, format_datetime, format_grouped, format_quantity, format_vnd};
use waterdesk::{invoice, pdf, report};

/// Environment variable read by `login` when --password is not given
const PASSWORD_ENV: &str = "WATERDESK_PASSWORD";

#[derive(Parser)]
#[command(name = "waterdesk")]
#[command(version, about = "Admin console for a bottled-water distribution business", long_about = None)]
struct Cli {
    /// Path to config directory (default: XDG config dir or ~/.waterdesk)
    #[arg(short = 'C', long, global = true)]
    config_dir: Option<PathBuf>,

    /// API base URL (overrides config.toml and WATERDESK_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Show debug logs on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize config directory with a template config.toml
    Init,

    /// Sign in and remember the session
    Login {
        username: String,

        /// Password (default: WATERDESK_PASSWORD, then prompt)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Forget the current session
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Today's orders, revenue and headline stats
    Dashboard,

    /// List orders
    Orders {
        /// Only orders placed today
        #[arg(long)]
        today: bool,

        /// Filter by status (completed, pending, canceled)
        #[arg(long)]
        status: Option<String>,

        /// Number of orders to show (default: all)
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Show one order with its line items
    Order { id: String },

    /// Change an order's status
    SetStatus {
        id: String,
        /// completed, pending, or canceled
        status: String,
    },

    /// Record a payment against an order
    Pay { id: String, amount: f64 },

    /// Record returned containers for an order
    ReturnContainers { id: String, units: i64 },

    /// List customers with their debts
    Customers {
        /// Only customers who owe money or containers
        #[arg(long)]
        in_debt: bool,
    },

    /// List user accounts
    Users,

    /// List payment transactions
    Transactions {
        /// Number of transactions to show (default: all)
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Current stock per product
    Inventory,

    /// Daily, weekly and monthly revenue
    Revenue {
        /// Month to report (default: current)
        #[arg(long)]
        month: Option<u32>,

        /// Year to report (default: current)
        #[arg(long)]
        year: Option<i32>,
    },

    /// Generate a sales invoice for an order
    Invoice {
        id: String,

        /// Custom output file path (default: output_dir/invoice-<id>-<timestamp>.pdf)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Open the invoice in the system viewer for printing
        #[arg(long)]
        print: bool,

        /// Write the Typst source and data to this path instead of compiling
        #[arg(long, value_name = "FILE.typ")]
        typst_source: Option<PathBuf>,
    },
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

/// Everything a command needs: config, the session, and where it is stored
struct Shell {
    cfg_dir: PathBuf,
    config: Config,
    store: SessionStore,
    session: Session,
}

impl Shell {
    fn api(&self) -> ApiClient {
        ApiClient::new(&self.config.api).with_token(self.session.token().map(str::to_string))
    }

    /// Refuse the command unless the session may open `route`
    fn open(&self, route: Route) -> Result<ApiClient> {
        self.session.guard(route)?;
        Ok(self.api())
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let cfg_dir = match cli.config_dir {
        Some(p) => p,
        None => config_dir()?,
    };

    let mut config = load_config(&cfg_dir)?;
    if let Some(url) = cli.api_url {
        config.api.base_url = url;
    }

    let store = SessionStore::new(&cfg_dir);
    let session = Session::load(&store)?;

    let mut shell = Shell {
        cfg_dir,
        config,
        store,
        session,
    };

    match cli.command {
        Commands::Init => cmd_init(&shell.cfg_dir),
        Commands::Login { username, password } => cmd_login(&mut shell, &username, password),
        Commands::Logout => cmd_logout(&mut shell),
        Commands::Whoami => cmd_whoami(&shell),
        Commands::Dashboard => cmd_dashboard(&shell),
        Commands::Orders {
            today,
            status,
            limit,
        } => cmd_orders(&shell, today, status, limit),
        Commands::Order { id } => cmd_order(&shell, &id),
        Commands::SetStatus { id, status } => cmd_set_status(&shell, &id, &status),
        Commands::Pay { id, amount } => cmd_pay(&shell, &id, amount),
        Commands::ReturnContainers { id, units } => cmd_return_containers(&shell, &id, units),
        Commands::Customers { in_debt } => cmd_customers(&shell, in_debt),
        Commands::Users => cmd_users(&shell),
        Commands::Transactions { limit } => cmd_transactions(&shell, limit),
        Commands::Inventory => cmd_inventory(&shell),
        Commands::Revenue { month, year } => cmd_revenue(&shell, month, year),
        Commands::Invoice {
            id,
            output,
            print,
            typst_source,
        } => cmd_invoice(&shell, &id, output, print, typst_source),
    }
}

/// Initialize config directory with the template config
fn cmd_init(cfg_dir: &Path) -> Result<()> {
    use std::fs;

    if cfg_dir.exists() {
        return Err(DashError::AlreadyInitialized(cfg_dir.to_path_buf()));
    }

    fs::create_dir_all(cfg_dir)?;
    fs::create_dir_all(cfg_dir.join("invoices"))?;
    fs::write(cfg_dir.join("config.toml"), CONFIG_TEMPLATE)?;

    println!("Initialized waterdesk config at: {}", cfg_dir.display());
    println!();
    println!("Next steps:");
    println!(
        "  1. Point it at your API and set the letterhead:  $EDITOR {}/config.toml",
        cfg_dir.display()
    );
    println!("  2. Sign in:  waterdesk login <username>");

    Ok(())
}

fn read_password(explicit: Option<String>) -> Result<String> {
    if let Some(p) = explicit {
        return Ok(p);
    }
    if let Ok(p) = std::env::var(PASSWORD_ENV) {
        return Ok(p);
    }

    eprint!("Password: ");
    std::io::stderr().flush()?;
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn cmd_login(shell: &mut Shell, username: &str, password: Option<String>) -> Result<()> {
    let password = read_password(password)?;
    let api = shell.api();
    let home = shell
        .session
        .login(&api, &shell.store, username, &password)?;

    if let Some(user) = shell.session.user() {
        println!("Logged in as {} ({})", user.name, user.role);
    }
    println!("Start with: waterdesk {}", home.command());
    Ok(())
}

fn cmd_logout(shell: &mut Shell) -> Result<()> {
    let next = shell.session.logout(&shell.store)?;
    println!("Logged out. Run 'waterdesk {} <username>' to sign in again.", next.command());
    Ok(())
}

fn cmd_whoami(shell: &Shell) -> Result<()> {
    let user = shell.session.user().ok_or(DashError::NotAuthenticated)?;
    println!("{} (@{})", user.name, user.username);
    println!("Role: {}", user.role);
    println!("API:  {}", shell.config.api.base_url);
    Ok(())
}

// Table row structs for tabled
#[derive(Tabled)]
struct OrderRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "DATE")]
    date: String,
    #[tabled(rename = "CUSTOMER")]
    customer: String,
    #[tabled(rename = "STATUS")]
    status: String,
    #[tabled(rename = "TOTAL")]
    total: String,
    #[tabled(rename = "PAID")]
    paid: String,
    #[tabled(rename = "DEBT")]
    debt: String,
}

impl From<&Order> for OrderRow {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id.clone(),
            date: order
                .order_date
                .map(|ts| format_datetime(&ts.with_timezone(&Local)))
                .unwrap_or_default(),
            customer: order.customer_name.clone(),
            status: order.status.label().to_string(),
            total: format_vnd(order.total_amount),
            paid: format_vnd(order.paid_amount),
            debt: format_vnd(order.debt_remaining),
        }
    }
}

#[derive(Tabled)]
struct ItemRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "PRODUCT")]
    product: String,
    #[tabled(rename = "QTY")]
    quantity: String,
    #[tabled(rename = "UNIT PRICE")]
    unit_price: String,
    #[tabled(rename = "TOTAL")]
    total: String,
}

#[derive(Tabled)]
struct CustomerRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "TYPE")]
    kind: String,
    #[tabled(rename = "PHONE")]
    phone: String,
    #[tabled(rename = "DEBT")]
    debt: String,
    #[tabled(rename = "CONTAINERS OWED")]
    returnable_debt: String,
}

#[derive(Tabled)]
struct UserRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "USERNAME")]
    username: String,
    #[tabled(rename = "ROLE")]
    role: String,
}

#[derive(Tabled)]
struct TransactionRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "DATE")]
    date: String,
    #[tabled(rename = "ORDER")]
    order: String,
    #[tabled(rename = "CUSTOMER")]
    customer: String,
    #[tabled(rename = "TYPE")]
    kind: String,
    #[tabled(rename = "AMOUNT")]
    amount: String,
}

#[derive(Tabled)]
struct StockRow {
    #[tabled(rename = "PRODUCT ID")]
    id: String,
    #[tabled(rename = "PRODUCT")]
    name: String,
    #[tabled(rename = "STOCK")]
    stock: String,
}

#[derive(Tabled)]
struct RevenueRow {
    #[tabled(rename = "DATE")]
    date: String,
    #[tabled(rename = "REVENUE")]
    total: String,
}

fn print_table<T: Tabled>(rows: Vec<T>) {
    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{table}");
}

fn cmd_dashboard(shell: &Shell) -> Result<()> {
    let api = shell.open(Route::Dashboard)?;
    let today = Local::now().date_naive();

    let stats = report::or_empty(api.dashboard_stats(), "dashboard stats");
    let orders = report::or_empty(api.orders(), "orders");
    let daily = report::or_empty(api.daily_revenue(today.month(), today.year()), "daily revenue");

    let todays = report::orders_today(&orders);

    println!("Dashboard - {}", format_date(today));
    println!("{}", "-".repeat(50));
    println!("Orders:            {}", format_grouped(stats.total_orders));
    println!("Pending orders:    {}", format_grouped(stats.pending_orders));
    println!("Customers:         {}", format_grouped(stats.total_customers));
    println!("Total revenue:     {}", format_vnd(stats.total_revenue));
    println!("Outstanding debt:  {}", format_vnd(stats.total_debt));
    println!();
    println!("Revenue today:     {}", format_vnd(report::daily_revenue(&daily, today)));
    println!("Revenue this week: {}", format_vnd(report::weekly_revenue(&daily, today)));
    println!("Revenue this month: {}", format_vnd(report::monthly_revenue(&daily)));
    println!();

    if todays.is_empty() {
        println!("No orders today.");
    } else {
        println!("Orders today ({}):", todays.len());
        print_table(todays.into_iter().map(OrderRow::from).collect());
    }

    Ok(())
}

fn cmd_orders(
    shell: &Shell,
    today: bool,
    status: Option<String>,
    limit: Option<usize>,
) -> Result<()> {
    let status = status
        .map(|s| OrderStatus::parse(&s).ok_or(DashError::InvalidStatus(s)))
        .transpose()?;

    let api = shell.open(Route::Orders)?;
    let orders = report::or_empty(api.orders(), "orders");

    let mut shown: Vec<&Order> = if today {
        report::orders_today(&orders)
    } else {
        orders.iter().collect()
    };
    if let Some(status) = status {
        shown.retain(|o| o.status == status);
    }
    if let Some(n) = limit {
        shown.truncate(n);
    }

    if shown.is_empty() {
        println!("No orders found.");
        return Ok(());
    }

    let total: f64 = shown.iter().map(|o| o.total_amount).sum();
    let debt: f64 = shown.iter().map(|o| o.debt_remaining).sum();
    let count = shown.len();

    print_table(shown.into_iter().map(OrderRow::from).collect());
    println!();
    println!("Total: {count} orders, {} billed, {} owed", format_vnd(total), format_vnd(debt));

    Ok(())
}

fn cmd_order(shell: &Shell, id: &str) -> Result<()> {
    let api = shell.open(Route::Orders)?;
    let order = api.order(id)?;
    let items = report::or_empty(api.order_items(id), "order items");

    let row = OrderRow::from(&order);
    println!("Order #{}", order.id);
    println!("{}", "-".repeat(50));
    println!("Customer:          {}", row.customer);
    println!("Date:              {}", row.date);
    println!("Status:            {}", row.status);
    println!("Total:             {}", row.total);
    println!("Paid:              {}", row.paid);
    println!("Remaining debt:    {}", row.debt);
    println!(
        "Containers:        {} out, {} back, {} owed",
        order.returnable_out,
        order.returnable_in,
        order.returnable_outstanding()
    );
    println!(
        "Deposit:           {} ({} paid, {} owed)",
        format_vnd(order.deposit_amount),
        format_vnd(order.deposit_paid),
        format_vnd(order.deposit_debt)
    );
    if let Some(note) = &order.note {
        println!("Note:              {note}");
    }
    println!();

    if items.is_empty() {
        println!("No line items.");
    } else {
        print_table(
            items
                .iter()
                .enumerate()
                .map(|(idx, item)| ItemRow {
                    index: idx + 1,
                    product: item.product_name.clone(),
                    quantity: format_quantity(item.quantity),
                    unit_price: format_vnd(item.unit_price),
                    total: format_vnd(item.total),
                })
                .collect(),
        );
    }

    Ok(())
}

fn cmd_set_status(shell: &Shell, id: &str, status: &str) -> Result<()> {
    let status =
        OrderStatus::parse(status).ok_or_else(|| DashError::InvalidStatus(status.to_string()))?;
    let api = shell.open(Route::Orders)?;
    let order = api.update_order_status(id, status)?;

    println!("Order #{} is now {}", id, order.status.label());
    Ok(())
}

fn cmd_pay(shell: &Shell, id: &str, amount: f64) -> Result<()> {
    if !(amount.is_finite() && amount > 0.0) {
        return Err(DashError::InvalidAmount);
    }
    let api = shell.open(Route::Orders)?;
    let order = api.record_payment(id, amount)?;

    println!(
        "Recorded {} payment for #{} ({} remaining)",
        format_vnd(amount),
        id,
        format_vnd(order.debt_remaining)
    );
    Ok(())
}

fn cmd_return_containers(shell: &Shell, id: &str, units: i64) -> Result<()> {
    if units <= 0 {
        return Err(DashError::InvalidAmount);
    }
    let api = shell.open(Route::Orders)?;
    let order = api.record_returnable(id, units)?;

    println!(
        "Recorded {} containers returned for #{} ({} still owed)",
        units,
        id,
        order.returnable_outstanding()
    );
    Ok(())
}

fn cmd_customers(shell: &Shell, in_debt: bool) -> Result<()> {
    let api = shell.open(Route::Customers)?;
    let mut customers = report::or_empty(api.customers(), "customers");
    if in_debt {
        customers.retain(|c| c.debt > 0.0 || c.returnable_debt > 0);
    }

    if customers.is_empty() {
        println!("No customers found.");
        return Ok(());
    }

    let summary = report::debt_summary(&customers);
    print_table(
        customers
            .iter()
            .map(|c| CustomerRow {
                id: c.id.clone(),
                name: c.name.clone(),
                kind: c.customer_type.to_string(),
                phone: c.phone.clone().unwrap_or_default(),
                debt: format_vnd(c.debt),
                returnable_debt: format_grouped(c.returnable_debt),
            })
            .collect(),
    );
    println!();
    println!(
        "{} customers, {} in debt: {} and {} containers owed",
        customers.len(),
        summary.customers_in_debt,
        format_vnd(summary.total_debt),
        format_grouped(summary.total_returnable_debt)
    );

    Ok(())
}

fn cmd_users(shell: &Shell) -> Result<()> {
    let api = shell.open(Route::Users)?;
    let users = report::or_empty(api.users(), "users");

    if users.is_empty() {
        println!("No users found.");
        return Ok(());
    }

    print_table(
        users
            .iter()
            .map(|u| UserRow {
                id: u.id.clone(),
                name: u.name.clone(),
                username: u.username.clone(),
                role: u.role.to_string(),
            })
            .collect(),
    );
    Ok(())
}

fn cmd_transactions(shell: &Shell, limit: Option<usize>) -> Result<()> {
    let api = shell.open(Route::Transactions)?;
    let mut transactions = report::or_empty(api.transactions(), "transactions");
    if let Some(n) = limit {
        transactions.truncate(n);
    }

    if transactions.is_empty() {
        println!("No transactions found.");
        return Ok(());
    }

    let total: f64 = transactions.iter().map(|t| t.amount).sum();
    print_table(
        transactions
            .iter()
            .map(|t| TransactionRow {
                id: t.id.clone(),
                date: t
                    .date
                    .map(|ts| format_datetime(&ts.with_timezone(&Local)))
                    .unwrap_or_default(),
                order: t.order_id.clone(),
                customer: t.customer_name.clone(),
                kind: t.kind.clone(),
                amount: format_vnd(t.amount),
            })
            .collect(),
    );
    println!();
    println!("Total: {}", format_vnd(total));
    Ok(())
}

fn cmd_inventory(shell: &Shell) -> Result<()> {
    let api = shell.open(Route::Inventory)?;
    let inventory = report::or_empty(api.inventory_report(), "inventory report");

    let entries = report::dedup_inventory(
        &inventory.low_stock,
        &inventory.out_of_stock,
        &inventory.most_stocked,
    );

    if entries.is_empty() {
        println!("No inventory data.");
    } else {
        print_table(
            entries
                .iter()
                .map(|e| StockRow {
                    id: e.product_id.clone(),
                    name: e.product_name.clone(),
                    stock: format_grouped(e.stock),
                })
                .collect(),
        );
    }
    println!("Products: {}", entries.len());
    println!("Total stock: {}", format_grouped(report::total_stock(&entries)));
    Ok(())
}

fn cmd_revenue(shell: &Shell, month: Option<u32>, year: Option<i32>) -> Result<()> {
    let today = Local::now().date_naive();
    let month = month.unwrap_or(today.month());
    let year = year.unwrap_or(today.year());
    if !(1..=12).contains(&month) {
        return Err(DashError::InvalidMonth(month));
    }

    let api = shell.open(Route::Revenue)?;
    let daily = report::or_empty(api.daily_revenue(month, year), "daily revenue");
    let monthly = report::or_empty(api.monthly_revenue(year), "monthly revenue");

    println!("Revenue {month:02}/{year}");
    println!("{}", "-".repeat(50));

    if daily.is_empty() {
        println!("No revenue recorded.");
    } else {
        print_table(
            daily
                .iter()
                .map(|e| RevenueRow {
                    date: format_date(e.date),
                    total: format_vnd(e.total),
                })
                .collect(),
        );
    }

    let (monday, sunday) = report::week_bounds(today);
    println!();
    println!("Today:      {}", format_vnd(report::daily_revenue(&daily, today)));
    println!(
        "This week:  {} ({} - {})",
        format_vnd(report::weekly_revenue(&daily, today)),
        format_date(monday),
        format_date(sunday)
    );
    println!("This month: {}", format_vnd(report::monthly_revenue(&daily)));

    if !monthly.is_empty() {
        println!();
        println!("By month, {year}:");
        print_table(
            monthly
                .iter()
                .map(|m| RevenueRow {
                    date: format!("{:02}/{}", m.month, m.year),
                    total: format_vnd(m.total),
                })
                .collect(),
        );
        let year_total: f64 = monthly.iter().map(|m| m.total).sum();
        println!("Year total: {}", format_vnd(year_total));
    }

    Ok(())
}

fn cmd_invoice(
    shell: &Shell,
    id: &str,
    output: Option<PathBuf>,
    print: bool,
    typst_source: Option<PathBuf>,
) -> Result<()> {
    let api = shell.open(Route::Invoice)?;
    let order = api.order(id)?;
    let mut items = api.order_items(id)?;
    items.retain(|item| item.order_id.is_empty() || item.order_id == order.id);

    let document = invoice::generate(&order, &items, Some(&shell.config.company));
    let output_dir = resolve_output_dir(&shell.config.pdf.output_dir, &shell.cfg_dir);

    if let Some(typ_path) = typst_source {
        let path = pdf::write_typst_source(&document, &typ_path)?;
        println!("Wrote Typst source for #{}", order.id);
        println!("  Saved: {}", path.display());
        return Ok(());
    }

    if print {
        let path = pdf::print(&document, &output_dir.join("print"))?;
        println!("Sent #{} to the viewer for printing", order.id);
        println!("  Saved: {}", path.display());
        return Ok(());
    }

    let path = output.unwrap_or_else(|| output_dir.join(document.file_name(Local::now())));
    pdf::save(&document, &path)?;

    println!("Generated invoice for #{}", order.id);
    println!("  Customer: {}", order.customer_name);
    println!("  Total:    {}", format_vnd(order.total_amount));
    println!("  Saved:    {}", path.display());

    Ok(())
}
