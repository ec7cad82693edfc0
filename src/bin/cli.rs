//! POS CLI
//!
//! Command-line access to the POS backend, sharing the session and view
//! logic of the web client:
//! - Log in and out
//! - Browse products, stock, categories and promotions
//! - Review today's sales and the dashboard figures
//! - Open and close the cash drawer
//! - Read the audit log

use anyhow::{anyhow, bail, Context};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use pos_client::api::{ApiClient, FileTokenStore, ReqwestTransport};
use pos_client::audit::{action_label, actor_display, changes_summary, AuditFilter};
use pos_client::cash::{check_pin, open_session, parse_closing, parse_opening, CashError};
use pos_client::config::{generate_default_config, ClientConfig};
use pos_client::dashboard::{DashboardInput, DashboardMetrics, DateRange};
use pos_client::inventory::{kpis, stock_status, StockFilter};
use pos_client::money::format_clp;
use pos_client::promotions::value_label;
use pos_client::sales_day::{day_total, sales_on};
use pos_client::{messages, ApiError, ErrorMessages};

type Api = ApiClient<ReqwestTransport, FileTokenStore>;

#[derive(Parser)]
#[command(name = "pos")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Point-of-sale client for the store backend")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Backend URL (overrides config and POS_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: Format,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Table,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log in and keep the session
    Login {
        username: String,
        /// Password (read from stdin when omitted)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Forget the stored session
    Logout,

    /// Show the current user
    Whoami,

    /// List products
    Products {
        /// Search by name or code
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Stock levels
    Stock {
        /// Only products at or below their critical level
        #[arg(long)]
        low: bool,
    },

    /// List categories
    Categories,

    /// List promotions
    Promos,

    /// Turn a promotion on or off
    PromoToggle {
        id: i64,
        state: Toggle,
    },

    /// Sales recorded today
    SalesToday {
        /// Include voided sales
        #[arg(long)]
        all: bool,
    },

    /// Dashboard figures for a date range (default: last 7 days)
    Dashboard {
        /// First day, YYYY-MM-DD
        #[arg(long)]
        from: Option<NaiveDate>,
        /// Last day, YYYY-MM-DD
        #[arg(long)]
        to: Option<NaiveDate>,
    },

    /// Cash drawer
    Cash {
        #[command(subcommand)]
        action: CashCommand,
    },

    /// Audit log
    Audit {
        /// Only this action code (e.g. SALE_VOID)
        #[arg(long)]
        action: Option<String>,
        /// Free text over actor, action, model and object id
        #[arg(long)]
        text: Option<String>,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Toggle {
    On,
    Off,
}

#[derive(Subcommand)]
pub enum CashCommand {
    /// Show the open session and recent history
    Status,
    /// Open the drawer with a whole-peso amount
    Open {
        amount: String,
        /// Supervisor PIN, required for sellers
        #[arg(long)]
        pin: Option<String>,
    },
    /// Close the open drawer
    Close {
        amount: String,
        /// Supervisor PIN, required for sellers
        #[arg(long)]
        pin: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = ClientConfig::load_default();
    if let Some(url) = &cli.api_url {
        config.api.base_url = url.clone();
    }
    init_logging(&config);

    let transport = ReqwestTransport::new(config.api.timeout())?;
    let api = ApiClient::new(
        &config.api.base_url,
        transport,
        FileTokenStore::new(config.session.path()),
    )
    .on_session_expired(|| eprintln!("Sesión expirada. Ingresa de nuevo con `pos login`."));

    run(cli, &config, &api).await
}

fn init_logging(config: &ClientConfig) {
    let filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| format!("pos_client={}", config.logging.level));
    let registry = tracing_subscriber::registry().with(EnvFilter::new(filter));
    if config.logging.is_json() {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

async fn run(cli: Cli, config: &ClientConfig, api: &Api) -> anyhow::Result<()> {
    let format = cli.format;

    match cli.command {
        Commands::Login { username, password } => {
            let password = match password {
                Some(p) => p,
                None => prompt("Clave: ")?,
            };
            api.login(&username, &password)
                .await
                .map_err(|e| report(&messages::LOGIN, e))?;
            let me = api.me().await.map_err(|e| report(&messages::LOGIN, e))?;
            println!("Sesión iniciada como {} ({})", me.username, me.role.label());
        }

        Commands::Logout => {
            api.logout();
            println!("Sesión cerrada.");
        }

        Commands::Whoami => {
            require_login(api)?;
            let me = api.me().await.map_err(|e| report(&messages::LOGIN, e))?;
            if format == Format::Json {
                return print_json(&me);
            }
            println!("Usuario: {}", me.username);
            println!("Email:   {}", if me.email.is_empty() { "-" } else { me.email.as_str() });
            println!("Rol:     {}", me.role.label());
            println!("Admin:   {}", if me.is_admin() { "sí" } else { "no" });
        }

        Commands::Products { search } => {
            require_login(api)?;
            let products = match search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
                Some(q) => api.search_products(q).await,
                None => api.list_products().await,
            }
            .map_err(|e| report(&messages::LOAD_STOCK, e))?;

            if format == Format::Json {
                return print_json(&products);
            }
            if products.is_empty() {
                println!("Sin productos.");
                return Ok(());
            }
            println!("{:<14} {:<30} {:>10} {:>7}", "Código", "Nombre", "Precio", "Stock");
            println!("{}", "-".repeat(64));
            for p in &products {
                println!(
                    "{:<14} {:<30} {:>10} {:>7}",
                    p.code,
                    truncate(&p.name, 30),
                    format_clp(p.price),
                    p.stock
                );
            }
        }

        Commands::Stock { low } => {
            require_login(api)?;
            let products = api
                .list_products()
                .await
                .map_err(|e| report(&messages::LOAD_STOCK, e))?;
            let filter = StockFilter {
                only_low: low,
                ..Default::default()
            };
            let shown = filter.apply(&products);

            if format == Format::Json {
                return print_json(&shown);
            }
            let k = kpis(&products);
            println!(
                "Productos: {}   Unidades: {}   Stock bajo: {}",
                k.products, k.units, k.low
            );
            println!();
            println!("{:<14} {:<30} {:>7} {:<8}", "Código", "Nombre", "Stock", "Estado");
            println!("{}", "-".repeat(62));
            for p in shown {
                println!(
                    "{:<14} {:<30} {:>7} {:<8}",
                    p.code,
                    truncate(&p.name, 30),
                    p.stock,
                    stock_status(p).label()
                );
            }
        }

        Commands::Categories => {
            require_login(api)?;
            let categories = api
                .list_categories()
                .await
                .map_err(|e| report(&messages::LOAD_CATEGORIES, e))?;
            if format == Format::Json {
                return print_json(&categories);
            }
            println!("{:<6} {}", "ID", "Nombre");
            println!("{}", "-".repeat(40));
            for c in categories {
                println!("{:<6} {}", c.id, c.name);
            }
        }

        Commands::Promos => {
            require_login(api)?;
            let promos = api
                .list_promotions()
                .await
                .map_err(|e| report(&messages::LOAD_PROMOTIONS, e))?;
            if format == Format::Json {
                return print_json(&promos);
            }
            println!("{:<6} {:<28} {:<6} {:>10} {:<8}", "ID", "Nombre", "Tipo", "Valor", "Estado");
            println!("{}", "-".repeat(62));
            for p in promos {
                println!(
                    "{:<6} {:<28} {:<6} {:>10} {:<8}",
                    p.id,
                    truncate(&p.name, 28),
                    p.kind.badge(),
                    value_label(p.kind, p.value),
                    if p.active { "Activa" } else { "Inactiva" }
                );
            }
        }

        Commands::PromoToggle { id, state } => {
            require_login(api)?;
            let active = state == Toggle::On;
            api.set_promotion_active(id, active)
                .await
                .map_err(|e| report(&messages::TOGGLE_PROMOTION, e))?;
            // Show the state the backend reports after the change
            let promos = api
                .list_promotions()
                .await
                .map_err(|e| report(&messages::LOAD_PROMOTIONS, e))?;
            let promo = promos
                .iter()
                .find(|p| p.id == id)
                .ok_or_else(|| anyhow!("Promoción {} no encontrada.", id))?;
            println!(
                "{}: {}",
                promo.name,
                if promo.active { "activa" } else { "inactiva" }
            );
        }

        Commands::SalesToday { all } => {
            require_login(api)?;
            let sales = api
                .list_sales()
                .await
                .map_err(|e| report(&messages::LOAD_SALES, e))?;
            let today = Local::now().date_naive();
            let shown = sales_on(&sales, today, &Local, !all);

            if format == Format::Json {
                return print_json(&shown);
            }
            println!("{:<8} {:<6} {:<10} {:<10} {:>12}", "ID", "Hora", "Pago", "Estado", "Total");
            println!("{}", "-".repeat(50));
            for s in &shown {
                println!(
                    "{:<8} {:<6} {:<10} {:<10} {:>12}",
                    s.id,
                    s.created_at.with_timezone(&Local).format("%H:%M"),
                    s.payment_method.label(),
                    if s.is_ok() { "OK" } else { "ANULADA" },
                    format_clp(s.total)
                );
            }
            println!("{}", "-".repeat(50));
            println!("Total del día: {}", format_clp(day_total(&shown)));
        }

        Commands::Dashboard { from, to } => {
            require_login(api)?;
            let today = Local::now().date_naive();
            let default = DateRange::default_for(today);
            let range = DateRange::try_new(from.unwrap_or(default.from), to.unwrap_or(default.to))
                .ok_or_else(|| anyhow!("La fecha inicial debe ser anterior a la final."))?;

            let (sales, products, categories, cash) = tokio::try_join!(
                api.list_sales(),
                api.list_products(),
                api.list_categories(),
                api.list_cash_sessions(),
            )
            .map_err(|e| report(&messages::LOAD_DASHBOARD, e))?;

            let input = DashboardInput {
                sales: &sales,
                products: &products,
                categories: &categories,
                open_session: open_session(&cash),
            };
            let m = DashboardMetrics::compute(input, range, &Local);
            print_dashboard(&m, range, format)?;
        }

        Commands::Cash { action } => {
            require_login(api)?;
            run_cash(action, config, api, format).await?;
        }

        Commands::Audit { action, text } => {
            require_login(api)?;
            let events = api
                .list_audit_events()
                .await
                .map_err(|e| report(&messages::LOAD_AUDIT, e))?;
            let filter = AuditFilter {
                action: action.unwrap_or_default(),
                text: text.unwrap_or_default(),
                ..Default::default()
            };
            let shown = filter.apply(&events);
            if format == Format::Json {
                return print_json(&shown);
            }
            println!(
                "{:<17} {:<12} {:<18} {:<10} {:<8} {}",
                "Fecha", "Usuario", "Acción", "Modelo", "Objeto", "Cambios"
            );
            println!("{}", "-".repeat(100));
            for e in shown {
                let when = e
                    .timestamp()
                    .map(|t| t.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "{:<17} {:<12} {:<18} {:<10} {:<8} {}",
                    when,
                    truncate(&actor_display(e), 12),
                    action_label(&e.action),
                    e.model,
                    e.obj_id,
                    changes_summary(&e.changes)
                );
            }
        }

        Commands::Config { output } => {
            let content = generate_default_config();
            match output {
                Some(path) => {
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, &content)?;
                    println!("Config written to {:?}", path);
                }
                None => print!("{}", content),
            }
        }
    }

    Ok(())
}

async fn run_cash(
    action: CashCommand,
    config: &ClientConfig,
    api: &Api,
    format: Format,
) -> anyhow::Result<()> {
    match action {
        CashCommand::Status => {
            let sessions = api
                .list_cash_sessions()
                .await
                .map_err(|e| report(&messages::LOAD_CASH, e))?;
            if format == Format::Json {
                return print_json(&sessions);
            }
            match open_session(&sessions) {
                Some(s) => println!(
                    "Caja abierta por {} desde {} con {}",
                    s.opened_by_display(),
                    s.opened_at.with_timezone(&Local).format("%Y-%m-%d %H:%M"),
                    format_clp(s.opening_amount)
                ),
                None => println!("{}", CashError::NoOpenSession),
            }
            println!();
            println!(
                "{:<6} {:<8} {:<12} {:>12} {:>12} {:>10}",
                "ID", "Estado", "Abrió", "Apertura", "Cierre", "Dif."
            );
            println!("{}", "-".repeat(66));
            for s in sessions.iter().take(10) {
                println!(
                    "{:<6} {:<8} {:<12} {:>12} {:>12} {:>10}",
                    s.id,
                    if s.is_open() { "ABIERTA" } else { "CERRADA" },
                    truncate(&s.opened_by_display(), 12),
                    format_clp(s.opening_amount),
                    s.closing_amount.map(format_clp).unwrap_or_else(|| "-".into()),
                    s.diff.map(format_clp).unwrap_or_else(|| "-".into()),
                );
            }
        }

        CashCommand::Open { amount, pin } => {
            let amount = parse_opening(&amount)?;
            confirm_seller(api, config, pin).await?;
            let session = api
                .open_cash(amount)
                .await
                .map_err(|e| report(&messages::OPEN_CASH, e))?;
            println!(
                "Caja #{} abierta con {}",
                session.id,
                format_clp(session.opening_amount)
            );
        }

        CashCommand::Close { amount, pin } => {
            let amount = parse_closing(&amount)?;
            let sessions = api
                .list_cash_sessions()
                .await
                .map_err(|e| report(&messages::LOAD_CASH, e))?;
            let id = open_session(&sessions)
                .map(|s| s.id)
                .ok_or(CashError::NoOpenSession)?;
            confirm_seller(api, config, pin).await?;
            let receipt = api
                .close_cash(id, amount)
                .await
                .map_err(|e| report(&messages::CLOSE_CASH, e))?;
            println!(
                "Caja #{} cerrada con {} (diferencia {})",
                id,
                format_clp(receipt.closing_amount),
                format_clp(receipt.diff)
            );
        }
    }
    Ok(())
}

/// Sellers confirm drawer operations with the supervisor PIN
async fn confirm_seller(api: &Api, config: &ClientConfig, pin: Option<String>) -> anyhow::Result<()> {
    let me = api.me().await.map_err(|e| report(&messages::LOAD_CASH, e))?;
    if !me.is_seller() {
        return Ok(());
    }
    let pin = match pin {
        Some(p) => p,
        None => prompt("PIN de supervisor: ")?,
    };
    check_pin(&pin, &config.cash.seller_pin)?;
    Ok(())
}

fn print_dashboard(m: &DashboardMetrics, range: DateRange, format: Format) -> anyhow::Result<()> {
    if format == Format::Json {
        let series = |points: &[pos_client::dashboard::SeriesPoint]| {
            points
                .iter()
                .map(|p| serde_json::json!({ "label": p.label, "amount": p.amount }))
                .collect::<Vec<_>>()
        };
        let value = serde_json::json!({
            "from": range.from,
            "to": range.to,
            "total": m.total,
            "tickets": m.tickets,
            "units": m.units,
            "top_category": m.top_category,
            "by_day": series(&m.by_day),
            "by_month": series(&m.by_month),
            "by_payment": series(&m.by_payment),
            "by_category": series(&m.by_category),
            "since_open": m.since_open.map(|s| serde_json::json!({ "total": s.total, "tickets": s.tickets })),
            "low_stock": m.low_stock,
            "recent": m.recent,
        });
        return print_json(&value);
    }

    println!("Dashboard {} a {}", range.from, range.to);
    println!("{}", "-".repeat(50));
    println!("Ventas:           {}", format_clp(m.total));
    println!("Tickets:          {}", m.tickets);
    println!("Unidades:         {}", m.units);
    println!("Top categoría:    {}", m.top_category);
    if let Some(since) = m.since_open {
        println!(
            "Desde apertura:   {} ({} tickets)",
            format_clp(since.total),
            since.tickets
        );
    }

    for (title, points) in [
        ("Por día", &m.by_day),
        ("Por mes", &m.by_month),
        ("Por medio de pago", &m.by_payment),
        ("Por categoría", &m.by_category),
    ] {
        println!();
        println!("{}", title);
        for p in points.iter() {
            println!("  {:<20} {:>12}", p.label, format_clp(p.amount));
        }
    }

    if !m.low_stock.is_empty() {
        println!();
        println!("Stock bajo");
        for p in &m.low_stock {
            println!("  {:<30} {:>5}", truncate(&p.name, 30), p.stock);
        }
    }
    Ok(())
}

fn require_login(api: &Api) -> anyhow::Result<()> {
    if api.is_logged_in() {
        Ok(())
    } else {
        bail!("{} Ejecuta `pos login <usuario>`.", messages::NOT_AUTHENTICATED)
    }
}

/// Turn an API failure into the message the web client would show
fn report(set: &ErrorMessages, error: ApiError) -> anyhow::Error {
    tracing::debug!(?error, "request failed");
    anyhow!(set.describe(&error))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn prompt(label: &str) -> anyhow::Result<String> {
    eprint!("{}", label);
    std::io::stderr().flush()?;
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("no se pudo leer la entrada")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
        cut.push('…');
        cut
    }
}
