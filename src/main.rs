//! `catalog-admin` command-line interface.
//!
//! Every command starts a session, performs the same interactions a user would on the catalog
//! screen, prints the rendered table (or product), and shuts the session down.

use catalog_admin::config::AppConfig;
use catalog_admin::forms::FormError;
use catalog_admin::model::{Product, ProductId};
use catalog_admin::session::{CatalogSystem, NotificationKind, SessionError, SessionHandle};
use catalog_admin::table::{PinSide, SortDirection, TableRenderer};
use catalog_admin::{CatalogError, Result};
use catalog_framework::tracing::setup_tracing;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process;
use tracing::{info, Instrument};

#[derive(Parser)]
#[command(name = "catalog-admin")]
#[command(about = "Browse and edit the product catalog")]
#[command(version)]
struct Cli {
    /// TOML configuration file (overrides CATALOG_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Use the built-in sample catalog instead of the remote API
    #[arg(long, global = true)]
    offline: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
struct PageArgs {
    /// Page number, starting at 1
    #[arg(long, default_value_t = 1)]
    page: usize,

    /// Rows per page (one of the configured sizes)
    #[arg(long)]
    size: Option<usize>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show one page of products
    List {
        #[command(flatten)]
        paging: PageArgs,

        /// Sort by a column, `key` or `key:desc`; repeat for secondary keys
        #[arg(long = "sort", value_name = "KEY[:desc]")]
        sort: Vec<String>,

        /// Only rows containing this text
        #[arg(long)]
        search: Option<String>,

        /// Hide a column
        #[arg(long = "hide", value_name = "KEY")]
        hide: Vec<String>,

        /// Show a column hidden by default
        #[arg(long = "show", value_name = "KEY")]
        show: Vec<String>,

        /// Pin a column to the left edge
        #[arg(long = "pin-left", value_name = "KEY")]
        pin_left: Vec<String>,
    },

    /// Show one product
    Show { id: u32 },

    /// Add a product
    Add {
        /// Field values, e.g. `--set title="Desk Lamp" --set price=24.5`
        #[arg(long = "set", value_name = "FIELD=VALUE", required = true)]
        set: Vec<String>,
    },

    /// Edit a product on the given page
    Edit {
        id: u32,

        #[command(flatten)]
        paging: PageArgs,

        #[arg(long = "set", value_name = "FIELD=VALUE", required = true)]
        set: Vec<String>,
    },

    /// Delete a product
    Delete {
        id: u32,

        #[command(flatten)]
        paging: PageArgs,
    },
}

#[tokio::main]
async fn main() {
    setup_tracing();
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        if let CatalogError::Session(SessionError::Form(FormError::Invalid(errors))) = &e {
            for (field, message) in errors.iter() {
                eprintln!("  {field}: {message}");
            }
        }
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = AppConfig::load(cli.config.as_deref())?;
    let system = if cli.offline {
        info!("Starting offline catalog");
        CatalogSystem::offline(&config)
    } else {
        CatalogSystem::connect(&config)?
    };

    let outcome = execute(&system.session, cli.command)
        .instrument(tracing::info_span!("command"))
        .await;
    system.shutdown().await?;
    outcome
}

async fn execute(session: &SessionHandle, command: Commands) -> Result<()> {
    let renderer = TableRenderer::default();
    session.settled().await?;

    match command {
        Commands::List {
            paging,
            sort,
            search,
            hide,
            show,
            pin_left,
        } => {
            go_to(session, &paging).await?;
            for spec in &sort {
                let (key, direction) = match spec.split_once(':') {
                    Some((key, "desc")) => (key, SortDirection::Desc),
                    Some((key, _)) => (key, SortDirection::Asc),
                    None => (spec.as_str(), SortDirection::Asc),
                };
                session.add_sort(key, direction).await?;
            }
            if let Some(search) = &search {
                session.set_search(search).await?;
            }
            for key in &hide {
                session.set_column_visible(key, false).await?;
            }
            for key in &show {
                session.set_column_visible(key, true).await?;
            }
            for key in &pin_left {
                session.pin(key, PinSide::Left).await?;
            }
            let snapshot = session.settled().await?;
            println!("{}", snapshot.render(&renderer));
        }

        Commands::Show { id } => {
            let product = session.show(ProductId(id)).await?;
            print_product(&product);
        }

        Commands::Add { set } => {
            session.open_add_form().await?;
            for (field, value) in assignments(&set)? {
                session.set_add_field(field, value).await?;
            }
            session.submit_add().await?;
            report(session, &renderer).await?;
        }

        Commands::Edit { id, paging, set } => {
            go_to(session, &paging).await?;
            session.open_edit(ProductId(id)).await?;
            for (field, value) in assignments(&set)? {
                session.set_edit_field(field, value).await?;
            }
            session.submit_edit().await?;
            report(session, &renderer).await?;
        }

        Commands::Delete { id, paging } => {
            go_to(session, &paging).await?;
            session.delete(ProductId(id)).await?;
            report(session, &renderer).await?;
        }
    }
    Ok(())
}

/// Applies `--size` then `--page`, waiting for each fetch.
async fn go_to(session: &SessionHandle, paging: &PageArgs) -> Result<()> {
    if let Some(size) = paging.size {
        session.set_page_size(size).await?;
        session.settled().await?;
    }
    if paging.page > 1 {
        session.set_page(paging.page - 1).await?;
        session.settled().await?;
    }
    Ok(())
}

/// Waits for the write to finish, then prints the page and the latest notification.
async fn report(session: &SessionHandle, renderer: &TableRenderer) -> Result<()> {
    let snapshot = session.settled().await?;
    println!("{}", snapshot.render(renderer));
    if let Some(notification) = snapshot.last_notification() {
        match notification.kind {
            NotificationKind::Success => println!("\n✔ {}", notification.message),
            NotificationKind::Error => eprintln!("\n✘ {}", notification.message),
        }
    }
    Ok(())
}

fn assignments(pairs: &[String]) -> Result<Vec<(&str, &str)>> {
    pairs
        .iter()
        .map(|pair| {
            pair.split_once('=').ok_or_else(|| {
                CatalogError::Session(SessionError::Rejected(format!(
                    "expected FIELD=VALUE, got {pair:?}"
                )))
            })
        })
        .collect()
}

fn print_product(product: &Product) {
    println!("#{} {}", product.id, product.title);
    println!("  {}", product.description);
    println!("  Category: {}   Brand: {}   SKU: {}", product.category, product.brand, product.sku);
    println!(
        "  Price: ${:.2}   Discount: {:.2}%   Rating: {:.1}",
        product.price, product.discount_percentage, product.rating
    );
    println!(
        "  Stock: {} ({})   Min. order: {}",
        product.stock, product.availability_status, product.minimum_order_quantity
    );
    let d = &product.dimensions;
    println!(
        "  Weight: {}g   Dimensions: {}×{}×{} cm",
        product.weight, d.width, d.height, d.depth
    );
    if !product.tags.is_empty() {
        println!("  Tags: {}", product.tags.join(", "));
    }
    println!("  Warranty: {}", product.warranty_information);
    println!("  Shipping: {}", product.shipping_information);
    println!("  Returns: {}", product.return_policy);
    println!("  Updated: {}", product.meta.updated_at);
}
