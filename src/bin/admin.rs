//! CLI administration tool for tinylink.
//!
//! Manages links and inspects the database without going through the HTTP
//! API. Uses the same services as the server, so validation and code
//! allocation behave identically.
//!
//! # Usage
//!
//! ```bash
//! # List links, most clicked first
//! cargo run --bin admin -- links list --sort-by clicks
//!
//! # Shorten a URL with a custom code
//! cargo run --bin admin -- links create https://example.com --code Promo24
//!
//! # Show or delete a link
//! cargo run --bin admin -- links show Promo24
//! cargo run --bin admin -- links delete Promo24
//!
//! # Totals
//! cargo run --bin admin -- stats
//!
//! # Check the connection / create the table
//! cargo run --bin admin -- db check
//! cargo run --bin admin -- db init
//! ```
//!
//! # Environment Variables
//!
//! Same as the server: `DATABASE_URL` or the `DB_*` components.

use tinylink::application::services::LinkService;
use tinylink::config;
use tinylink::domain::entities::{Link, LinkQuery};
use tinylink::infrastructure::persistence::{Database, PgLinkRepository};

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use std::sync::Arc;

/// CLI tool for managing tinylink.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Manage short links
    Links {
        #[command(subcommand)]
        action: LinkAction,
    },

    /// Show statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Link management subcommands.
#[derive(Subcommand)]
enum LinkAction {
    /// List links
    List {
        /// createdAt, clicks, code or originalUrl
        #[arg(short, long)]
        sort_by: Option<String>,

        /// asc or desc
        #[arg(short, long)]
        order: Option<String>,

        /// Case-insensitive substring of code or URL
        #[arg(short, long)]
        filter: Option<String>,
    },

    /// Create a short link
    Create {
        /// Destination URL (http or https)
        url: String,

        /// Custom code, 6-8 alphanumeric characters
        #[arg(short, long)]
        code: Option<String>,
    },

    /// Show a link and its clicks
    Show {
        code: String,
    },

    /// Permanently delete a link
    Delete {
        code: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Create the links table and indexes if missing
    Init,

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = config::load_from_env()?;
    let database = Arc::new(Database::connect_lazy(&config));

    match cli.command {
        Commands::Links { action } => handle_link_action(action, database).await?,
        Commands::Stats => handle_stats(&database).await?,
        Commands::Db { action } => handle_db_action(action, &database).await?,
    }

    Ok(())
}

/// Dispatches link management commands.
async fn handle_link_action(action: LinkAction, database: Arc<Database>) -> Result<()> {
    let service = LinkService::new(Arc::new(PgLinkRepository::new(database)));

    match action {
        LinkAction::List {
            sort_by,
            order,
            filter,
        } => {
            let query =
                LinkQuery::from_raw(sort_by.as_deref(), order.as_deref(), filter.as_deref());
            list_links(&service, query).await?;
        }
        LinkAction::Create { url, code } => {
            let link = service.create_link(&url, code.as_deref()).await?;

            println!("{}", "✅ Link created".green().bold());
            println!();
            print_link(&link);
        }
        LinkAction::Show { code } => {
            let link = service.get_link(&code).await?;
            print_link(&link);
        }
        LinkAction::Delete { code, yes } => {
            delete_link(&service, &code, yes).await?;
        }
    }

    Ok(())
}

/// Lists links in a table.
///
/// # Output Format
///
/// ```text
/// 📋 Links
///
///   Code      Clicks   Created            URL
///   ──────────────────────────────────────────────────────────────
///   Promo24   12       2024-01-15 10:30   https://example.com/spring-sale
/// ```
async fn list_links(service: &LinkService<PgLinkRepository>, query: LinkQuery) -> Result<()> {
    println!("{}", "📋 Links".bright_blue().bold());
    println!();

    let links = service.list_links(query).await?;

    if links.is_empty() {
        println!("{}", "  No links found".yellow());
        return Ok(());
    }

    println!(
        "  {:<9} {:<8} {:<18} {}",
        "Code".bright_white().bold(),
        "Clicks".bright_white().bold(),
        "Created".bright_white().bold(),
        "URL".bright_white().bold()
    );
    println!("  {}", "─".repeat(75).bright_black());

    for link in &links {
        println!(
            "  {:<9} {:<8} {:<18} {}",
            link.code.cyan(),
            link.clicks.to_string().bright_green(),
            link.created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black(),
            truncate(&link.original_url, 60)
        );
    }

    println!();
    println!("  Total: {}", links.len().to_string().bright_white().bold());
    println!();

    Ok(())
}

/// Deletes a link after confirmation (default: No).
async fn delete_link(
    service: &LinkService<PgLinkRepository>,
    code: &str,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "🗑️  Delete Link".bright_blue().bold());
    println!();

    let link = service.get_link(code).await?;
    print_link(&link);

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Delete this link?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    service.delete_link(&link.code).await?;

    println!("{}", "✅ Link deleted successfully!".green().bold());
    println!();

    Ok(())
}

fn print_link(link: &Link) {
    let last_clicked = link
        .last_clicked_at
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "never".to_string());

    println!("  Code:         {}", link.code.cyan().bold());
    println!("  URL:          {}", link.original_url.bright_white());
    println!("  Clicks:       {}", link.clicks.to_string().bright_green());
    println!(
        "  Created:      {}",
        link.created_at.format("%Y-%m-%d %H:%M:%S").to_string().bright_black()
    );
    println!("  Last clicked: {}", last_clicked.bright_black());
    println!();
}

fn truncate(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        return value.to_string();
    }

    let mut truncated: String = value.chars().take(max_chars - 1).collect();
    truncated.push('…');
    truncated
}

/// Displays link and click totals plus the most clicked link.
async fn handle_stats(database: &Database) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let (links_count, clicks_count) = database
        .with_schema(|pool| async move {
            sqlx::query_as::<_, (i64, i64)>(
                "SELECT COUNT(*), COALESCE(SUM(clicks), 0)::BIGINT FROM links",
            )
            .fetch_one(&pool)
            .await
        })
        .await?;

    let top = database
        .with_schema(|pool| async move {
            sqlx::query_as::<_, (String, i64)>(
                "SELECT code, clicks FROM links WHERE clicks > 0 ORDER BY clicks DESC, id LIMIT 1",
            )
            .fetch_optional(&pool)
            .await
        })
        .await?;

    println!(
        "  Links:        {}",
        links_count.to_string().bright_green().bold()
    );
    println!(
        "  Clicks:       {}",
        clicks_count.to_string().bright_green().bold()
    );
    if let Some((code, clicks)) = top {
        println!(
            "  Most clicked: {} ({} clicks)",
            code.cyan(),
            clicks.to_string().bright_green()
        );
    }
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, database: &Database) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            match database.ping().await {
                Ok(()) => println!("{}", "✅ Database connection OK".green().bold()),
                Err(e) => {
                    println!("{} {}", "❌".red(), e.to_string().red().bold());
                    println!("  {}", e.detail.bright_black());
                    println!("  Hint: {}", e.kind.hint().yellow());
                    anyhow::bail!("database check failed");
                }
            }
        }
        DbAction::Init => {
            println!("{}", "🛠️  Ensuring schema...".bright_blue());

            database.ensure_schema().await?;

            println!("{}", "✅ links table ready".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let pool = database.pool()?;
            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            println!("  PostgreSQL: {}", version.bright_white());
            println!();
        }
    }

    Ok(())
}
