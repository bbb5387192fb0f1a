//! Maintenance entry point for the site's content database. Every subcommand
//! opens the store (which brings the schema up to date), does one job, and
//! closes it again.
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use yanti_siggs_site::db::DEFAULT_ADMIN_USERNAME;
use yanti_siggs_site::{ContentStore, SiteConfig};

#[derive(Debug, Parser)]
#[command(name = "yanti-siggs", about = "Manage the Yanti Siggs content database")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create tables, seed sample content and the admin account, then print stats.
    Init,
    /// Print row counts per table.
    Stats,
    /// Re-run schema creation and migrations.
    Refresh,
    /// Delete seeded sample content, keeping everything added by an admin.
    ClearSamples,
    /// Set the password of an admin account.
    SetAdminPassword {
        #[arg(default_value = DEFAULT_ADMIN_USERNAME)]
        username: String,
        #[arg(long, env = "YANTI_ADMIN_PASSWORD", hide_env_values = true)]
        password: String,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "yanti_siggs_site=info,yanti_siggs=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = SiteConfig::from_env().context("failed to load configuration")?;
    info!(db = %config.db_path.display(), media = %config.media_root.display(), "loaded configuration");

    let store = ContentStore::open(&config)?;
    let outcome = run(&store, &config, cli.command);
    store.close()?;
    outcome
}

fn run(store: &ContentStore, config: &SiteConfig, command: Command) -> Result<()> {
    match command {
        Command::Init => {
            store.seed_if_empty()?;
            store.seed_admin(config.initial_admin_password.as_deref())?;
            println!("{}", store.stats());
        }
        Command::Stats => println!("{}", store.stats()),
        Command::Refresh => {
            store.ensure_schema()?;
            store.record_admin_action(None, "refresh_database", "")?;
            println!("Database refreshed.");
        }
        Command::ClearSamples => {
            let cleared = store.clear_sample_data()?;
            store.record_admin_action(
                None,
                "clear_sample_data",
                &format!("{} rows", cleared.total()),
            )?;
            println!("Removed {} sample rows.", cleared.total());
        }
        Command::SetAdminPassword { username, password } => {
            if store.set_admin_password(&username, &password)? == 0 {
                anyhow::bail!("no admin account named {username}");
            }
            let admin_id = store.get_admin(&username)?.map(|admin| admin.id);
            store.record_admin_action(admin_id, "set_password", &username)?;
            println!("Password updated for {username}.");
        }
    }
    Ok(())
}
