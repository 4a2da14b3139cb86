mod config;
mod http;
mod obs;

use std::net::IpAddr;

use api::{seed::seed_demo, AppState};
use clap::{Parser, Subcommand};
use config::AppConfig;
use dotenvy::dotenv;
use http::ServeConfig;
use migration::{Migrator, MigratorTrait};
use sea_orm::Database;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "store-ratings", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Run HTTP server
    Serve {
        #[arg(long, env = "HOST", default_value = "0.0.0.0")]
        host: IpAddr,
        #[arg(long, env = "PORT", default_value_t = 3001)]
        port: u16,
    },
    /// Apply or roll back schema migrations
    Migrate {
        #[command(subcommand)]
        action: MigrateAction,
    },
    /// Seed demo accounts and a store
    Seed {
        #[arg(long, env = "SEED_PASSWORD", default_value = "password123")]
        password: String,
    },
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum MigrateAction {
    Up,
    Down,
    /// Drop everything and re-apply
    Fresh,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    obs::init_tracing()?;

    let cli = Cli::parse();
    let config = AppConfig::load()?;
    let db = Database::connect(&config.database_url).await?;

    match cli.cmd {
        Cmd::Migrate { action } => {
            match action {
                MigrateAction::Up => Migrator::up(&db, None).await?,
                MigrateAction::Down => Migrator::down(&db, None).await?,
                MigrateAction::Fresh => Migrator::fresh(&db).await?,
            }
            info!(?action, "migrations complete");
        }
        Cmd::Seed { password } => {
            Migrator::up(&db, None).await?;
            let seeded = seed_demo(&db, &password).await?;
            info!(
                users = seeded.users.len(),
                store_id = seeded.store.id,
                "seed complete"
            );
        }
        Cmd::Serve { host, port } => {
            Migrator::up(&db, None).await?;
            let state = AppState::new(db, config.auth());
            http::serve(
                ServeConfig::new(host, port, config.cors_allowed_origins.clone()),
                state,
            )
            .await?;
        }
    }

    Ok(())
}
