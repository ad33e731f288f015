use dotenvy::dotenv;
use equipment_ledger::{
    config::{database, seed},
    core::seed::seed_tenants,
    errors::Result,
};
use std::path::Path;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();

    // 3. Connect and make sure every table exists
    let database_url = database::get_database_url();
    let db = database::create_connection(&database_url)
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db)
        .await
        .inspect_err(|e| error!("Failed to create tables: {}", e))?;

    // 4. Seed tenants if a seed file is present
    let seed_file = seed::get_seed_file();
    if Path::new(&seed_file).exists() {
        let config = seed::load_seed_config(&seed_file)?;
        let summary = seed_tenants(&db, &config)
            .await
            .inspect_err(|e| error!("Failed to seed tenants: {}", e))?;
        info!(
            "Seeded {} organizations and {} equipment types from {}",
            summary.organizations_created, summary.equipment_types_created, seed_file
        );
    } else {
        warn!("Seed file {} not found, skipping seeding", seed_file);
    }

    info!("Database ready");
    Ok(())
}
