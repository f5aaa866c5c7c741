use clap::Parser;
use dotenvy::dotenv;
use stockroom::{
    cli::{self, Cli},
    config::{
        database::{create_connection, create_tables, ensure_sqlite_dir, get_database_url},
        settings::load_settings_or_default,
    },
    core::catalog::seed_catalog,
    errors::Result,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // 2. Load .env file, env vars can also be set externally
    dotenv().ok();

    let cli = Cli::parse();

    // 3. Load settings, falling back to defaults when the file is absent
    let settings = load_settings_or_default(&cli.config)
        .inspect_err(|e| error!("Failed to load settings: {}", e))?;

    // 4. Open the record store and make sure the schema exists
    let database_url = get_database_url();
    ensure_sqlite_dir(&database_url)?;
    let db = create_connection(&database_url, &settings)
        .await
        .inspect_err(|e| error!("Failed to connect to record store: {}", e))?;
    create_tables(&db)
        .await
        .inspect(|()| info!("Record store initialized."))
        .inspect_err(|e| error!("Failed to initialize record store: {}", e))?;

    // 5. Seed configured categories and suppliers
    seed_catalog(&db, &settings)
        .await
        .inspect_err(|e| error!("Failed to seed catalog: {}", e))?;

    // 6. Run the operator command
    let output = cli::run(cli.command, &db, &settings)
        .await
        .inspect_err(|e| error!("Command failed: {}", e))?;
    println!("{output}");

    Ok(())
}
