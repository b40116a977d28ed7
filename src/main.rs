//! Storefront Engine
//!
//! Runs one resolution against the configured database and prints the result
//! as JSON. Reads configuration from TOML file
//! (~/.config/storefront-engine/config.toml, or `STOREFRONT_CONFIG`).
//!
//! ```text
//! storefront-engine preview <service-type>
//! storefront-engine locate <pincode> | <latitude> <longitude>
//! storefront-engine catalog <service-area-id> <service-type> [search]
//! ```

use std::sync::Arc;

use sea_orm_migration::MigratorTrait;
use tracing::{debug, error, info};

use storefront_engine::application::services::{
    generate_preview, BindingResolver, CatalogResolver, LocationResolver,
};
use storefront_engine::domain::{CatalogFilters, LocationQuery, RepositoryProvider};
use storefront_engine::infrastructure::database::migrator::Migrator;
use storefront_engine::shared::errors::{AppError, InfraError};
use storefront_engine::{
    default_config_path, init_database, AppConfig, DatabaseConfig, SeaOrmRepositoryProvider,
};

const USAGE: &str = "usage: storefront-engine <preview SERVICE_TYPE | locate PINCODE | locate LAT LON | catalog AREA_ID SERVICE_TYPE [SEARCH]>";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // ── Load configuration ─────────────────────────────────────
    let config_path = std::env::var("STOREFRONT_CONFIG")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| default_config_path());
    let app_cfg = match AppConfig::load(&config_path) {
        Ok(cfg) => {
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cfg.logging.level)),
                )
                .with_writer(std::io::stderr)
                .init();
            info!("Configuration loaded from {}", config_path.display());
            cfg
        }
        Err(e) => {
            tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::new("info"))
                .with_writer(std::io::stderr)
                .init();
            error!("Failed to load config: {}. Using defaults.", e);
            AppConfig::default()
        }
    };

    // ── Prometheus metrics recorder (must be installed before any metrics calls) ──
    let prometheus_handle = metrics_exporter_prometheus::PrometheusBuilder::new().install_recorder()?;

    // ── Database ───────────────────────────────────────────────
    let db_config = DatabaseConfig::from(&app_cfg.database);
    let db = match init_database(&db_config).await {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to connect to database: {}", e);
            return Err(e.into());
        }
    };

    info!("Running database migrations...");
    if let Err(e) = Migrator::up(&db, None).await {
        error!("Failed to run migrations: {}", e);
        return Err(e.into());
    }
    info!("Migrations completed");

    let repos: Arc<dyn RepositoryProvider> = Arc::new(SeaOrmRepositoryProvider::new(db));

    // ── Command ────────────────────────────────────────────────
    let args: Vec<String> = std::env::args().skip(1).collect();
    let args: Vec<&str> = args.iter().map(String::as_str).collect();

    let output = match run(&args, repos, &app_cfg).await {
        Ok(output) => output,
        Err(AppError::Usage(msg)) => {
            eprintln!("{}\n{}", msg, USAGE);
            std::process::exit(2);
        }
        Err(e) => {
            error!("Command failed: {}", e);
            return Err(e.into());
        }
    };

    println!("{}", output);
    debug!("Metrics:\n{}", prometheus_handle.render());
    Ok(())
}

async fn run(args: &[&str], repos: Arc<dyn RepositoryProvider>, cfg: &AppConfig) -> Result<String, AppError> {
    let json = match args {
        ["preview", service_type] => {
            let fields = BindingResolver::new(repos).resolve_bindings(service_type).await?;
            serde_json::to_string_pretty(&generate_preview(&fields))
        }
        ["locate", pincode] => {
            let resolution = LocationResolver::new(repos, cfg.location.clone())
                .resolve_location(&LocationQuery::pincode(*pincode))
                .await?;
            serde_json::to_string_pretty(&resolution)
        }
        ["locate", latitude, longitude] => {
            let query = LocationQuery::coordinates(parse_arg(latitude)?, parse_arg(longitude)?);
            let resolution = LocationResolver::new(repos, cfg.location.clone())
                .resolve_location(&query)
                .await?;
            serde_json::to_string_pretty(&resolution)
        }
        ["catalog", area_id, service_type, rest @ ..] => {
            let filters = CatalogFilters {
                search_term: (!rest.is_empty()).then(|| rest.join(" ")),
                ..Default::default()
            };
            let entries = CatalogResolver::new(repos, cfg.catalog.clone())
                .resolve_catalog(parse_arg(area_id)?, service_type, &filters)
                .await?;
            serde_json::to_string_pretty(&entries)
        }
        _ => return Err(AppError::Usage("unrecognized command".to_string())),
    };
    json.map_err(|e| InfraError::from(e).into())
}

fn parse_arg<T: std::str::FromStr>(raw: &str) -> Result<T, AppError> {
    raw.parse()
        .map_err(|_| AppError::Usage(format!("invalid argument '{}'", raw)))
}
