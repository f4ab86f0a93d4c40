mod config;
mod graphql;
mod http;

use std::{
    fs,
    io::{self, Write},
    path::PathBuf,
    sync::Arc,
};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use dotenvy::dotenv;
use migration::{Migrator, MigratorTrait};
use platform_db::{DbPool, connect};
use platform_obs::{ObsConfig, init_tracing, shutdown_tracing};
use products_hr::{
    drafting::Drafter,
    legacy::{self, LegacySnapshot},
    seed,
};
use tracing::info;

use crate::{
    config::AppConfig,
    graphql::GraphqlData,
    http::{AppState, ServeConfig},
};

#[derive(Parser, Debug)]
#[command(name = "hr-tracker", version, about = "HR lifecycle tracker")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP + GraphQL server.
    Serve(ServeCommand),
    /// Run database migrations.
    #[command(subcommand)]
    Migrate(MigrateCommand),
    /// Insert the Doha Oasis and Kien rosters into an empty employee table.
    Seed,
    /// Print the GraphQL schema in SDL.
    #[command(name = "schema:print")]
    SchemaPrint {
        #[arg(long, value_name = "FILE", help = "Destination file path")]
        output: Option<PathBuf>,
    },
    /// Load a legacy JSON snapshot into an empty store.
    Import {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Write the store as a legacy JSON snapshot.
    Export {
        #[arg(long, value_name = "FILE", help = "Destination file path (stdout when omitted)")]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
enum MigrateCommand {
    /// Apply pending migrations.
    Up,
    /// Rollback the most recent migration.
    Down,
    /// Drop every table and re-apply all migrations.
    Reset,
}

#[derive(Args, Debug)]
struct ServeCommand {
    #[arg(long, default_value = "0.0.0.0")]
    host: std::net::IpAddr,
    #[arg(long, default_value_t = 8080)]
    port: u16,
    #[arg(long, help = "Allow starting even when migrations are pending")]
    allow_dirty: bool,
}

impl From<&ServeCommand> for ServeConfig {
    fn from(value: &ServeCommand) -> Self {
        ServeConfig::new(value.host, value.port)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    init_tracing(ObsConfig::from_env())?;
    let cli = Cli::parse();
    let result = run(cli).await;
    shutdown_tracing();
    result
}

async fn run(cli: Cli) -> Result<()> {
    let app_config = Arc::new(AppConfig::load()?);
    match cli.command {
        Command::Serve(cmd) => run_server(cmd, app_config).await,
        Command::Migrate(action) => {
            let pool = setup_pool(&app_config).await?;
            match action {
                MigrateCommand::Up => {
                    Migrator::up(&pool, None).await?;
                    info!("database migrations applied");
                }
                MigrateCommand::Down => {
                    Migrator::down(&pool, Some(1)).await?;
                    info!("most recent migration rolled back");
                }
                MigrateCommand::Reset => {
                    Migrator::fresh(&pool).await?;
                    info!("database reset to an empty schema");
                }
            }
            Ok(())
        }
        Command::Seed => run_seed(&app_config).await,
        Command::SchemaPrint { output } => schema_print(&app_config, output).await,
        Command::Import { file } => run_import(&app_config, file).await,
        Command::Export { output } => run_export(&app_config, output).await,
    }
}

async fn setup_pool(config: &AppConfig) -> Result<DbPool> {
    connect(&config.database).await.map_err(Into::into)
}

fn build_schema(pool: DbPool, config: &AppConfig) -> Result<graphql::SchemaType> {
    let drafter = Drafter::from_config(config.drafting.clone())
        .context("failed to build the AI drafting client")?;
    Ok(graphql::build_schema(GraphqlData {
        pool,
        drafter: Arc::new(drafter),
    }))
}

async fn run_server(cmd: ServeCommand, config: Arc<AppConfig>) -> Result<()> {
    let pool = setup_pool(&config).await?;
    ensure_migrations(&pool, cmd.allow_dirty).await?;
    if config.seed_on_start {
        let inserted = seed::seed_rosters(&pool).await?;
        if inserted > 0 {
            info!(inserted, "employee rosters seeded");
        }
    }
    let schema = build_schema(pool.clone(), &config)?;
    let state = AppState {
        pool,
        schema,
        config: config.clone(),
    };
    http::serve((&cmd).into(), state).await
}

async fn ensure_migrations(pool: &DbPool, allow_dirty: bool) -> Result<()> {
    let pending = Migrator::get_pending_migrations(pool).await?;
    if !pending.is_empty() && !allow_dirty {
        anyhow::bail!(
            "pending migrations detected; run `hr-tracker migrate up` or pass --allow-dirty"
        );
    }
    Ok(())
}

async fn run_seed(config: &AppConfig) -> Result<()> {
    let pool = setup_pool(config).await?;
    ensure_migrations(&pool, false).await?;
    let inserted = seed::seed_rosters(&pool).await?;
    if inserted == 0 {
        info!("employee table already populated; nothing seeded");
    } else {
        info!(inserted, "employee rosters seeded");
    }
    Ok(())
}

async fn schema_print(config: &AppConfig, path: Option<PathBuf>) -> Result<()> {
    // SDL generation never touches the database.
    let pool = connect(&platform_db::DatabaseSettings::in_memory()).await?;
    let sdl = build_schema(pool, config)?.sdl();
    write_output(path, &sdl)
}

async fn run_import(config: &AppConfig, file: PathBuf) -> Result<()> {
    let raw = fs::read_to_string(&file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let snapshot: LegacySnapshot = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a valid snapshot", file.display()))?;
    let pool = setup_pool(config).await?;
    ensure_migrations(&pool, false).await?;
    let summary = legacy::import_snapshot(&pool, snapshot).await?;
    info!(
        employees = summary.employees,
        positions = summary.positions,
        tasks = summary.tasks,
        requests = summary.requests,
        onboardings = summary.onboardings,
        separations = summary.separations,
        performance = summary.performance,
        skipped = summary.skipped,
        "legacy snapshot imported"
    );
    Ok(())
}

async fn run_export(config: &AppConfig, output: Option<PathBuf>) -> Result<()> {
    let pool = setup_pool(config).await?;
    ensure_migrations(&pool, false).await?;
    let snapshot = legacy::export_snapshot(&pool).await?;
    let json = serde_json::to_string_pretty(&snapshot)?;
    write_output(output, &json)
}

fn write_output(path: Option<PathBuf>, contents: &str) -> Result<()> {
    match path {
        Some(path) => {
            fs::write(&path, contents)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), "output written");
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(contents.as_bytes())?;
            stdout.write_all(b"\n")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_import_and_export() {
        let cli = Cli::try_parse_from(["hr-tracker", "import", "snapshot.json"]).unwrap();
        assert!(matches!(cli.command, Command::Import { file } if file == PathBuf::from("snapshot.json")));

        let cli = Cli::try_parse_from(["hr-tracker", "export", "--output", "out.json"]).unwrap();
        assert!(matches!(cli.command, Command::Export { output: Some(_) }));
    }

    #[test]
    fn cli_parses_migrate_reset_and_schema_print() {
        let cli = Cli::try_parse_from(["hr-tracker", "migrate", "reset"]).unwrap();
        assert!(matches!(cli.command, Command::Migrate(MigrateCommand::Reset)));

        let cli = Cli::try_parse_from(["hr-tracker", "schema:print"]).unwrap();
        assert!(matches!(cli.command, Command::SchemaPrint { output: None }));
    }
}
