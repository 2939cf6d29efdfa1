mod auth_cmd;
mod config;
mod plan_cmd;
mod session_file;
mod task_cmds;
#[cfg(test)]
mod test_util;

use anyhow::Result;
use clap::{Parser, Subcommand};

use minder_core::tasklist::Filter;
use minder_db::pool;

use config::MinderConfig;

#[derive(Parser)]
#[command(name = "minder", about = "Credential-gated to-do task manager")]
struct Cli {
    /// Database URL (overrides MINDER_DATABASE_URL env var)
    #[arg(long, global = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a minder config file (no database required)
    Init {
        /// SQLite connection URL
        #[arg(long)]
        db_url: Option<String>,
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
    /// Initialize the minder database (requires config file or env vars)
    DbInit,
    /// Create an account
    Register {
        /// Username for the new account
        username: String,
        /// Password (prompted when omitted)
        #[arg(long)]
        password: Option<String>,
    },
    /// Log in and start a session
    Login {
        /// Username to log in as
        username: String,
        /// Password (prompted when omitted)
        #[arg(long)]
        password: Option<String>,
    },
    /// End the current session
    Logout,
    /// Add a task
    Add {
        /// Task description
        name: String,
    },
    /// Show tasks
    List {
        /// Which tasks to show: all, active, or completed
        #[arg(long, default_value_t = Filter::All)]
        filter: Filter,
    },
    /// Toggle a task between active and completed
    Toggle {
        /// Task id (shown by `minder list`)
        id: i64,
    },
    /// Rename a task
    Rename {
        /// Task id
        id: i64,
        /// New task description
        name: String,
    },
    /// Delete a task
    Delete {
        /// Task id
        id: i64,
    },
    /// Delete every completed task
    ClearCompleted,
    /// Generate a step-by-step plan for a task
    Plan {
        /// Task id
        id: i64,
    },
}

/// Execute the `minder init` command: write config file.
fn cmd_init(db_url: Option<&str>, force: bool) -> Result<()> {
    let path = config::config_path();

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}\nUse --force to overwrite.",
            path.display()
        );
    }

    let db_url = db_url
        .map(str::to_owned)
        .unwrap_or_else(minder_db::config::DbConfig::default_url);
    let token_secret = config::generate_token_secret();

    let cfg = config::ConfigFile {
        database: config::DatabaseSection {
            url: db_url.clone(),
        },
        auth: config::AuthSection {
            token_secret: token_secret.clone(),
        },
    };

    config::save_config(&cfg)?;

    println!("Config written to {}", path.display());
    println!("  database.url = {db_url}");
    println!(
        "  auth.token_secret = {}...{}",
        &token_secret[..8],
        &token_secret[56..]
    );
    println!();
    println!("Next: run `minder db-init` to create and migrate the database.");

    Ok(())
}

/// Execute the `minder db-init` command: create the database file and run
/// migrations.
async fn cmd_db_init(cli_db_url: Option<&str>) -> Result<()> {
    let resolved = MinderConfig::resolve(cli_db_url)?;

    println!("Initializing minder database...");

    pool::ensure_database_dir(&resolved.db_config)?;
    let db_pool = pool::create_pool(&resolved.db_config).await?;
    pool::run_migrations(&db_pool).await?;

    let counts = pool::table_counts(&db_pool).await?;
    println!("Database ready. Tables:");
    for (table, count) in &counts {
        println!("  {table}: {count} rows");
    }

    db_pool.close().await;

    println!("minder db-init complete.");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init { db_url, force } => {
            cmd_init(db_url.as_deref(), force)?;
        }
        Commands::DbInit => {
            cmd_db_init(cli.database_url.as_deref()).await?;
        }
        Commands::Register { username, password } => {
            let resolved = MinderConfig::resolve(cli.database_url.as_deref())?;
            let db_pool = pool::create_pool(&resolved.db_config).await?;
            let result = auth_cmd::run_register(&db_pool, &username, password).await;
            db_pool.close().await;
            result?;
        }
        Commands::Login { username, password } => {
            let resolved = MinderConfig::resolve(cli.database_url.as_deref())?;
            let db_pool = pool::create_pool(&resolved.db_config).await?;
            let result = auth_cmd::run_login(
                &db_pool,
                &resolved.session_config,
                &username,
                password,
            )
            .await;
            db_pool.close().await;
            result?;
        }
        Commands::Logout => {
            auth_cmd::run_logout()?;
        }
        Commands::Add { name } => {
            let resolved = MinderConfig::resolve(cli.database_url.as_deref())?;
            let db_pool = pool::create_pool(&resolved.db_config).await?;
            let result = async {
                let mut list =
                    task_cmds::open_task_list(&db_pool, &resolved.session_config).await?;
                task_cmds::run_add(&mut list, &name).await
            }
            .await;
            db_pool.close().await;
            result?;
        }
        Commands::List { filter } => {
            let resolved = MinderConfig::resolve(cli.database_url.as_deref())?;
            let db_pool = pool::create_pool(&resolved.db_config).await?;
            let result = async {
                let list = task_cmds::open_task_list(&db_pool, &resolved.session_config).await?;
                task_cmds::run_list(&list, filter);
                Ok::<(), anyhow::Error>(())
            }
            .await;
            db_pool.close().await;
            result?;
        }
        Commands::Toggle { id } => {
            let resolved = MinderConfig::resolve(cli.database_url.as_deref())?;
            let db_pool = pool::create_pool(&resolved.db_config).await?;
            let result = async {
                let mut list =
                    task_cmds::open_task_list(&db_pool, &resolved.session_config).await?;
                task_cmds::run_toggle(&mut list, id).await
            }
            .await;
            db_pool.close().await;
            result?;
        }
        Commands::Rename { id, name } => {
            let resolved = MinderConfig::resolve(cli.database_url.as_deref())?;
            let db_pool = pool::create_pool(&resolved.db_config).await?;
            let result = async {
                let mut list =
                    task_cmds::open_task_list(&db_pool, &resolved.session_config).await?;
                task_cmds::run_rename(&mut list, id, &name).await
            }
            .await;
            db_pool.close().await;
            result?;
        }
        Commands::Delete { id } => {
            let resolved = MinderConfig::resolve(cli.database_url.as_deref())?;
            let db_pool = pool::create_pool(&resolved.db_config).await?;
            let result = async {
                let mut list =
                    task_cmds::open_task_list(&db_pool, &resolved.session_config).await?;
                task_cmds::run_delete(&mut list, id).await
            }
            .await;
            db_pool.close().await;
            result?;
        }
        Commands::ClearCompleted => {
            let resolved = MinderConfig::resolve(cli.database_url.as_deref())?;
            let db_pool = pool::create_pool(&resolved.db_config).await?;
            let result = async {
                let mut list =
                    task_cmds::open_task_list(&db_pool, &resolved.session_config).await?;
                task_cmds::run_clear_completed(&mut list).await
            }
            .await;
            db_pool.close().await;
            result?;
        }
        Commands::Plan { id } => {
            let resolved = MinderConfig::resolve(cli.database_url.as_deref())?;
            let db_pool = pool::create_pool(&resolved.db_config).await?;
            let result = async {
                let mut list =
                    task_cmds::open_task_list(&db_pool, &resolved.session_config).await?;
                plan_cmd::run_plan(&mut list, id).await
            }
            .await;
            db_pool.close().await;
            result?;
        }
    }

    Ok(())
}
