use clap::{Parser, Subcommand};
use zenith_portfolio::{
    db::postgres::{create_pool, run_migrations},
    entities::user::NewUser,
    settings::{AppConfig, StorageBackend},
    shared_repos::SharedRepositories,
    AppState,
};

/// Administrative commands for the portfolio site.
#[derive(Parser)]
#[command(name = "manage", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Creates a login for the site owner.
    CreateUser {
        #[arg(long)]
        username: String,
        #[arg(long, env = "MANAGE_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Applies pending database migrations.
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = AppConfig::new()?;
    if config.storage != StorageBackend::Postgres {
        anyhow::bail!(
            "manage needs APP_STORAGE=postgres; with the memory backend set \
             APP_OWNER_USERNAME and APP_OWNER_PASSWORD instead"
        );
    }

    let pool = create_pool(&config.database_url).await?;
    run_migrations(&pool).await?;

    match cli.command {
        Command::Migrate => {}
        Command::CreateUser { username, password } => {
            let state = AppState::new(&config, SharedRepositories::postgres(pool));
            let id = state
                .auth_handler
                .create_user(NewUser { username: username.clone(), password })
                .await?;
            println!("Created user {} (id {})", username, id);
        }
    }

    Ok(())
}
