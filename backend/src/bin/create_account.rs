//! Create a login account with an Argon2 password digest.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::env;

use clap::Parser;
use color_eyre::eyre::{Context, Result, eyre};
use dashboard::domain::ports::AccountRepository;
use dashboard::domain::{Account, PASSWORD_MIN_LEN, PasswordDigest};
use dashboard::outbound::persistence::{
    DbPool, DieselAccountRepository, PoolConfig, run_pending_migrations,
};
use tokio::runtime::Builder;
use zeroize::Zeroizing;

const DATABASE_URL_ENV: &str = "DASHBOARD_DATABASE_URL";

/// `create-account` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "create-account",
    about = "Create a dashboard login account",
    version
)]
struct CliArgs {
    /// Display name shown after sign-in.
    #[arg(long)]
    name: String,
    /// Login email address.
    #[arg(long)]
    email: String,
    /// Plain-text password; hashed before storage.
    #[arg(long)]
    password: String,
    /// PostgreSQL connection string. Defaults to `DASHBOARD_DATABASE_URL`.
    #[arg(long = "database-url", value_name = "url")]
    database_url: Option<String>,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = CliArgs::parse();
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("failed to build tokio runtime")?;
    runtime.block_on(async_main(args))
}

async fn async_main(args: CliArgs) -> Result<()> {
    let database_url = match args.database_url {
        Some(url) => url,
        None => env::var(DATABASE_URL_ENV)
            .map_err(|_| eyre!("pass --database-url or set {DATABASE_URL_ENV}"))?,
    };
    let password = Zeroizing::new(args.password);
    if password.chars().count() < PASSWORD_MIN_LEN {
        return Err(eyre!(
            "password must be at least {PASSWORD_MIN_LEN} characters"
        ));
    }

    let digest = PasswordDigest::hash(password.as_str()).wrap_err("failed to hash password")?;
    let account = Account::try_new(&args.name, &args.email, digest)?;

    run_pending_migrations(&database_url)
        .await
        .wrap_err("failed to apply migrations")?;
    let pool = DbPool::new(PoolConfig::new(&database_url).with_max_size(1))
        .await
        .wrap_err("failed to connect to the database")?;
    DieselAccountRepository::new(pool)
        .insert(&account)
        .await
        .wrap_err("failed to store account")?;

    println!("created account {} for {}", account.id, account.email);
    Ok(())
}
