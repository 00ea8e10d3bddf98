//! CLI administration tool for eventdesk.
//!
//! Bootstraps tenants, users and API tokens directly against the database,
//! without going through the HTTP API. This is how the first super admin and
//! their token come into existence.
//!
//! # Usage
//!
//! ```bash
//! # Create a tenant
//! cargo run --bin admin -- tenant create --name "Acme Events" --slug acme
//!
//! # Create the first super admin and a token for them
//! cargo run --bin admin -- user create --email root@example.com --name Root --role super_admin
//! cargo run --bin admin -- token create --email root@example.com --name "Ops laptop"
//!
//! # List and revoke tokens
//! cargo run --bin admin -- token list
//! cargo run --bin admin -- token revoke 4f0e1c2a-...
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` or `DB_*` (required): PostgreSQL connection
//! - `TOKEN_SIGNING_SECRET` (required for `token create`): must match the server

use eventdesk::application::services::AuthService;
use eventdesk::config::Config;
use eventdesk::domain::entities::{NewTenant, NewUser, Role};
use eventdesk::domain::page::PageRequest;
use eventdesk::domain::repositories::Repositories;
use eventdesk::infrastructure::persistence::pg_repositories;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

/// CLI tool for managing eventdesk.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage tenants
    Tenant {
        #[command(subcommand)]
        action: TenantAction,
    },

    /// Manage users
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Manage API tokens
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum TenantAction {
    /// Create a new tenant
    Create {
        #[arg(short, long)]
        name: Option<String>,

        /// URL-safe identifier, e.g. "acme"
        #[arg(short, long)]
        slug: Option<String>,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// List tenants
    List {
        /// Filter by name or slug
        #[arg(short, long)]
        search: Option<String>,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Create a user
    Create {
        #[arg(short, long)]
        email: String,

        /// Display name
        #[arg(short, long)]
        name: String,

        /// staff, manager, tenant_admin or super_admin
        #[arg(short, long, default_value = "tenant_admin")]
        role: String,

        /// Tenant slug; must be omitted for super admins
        #[arg(short, long)]
        tenant: Option<String>,
    },
}

#[derive(Subcommand)]
enum TokenAction {
    /// Issue a token for a user
    Create {
        /// Email of the owning user
        #[arg(short, long)]
        email: String,

        /// Token name (e.g., "Ops laptop", "CI")
        #[arg(short, long)]
        name: Option<String>,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// List tokens, optionally of one user
    List {
        #[arg(short, long)]
        email: Option<String>,
    },

    /// Revoke a token by ID
    Revoke { id: Uuid },
}

#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info and row counts
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url = Config::load_database_url()?;
    let pool = PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")?;
    let repos = pg_repositories(Arc::new(pool.clone()));

    match cli.command {
        Commands::Tenant { action } => handle_tenant_action(action, &repos).await?,
        Commands::User { action } => handle_user_action(action, &repos).await?,
        Commands::Token { action } => handle_token_action(action, &repos).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

async fn handle_tenant_action(action: TenantAction, repos: &Repositories) -> Result<()> {
    match action {
        TenantAction::Create { name, slug, yes } => create_tenant(repos, name, slug, yes).await,
        TenantAction::List { search } => list_tenants(repos, search).await,
    }
}

async fn create_tenant(
    repos: &Repositories,
    name: Option<String>,
    slug: Option<String>,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "Create Tenant".bright_blue().bold());
    println!();

    let name = match name {
        Some(n) => n,
        None => Input::new().with_prompt("Tenant name").interact_text()?,
    };
    let slug = match slug {
        Some(s) => s,
        None => Input::new()
            .with_prompt("Slug")
            .with_initial_text(slugify(&name))
            .interact_text()?,
    };
    let slug = slug.trim().to_lowercase();

    if !eventdesk::api::dto::tenant::SLUG_REGEX.is_match(&slug) {
        anyhow::bail!("Invalid slug '{slug}': use 2-63 characters of a-z, 0-9 and '-'");
    }
    if repos.tenants.find_by_slug(&slug).await?.is_some() {
        anyhow::bail!("Slug '{slug}' is already taken");
    }

    println!("  Name: {}", name.cyan());
    println!("  Slug: {}", slug.cyan());
    println!();

    if !skip_confirm && !confirm("Create this tenant?", true)? {
        return Ok(());
    }

    let tenant = repos
        .tenants
        .create(NewTenant { name, slug })
        .await
        .context("Failed to create tenant")?;

    println!("{}", "Tenant created".green().bold());
    println!("  ID: {}", tenant.id.to_string().bright_yellow());
    println!();

    Ok(())
}

async fn list_tenants(repos: &Repositories, search: Option<String>) -> Result<()> {
    println!("{}", "Tenants".bright_blue().bold());
    println!();

    let page = repos
        .tenants
        .list(search, PageRequest::new(1, 1000))
        .await
        .context("Failed to list tenants")?;

    if page.items.is_empty() {
        println!("{}", "  No tenants found".yellow());
        return Ok(());
    }

    println!(
        "  {:<36} {:<24} {:<30} {:<10}",
        "ID".bright_white().bold(),
        "Slug".bright_white().bold(),
        "Name".bright_white().bold(),
        "Status".bright_white().bold()
    );
    println!("  {}", "-".repeat(104).bright_black());

    for tenant in &page.items {
        let status = if tenant.is_deleted() {
            "DELETED".red()
        } else if tenant.is_active {
            "ACTIVE".green()
        } else {
            "INACTIVE".yellow()
        };

        println!(
            "  {:<36} {:<24} {:<30} {}",
            tenant.id.to_string().bright_black(),
            tenant.slug.cyan(),
            tenant.name,
            status
        );
    }

    println!();
    println!("  Total: {}", page.total.to_string().bright_white().bold());
    println!();

    Ok(())
}

async fn handle_user_action(action: UserAction, repos: &Repositories) -> Result<()> {
    let UserAction::Create {
        email,
        name,
        role,
        tenant,
    } = action;

    let role: Role = role.parse()?;
    let tenant_id = match (role, tenant) {
        (Role::SuperAdmin, None) => None,
        (Role::SuperAdmin, Some(_)) => anyhow::bail!("Super admins do not belong to a tenant"),
        (_, None) => anyhow::bail!("--tenant is required for role {role}"),
        (_, Some(slug)) => {
            let tenant = repos
                .tenants
                .find_by_slug(&slug)
                .await?
                .filter(|t| !t.is_deleted())
                .with_context(|| format!("Tenant '{slug}' not found"))?;
            Some(tenant.id)
        }
    };

    let email = email.trim().to_lowercase();
    if repos.users.find_by_email(&email).await?.is_some() {
        anyhow::bail!("Email '{email}' is already registered");
    }

    let user = repos
        .users
        .create(NewUser {
            tenant_id,
            email,
            display_name: name,
            role,
        })
        .await
        .context("Failed to create user")?;

    println!("{}", "User created".green().bold());
    println!("  ID:    {}", user.id.to_string().bright_yellow());
    println!("  Email: {}", user.email.cyan());
    println!("  Role:  {}", user.role);
    println!();
    println!(
        "  Issue a token with: {} admin -- token create --email {}",
        "cargo run --bin".bright_cyan(),
        user.email
    );

    Ok(())
}

async fn handle_token_action(action: TokenAction, repos: &Repositories) -> Result<()> {
    match action {
        TokenAction::Create { email, name, yes } => create_token(repos, email, name, yes).await,
        TokenAction::List { email } => list_tokens(repos, email).await,
        TokenAction::Revoke { id } => revoke_token(repos, id).await,
    }
}

fn auth_service(repos: &Repositories) -> Result<AuthService> {
    let secret =
        std::env::var("TOKEN_SIGNING_SECRET").context("TOKEN_SIGNING_SECRET must be set")?;
    Ok(AuthService::new(
        repos.tokens.clone(),
        repos.users.clone(),
        repos.tenants.clone(),
        secret,
    ))
}

/// Issues a token for an existing user.
///
/// Only the HMAC of the token is stored; the raw value is shown once.
async fn create_token(
    repos: &Repositories,
    email: String,
    name: Option<String>,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "Create API Token".bright_blue().bold());
    println!();

    let auth = auth_service(repos)?;
    let user = repos
        .users
        .find_by_email(&email.trim().to_lowercase())
        .await?
        .with_context(|| format!("User '{email}' not found"))?;
    if !user.is_active {
        anyhow::bail!("User '{}' is deactivated", user.email);
    }

    let token_name = match name {
        Some(n) => n,
        None => Input::new()
            .with_prompt("Token name")
            .with_initial_text("CLI")
            .interact_text()?,
    };

    println!("  User: {} ({})", user.email.cyan(), user.role);
    println!("  Name: {}", token_name.cyan());
    println!();

    if !skip_confirm && !confirm("Create this token?", true)? {
        return Ok(());
    }

    let (token, raw) = auth
        .issue_token(user.id, &token_name)
        .await
        .context("Failed to create token")?;

    println!("{}", "Token created".green().bold());
    println!("  ID:    {}", token.id.to_string().bright_black());
    println!("  Token: {}", raw.bright_yellow().bold());
    println!();
    println!(
        "{}",
        "IMPORTANT: Save this token now! You won't be able to see it again."
            .red()
            .bold()
    );
    println!();
    println!("{}", "Example:".bright_white());
    println!(
        "  curl -H \"Authorization: Bearer {}\" http://localhost:3000/api/users/me",
        raw.bright_yellow()
    );
    println!();

    Ok(())
}

async fn list_tokens(repos: &Repositories, email: Option<String>) -> Result<()> {
    println!("{}", "API Tokens".bright_blue().bold());
    println!();

    let user_id = match email {
        Some(email) => Some(
            repos
                .users
                .find_by_email(&email.trim().to_lowercase())
                .await?
                .with_context(|| format!("User '{email}' not found"))?
                .id,
        ),
        None => None,
    };

    let tokens = repos
        .tokens
        .list_tokens(user_id)
        .await
        .context("Failed to list tokens")?;

    if tokens.is_empty() {
        println!("{}", "  No tokens found".yellow());
        return Ok(());
    }

    println!(
        "  {:<36} {:<24} {:<18} {:<18} {:<10}",
        "ID".bright_white().bold(),
        "Name".bright_white().bold(),
        "Created".bright_white().bold(),
        "Last used".bright_white().bold(),
        "Status".bright_white().bold()
    );
    println!("  {}", "-".repeat(110).bright_black());

    for token in &tokens {
        let status = if token.is_revoked() {
            "REVOKED".red()
        } else {
            "ACTIVE".green()
        };
        let last_used = token
            .last_used_at
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "never".to_string());

        println!(
            "  {:<36} {:<24} {:<18} {:<18} {}",
            token.id.to_string().bright_black(),
            token.name.cyan(),
            token.created_at.format("%Y-%m-%d %H:%M").to_string(),
            last_used,
            status
        );
    }

    println!();
    println!("  Total: {}", tokens.len().to_string().bright_white().bold());
    println!();

    Ok(())
}

async fn revoke_token(repos: &Repositories, id: Uuid) -> Result<()> {
    println!("{}", "Revoke API Token".bright_blue().bold());
    println!();

    let token = repos
        .tokens
        .find_by_id(id)
        .await?
        .context("Token not found")?;

    if token.is_revoked() {
        println!("{}", "This token is already revoked".yellow());
        return Ok(());
    }

    println!("  Token: {}", token.name.cyan());
    println!("  ID:    {}", token.id.to_string().bright_black());
    println!();

    if !confirm("Revoke this token?", false)? {
        return Ok(());
    }

    repos
        .tokens
        .revoke_token(token.id)
        .await
        .context("Failed to revoke token")?;

    println!("{}", "Token revoked".green().bold());
    println!();

    Ok(())
}

async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "Checking database connection...".bright_blue());
            sqlx::query("SELECT 1").fetch_one(pool).await?;
            println!("{}", "Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;
            println!("  PostgreSQL: {}", version.bright_white());
            println!();

            for (label, sql) in [
                ("Tenants", "SELECT COUNT(*) FROM tenants WHERE deleted_at IS NULL"),
                ("Users", "SELECT COUNT(*) FROM users WHERE is_active"),
                ("Active tokens", "SELECT COUNT(*) FROM api_tokens WHERE revoked_at IS NULL"),
                ("Events", "SELECT COUNT(*) FROM events"),
                ("Documents", "SELECT COUNT(*) FROM documents"),
                ("Client logs", "SELECT COUNT(*) FROM client_logs"),
            ] {
                let count: i64 = sqlx::query_scalar(sql).fetch_one(pool).await?;
                println!(
                    "  {:<14} {}",
                    format!("{label}:"),
                    count.to_string().bright_green().bold()
                );
            }
            println!();
        }
    }

    Ok(())
}

fn confirm(prompt: &str, default: bool) -> Result<bool> {
    let confirmed = Confirm::new()
        .with_prompt(prompt)
        .default(default)
        .interact()?;
    if !confirmed {
        println!("{}", "Cancelled".red());
    }
    Ok(confirmed)
}

fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.trim().chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_matches('-').to_string()
}
