//! CLI administration tool for the Blogify gateway.
//!
//! Provides commands for managing customer accounts and performing database
//! operations without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Create a customer (interactive)
//! cargo run --bin admin -- customer create
//!
//! # Create an admin account
//! cargo run --bin admin -- customer create --role admin
//!
//! # List customers
//! cargo run --bin admin -- customer list
//!
//! # Delete a customer by id or email
//! cargo run --bin admin -- customer delete ada@example.com
//!
//! # Promote an existing customer to admin
//! cargo run --bin admin -- customer promote ada@example.com
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (required): PostgreSQL connection string

use blogify::application::services::CustomerService;
use blogify::domain::entities::{Customer, NewCustomer, ROLE_ADMIN, ROLE_USER};
use blogify::domain::repositories::CustomerRepository;
use blogify::infrastructure::persistence::PgCustomerRepository;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input};
use rand::{Rng, distr::Alphanumeric};
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing the Blogify gateway.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Manage customer accounts
    Customer {
        #[command(subcommand)]
        action: CustomerAction,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Customer management subcommands.
#[derive(Subcommand)]
enum CustomerAction {
    /// Create a new customer account
    Create {
        /// Customer name
        #[arg(short, long)]
        name: Option<String>,

        /// Customer email
        #[arg(short, long)]
        email: Option<String>,

        /// Account role (user or admin)
        #[arg(short, long, default_value = "user")]
        role: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// List all customers
    List,

    /// Delete a customer by id or email
    Delete {
        /// Customer id or email
        id_or_email: String,
    },

    /// Promote a customer to the admin role
    Promote {
        /// Customer email
        email: String,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from the dotenv files the server uses
    dotenvy::from_path("config/config.env").ok();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let pool = PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::Customer { action } => handle_customer_action(action, &pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

/// Dispatches customer management commands.
async fn handle_customer_action(action: CustomerAction, pool: &PgPool) -> Result<()> {
    let repo = Arc::new(PgCustomerRepository::new(Arc::new(pool.clone())));

    match action {
        CustomerAction::Create {
            name,
            email,
            role,
            yes,
        } => {
            create_customer(repo, name, email, role, yes).await?;
        }
        CustomerAction::List => {
            list_customers(repo).await?;
        }
        CustomerAction::Delete { id_or_email } => {
            delete_customer(repo, id_or_email).await?;
        }
        CustomerAction::Promote { email } => {
            promote_customer(repo, pool, email).await?;
        }
    }

    Ok(())
}

/// Creates a customer account with interactive prompts.
///
/// A random temporary password is generated and shown once; it should be
/// changed after the first login.
async fn create_customer(
    repo: Arc<PgCustomerRepository>,
    name: Option<String>,
    email: Option<String>,
    role: String,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "Create customer".bright_blue().bold());
    println!();

    if role != ROLE_USER && role != ROLE_ADMIN {
        anyhow::bail!("Role must be '{}' or '{}'", ROLE_USER, ROLE_ADMIN);
    }

    let name = match name {
        Some(n) => n,
        None => Input::new().with_prompt("Name").interact_text()?,
    };

    let email: String = match email {
        Some(e) => e,
        None => Input::new().with_prompt("Email").interact_text()?,
    };
    let email = email.trim().to_ascii_lowercase();

    let password = generate_password();

    println!();
    println!("{}", "Account details:".bright_white().bold());
    println!("  Name:     {}", name.cyan());
    println!("  Email:    {}", email.cyan());
    println!("  Role:     {}", role.cyan());
    println!("  Password: {}", password.bright_yellow().bold());
    println!();
    println!(
        "{}",
        "IMPORTANT: Save this password now! You won't be able to see it again."
            .red()
            .bold()
    );
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Create this account?")
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "Cancelled".red());
            return Ok(());
        }
    }

    let password_hash = CustomerService::hash_password(&password)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?;

    let customer = repo
        .create(NewCustomer {
            name,
            email,
            password_hash,
            role,
        })
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create customer: {}", e))?;

    println!();
    println!(
        "{} (id {})",
        "Customer created successfully!".green().bold(),
        customer.id
    );

    Ok(())
}

/// Lists all customers.
async fn list_customers(repo: Arc<PgCustomerRepository>) -> Result<()> {
    println!("{}", "Customers".bright_blue().bold());
    println!();

    let total = repo
        .count()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to count customers: {}", e))?;

    let customers = repo
        .list(0, total.max(1))
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list customers: {}", e))?;

    if customers.is_empty() {
        println!("{}", "  No customers found".yellow());
        return Ok(());
    }

    println!(
        "  {:<5} {:<25} {:<30} {:<20} {:<6}",
        "ID".bright_white().bold(),
        "Name".bright_white().bold(),
        "Email".bright_white().bold(),
        "Created".bright_white().bold(),
        "Role".bright_white().bold()
    );
    println!("  {}", "-".repeat(90).bright_black());

    for customer in &customers {
        println!(
            "  {:<5} {:<25} {:<30} {:<20} {}",
            customer.id.to_string().bright_black(),
            customer.name.cyan(),
            customer.email,
            customer
                .created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black(),
            if customer.is_admin() {
                customer.role.bright_yellow()
            } else {
                customer.role.normal()
            }
        );
    }

    println!();
    println!("  Total: {}", total.to_string().bright_white().bold());

    Ok(())
}

/// Deletes a customer by id or email, with confirmation.
async fn delete_customer(repo: Arc<PgCustomerRepository>, id_or_email: String) -> Result<()> {
    println!("{}", "Delete customer".bright_blue().bold());
    println!();

    let customer = find_customer(&repo, &id_or_email).await?;

    let Some(customer) = customer else {
        println!("{}", format!("No customer matching '{}'", id_or_email).yellow());
        return Ok(());
    };

    println!(
        "  {} <{}> (id {})",
        customer.name.cyan(),
        customer.email,
        customer.id
    );

    let confirmed = Confirm::new()
        .with_prompt("Delete this account? This cannot be undone")
        .default(false)
        .interact()?;

    if !confirmed {
        println!("{}", "Cancelled".red());
        return Ok(());
    }

    repo.delete(customer.id)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to delete customer: {}", e))?;

    println!("{}", "Customer deleted".green().bold());

    Ok(())
}

/// Promotes a customer to the admin role.
async fn promote_customer(
    repo: Arc<PgCustomerRepository>,
    pool: &PgPool,
    email: String,
) -> Result<()> {
    let email = email.trim().to_ascii_lowercase();

    let customer = repo
        .find_by_email(&email)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?;

    let Some(customer) = customer else {
        println!("{}", format!("No customer with email '{}'", email).yellow());
        return Ok(());
    };

    if customer.is_admin() {
        println!("{}", "Already an admin".yellow());
        return Ok(());
    }

    sqlx::query("UPDATE customers SET role = $2, updated_at = NOW() WHERE id = $1")
        .bind(customer.id)
        .bind(ROLE_ADMIN)
        .execute(pool)
        .await
        .context("Failed to promote customer")?;

    println!(
        "{} {} is now an admin",
        "Done:".green().bold(),
        customer.email.cyan()
    );

    Ok(())
}

/// Dispatches database commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "Database check".bright_blue().bold());

            sqlx::query_scalar::<_, i32>("SELECT 1")
                .fetch_one(pool)
                .await
                .context("Database check failed")?;

            println!("{}", "Connection OK".green().bold());
        }
    }

    Ok(())
}

/// Resolves a customer by numeric id or email.
async fn find_customer(
    repo: &PgCustomerRepository,
    id_or_email: &str,
) -> Result<Option<Customer>> {
    let found = match id_or_email.parse::<i64>() {
        Ok(id) => repo
            .find_by_id(id)
            .await
            .map_err(|e| anyhow::anyhow!("Database error: {}", e))?,
        Err(_) => repo
            .find_by_email(&id_or_email.trim().to_ascii_lowercase())
            .await
            .map_err(|e| anyhow::anyhow!("Database error: {}", e))?,
    };

    Ok(found)
}

/// Generates a 16-character alphanumeric temporary password.
fn generate_password() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(16)
        .map(char::from)
        .collect()
}
