use bookshelf_cli::seeder::{self, SeedConfig};
use bookshelf_config::DatabaseConfig;
use bookshelf_core::hash_password;
use bookshelf_db::{PgStore, UserStore, init_db_pool, run_migrations};
use bookshelf_models::{NewUser, RegisterRequest};
use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};
use dotenvy::dotenv;
use sqlx::PgPool;
use validator::Validate;

#[derive(Parser)]
#[command(name = "bookshelf-cli")]
#[command(about = "Bookshelf CLI - Administrative tools for the Bookshelf API", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply pending database migrations
    Migrate,
    /// Create a user account
    CreateUser {
        /// Login name (3 characters or more)
        #[arg(short = 'u', long)]
        username: Option<String>,

        /// Display name
        #[arg(short = 'n', long)]
        name: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Seed the database with fake categories, books, users and reads
    Seed {
        /// Number of categories to create
        #[arg(short = 'c', long, default_value = "6")]
        categories: usize,

        /// Number of books per category
        #[arg(short = 'b', long, default_value = "20")]
        books: usize,

        /// Number of users to create
        #[arg(short = 'u', long, default_value = "25")]
        users: usize,

        /// Number of reading-log entries per user
        #[arg(short = 'r', long, default_value = "8")]
        reads: usize,
    },
    /// Clear all seeded data
    ClearSeed,
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    let cli = Cli::parse();

    let pool = match connect().await {
        Ok(pool) => pool,
        Err(e) => {
            eprintln!("❌ Failed to connect to database: {}", e);
            std::process::exit(1);
        }
    };

    match cli.command {
        Commands::Migrate => handle_migrate(&pool).await,
        Commands::CreateUser {
            username,
            name,
            password,
        } => handle_create_user(&pool, username, name, password).await,
        Commands::Seed {
            categories,
            books,
            users,
            reads,
        } => {
            let config = SeedConfig::default()
                .with_categories(categories)
                .with_books_per_category(books)
                .with_users(users)
                .with_reads_per_user(reads);
            handle_seed(&pool, config).await
        }
        Commands::ClearSeed => handle_clear_seed(&pool).await,
    }
}

async fn connect() -> Result<PgPool, Box<dyn std::error::Error>> {
    let config = DatabaseConfig::from_env()?;
    Ok(init_db_pool(&config).await?)
}

async fn handle_migrate(pool: &PgPool) {
    match run_migrations(pool).await {
        Ok(_) => println!("✅ Migrations applied"),
        Err(e) => {
            eprintln!("\n❌ Error running migrations: {}", e);
            std::process::exit(1);
        }
    }
}

async fn handle_create_user(
    pool: &PgPool,
    username: Option<String>,
    name: Option<String>,
    password: Option<String>,
) {
    let username = match username {
        Some(username) => username,
        None => prompt(Input::<String>::new().with_prompt("Username").interact_text()),
    };

    let name = match name {
        Some(name) => name,
        None => prompt(
            Input::<String>::new()
                .with_prompt("Display name")
                .allow_empty(true)
                .interact_text(),
        ),
    };

    let password = match password {
        Some(password) => password,
        None => prompt(
            Password::new()
                .with_prompt("Password")
                .with_confirmation("Confirm password", "Passwords don't match")
                .interact(),
        ),
    };

    match create_user(pool, username, name, password).await {
        Ok(user) => {
            println!("\n✅ User created successfully!");
            println!("   ID: {}", user.id);
            println!("   Username: {}", user.username);
        }
        Err(e) => {
            eprintln!("\n❌ Error creating user: {}", e);
            std::process::exit(1);
        }
    }
}

fn prompt<T>(result: dialoguer::Result<T>) -> T {
    result.unwrap_or_else(|e| {
        eprintln!("❌ Failed to read input: {}", e);
        std::process::exit(1);
    })
}

/// Applies the same rules as `POST /register`.
async fn create_user(
    pool: &PgPool,
    username: String,
    name: String,
    password: String,
) -> Result<bookshelf_models::User, Box<dyn std::error::Error>> {
    let request = RegisterRequest {
        username: Some(username),
        password: Some(password),
        name: Some(name),
        img_path: None,
    };

    if let Err(errors) = request.validate() {
        let messages: Vec<String> = bookshelf_core::FieldErrors::from_validation(Err(errors))
            .iter()
            .map(|e| e.message.clone())
            .collect();
        return Err(messages.join("; ").into());
    }

    let store = PgStore::new(pool.clone());
    let username = request.username.unwrap_or_default();

    if store.username_exists(&username).await? {
        return Err(format!("Username '{}' is already taken", username).into());
    }

    let password_hash = hash_password(&request.password.unwrap_or_default())
        .map_err(|e| format!("Failed to hash password: {}", e.error))?;

    let user = store
        .create_user(NewUser {
            username,
            password_hash,
            name: request.name.unwrap_or_default(),
            img_path: None,
        })
        .await?;

    Ok(user)
}

async fn handle_seed(pool: &PgPool, config: SeedConfig) {
    if let Err(e) = seeder::seed_all(pool, config).await {
        eprintln!("\n❌ Error seeding database: {}", e);
        std::process::exit(1);
    }
}

async fn handle_clear_seed(pool: &PgPool) {
    if let Err(e) = seeder::clear_all(pool).await {
        eprintln!("\n❌ Error clearing seeded data: {}", e);
        std::process::exit(1);
    }
}
