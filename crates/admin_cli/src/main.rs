use std::error::Error;

use clap::{Args, Parser, Subcommand};
use engine::Engine;
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection, EntityTrait, Set};

mod users {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
    #[sea_orm(table_name = "users")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub username: String,
        pub password: String,
        pub store_id: String,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

#[derive(Parser, Debug)]
#[command(name = "stockledger_admin")]
#[command(about = "Admin utilities for stockledger (bootstrap users and catalog)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite:./stockledger.db?mode=rwc"
    )]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    User(User),
    Supplier(Supplier),
    Product(Product),
}

#[derive(Args, Debug)]
struct User {
    #[command(subcommand)]
    command: UserCommand,
}

#[derive(Subcommand, Debug)]
enum UserCommand {
    Create(UserCreateArgs),
}

#[derive(Args, Debug)]
struct UserCreateArgs {
    #[arg(long)]
    username: String,
    #[arg(long, env = "STOCKLEDGER_PASSWORD", hide_env_values = true)]
    password: String,
    #[arg(long)]
    store: String,
}

#[derive(Args, Debug)]
struct Supplier {
    #[command(subcommand)]
    command: SupplierCommand,
}

#[derive(Subcommand, Debug)]
enum SupplierCommand {
    Create(SupplierCreateArgs),
}

#[derive(Args, Debug)]
struct SupplierCreateArgs {
    #[arg(long)]
    store: String,
    #[arg(long)]
    name: String,
}

#[derive(Args, Debug)]
struct Product {
    #[command(subcommand)]
    command: ProductCommand,
}

#[derive(Subcommand, Debug)]
enum ProductCommand {
    Create(ProductCreateArgs),
}

#[derive(Args, Debug)]
struct ProductCreateArgs {
    #[arg(long)]
    store: String,
    #[arg(long)]
    name: String,
    /// Units on hand before any expense arrives.
    #[arg(long, default_value_t = 0)]
    stock: i64,
}

async fn connect_db(
    database_url: &str,
) -> Result<DatabaseConnection, Box<dyn Error + Send + Sync>> {
    let db = Database::connect(database_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();

    let db = connect_db(&cli.database_url).await?;

    match cli.command {
        Command::User(User {
            command: UserCommand::Create(args),
        }) => {
            if args.password.is_empty() {
                eprintln!("password must not be empty");
                std::process::exit(2);
            }

            if users::Entity::find_by_id(args.username.clone())
                .one(&db)
                .await?
                .is_some()
            {
                eprintln!("user already exists: {}", args.username);
                std::process::exit(1);
            }

            let user = users::ActiveModel {
                username: Set(args.username.clone()),
                password: Set(args.password),
                store_id: Set(args.store.clone()),
            };
            users::Entity::insert(user).exec(&db).await?;

            println!("created user: {} (store {})", args.username, args.store);
        }
        Command::Supplier(Supplier {
            command: SupplierCommand::Create(args),
        }) => {
            let engine = Engine::builder().database(db.clone()).build().await?;
            let supplier_id = engine.new_supplier(&args.store, &args.name).await?;
            println!("created supplier: {} ({supplier_id})", args.name);
        }
        Command::Product(Product {
            command: ProductCommand::Create(args),
        }) => {
            let engine = Engine::builder().database(db.clone()).build().await?;
            let product_id = engine
                .new_product(&args.store, &args.name, args.stock)
                .await?;
            println!("created product: {} ({product_id})", args.name);
        }
    }

    Ok(())
}
