mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use pgforge_db::{Database, DatabaseConfig};
use pgforge_tools::{ToolContext, ToolError};

#[derive(Parser)]
#[command(name = "pgforge")]
#[command(about = "PostgreSQL schema and data tools with reversible migrations")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a read-only SQL query (always rolled back)
    Query {
        /// SQL to run
        sql: String,

        /// Positional parameters as JSON values, bound to $1, $2, ...
        #[arg(long = "param")]
        params: Vec<String>,
    },

    /// Execute a read-write SQL statement inside a committed transaction
    Execute {
        /// SQL to run
        sql: String,

        /// Positional parameters as JSON values, bound to $1, $2, ...
        #[arg(long = "param")]
        params: Vec<String>,
    },

    /// Migration management
    Migrate {
        #[command(subcommand)]
        migrate_command: MigrateCommands,
    },

    /// Schema changes recorded as reversible migrations
    Schema {
        #[command(subcommand)]
        schema_command: SchemaCommands,
    },

    /// Inspect database schemas and tables
    Inspect {
        #[command(subcommand)]
        inspect_command: InspectCommands,
    },

    /// Print tool definitions as JSON
    Tools,
}

#[derive(Subcommand)]
enum MigrateCommands {
    /// List all recorded migrations
    List,

    /// Apply recorded migrations in order
    Apply {
        /// Start at this migration id (inclusive)
        #[arg(long)]
        from: Option<String>,

        /// Re-run migrations already marked applied
        #[arg(long)]
        force: bool,
    },

    /// Revert a migration (the most recent by default)
    Revert {
        /// Migration id to revert
        #[arg(long)]
        id: Option<String>,
    },
}

#[derive(Subcommand)]
enum SchemaCommands {
    /// Create a table from a JSON spec file
    CreateTable {
        /// Path to the table spec
        spec: PathBuf,

        /// Description recorded with the migration
        #[arg(long)]
        description: Option<String>,
    },

    /// Create a function from a JSON spec file
    CreateFunction {
        spec: PathBuf,
        #[arg(long)]
        description: Option<String>,
    },

    /// Create a trigger from a JSON spec file
    CreateTrigger {
        spec: PathBuf,
        #[arg(long)]
        description: Option<String>,
    },

    /// Create an index from a JSON spec file
    CreateIndex {
        spec: PathBuf,
        #[arg(long)]
        description: Option<String>,
    },

    /// Alter a table from a JSON operation file
    Alter {
        spec: PathBuf,
        #[arg(long)]
        description: Option<String>,
    },
}

#[derive(Subcommand)]
enum InspectCommands {
    /// List database schemas
    Schemas,

    /// List tables in a schema
    Tables { schema: String },

    /// Describe the columns of a table
    Table { schema: String, table: String },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), ToolError> {
    // Tool definitions need no database connection
    if matches!(cli.command, Commands::Tools) {
        return commands::tools::print_definitions();
    }

    let config = DatabaseConfig::from_env()?;
    let database = Database::connect(config).await?;
    let migrations_dir =
        std::env::var("PGFORGE_MIGRATIONS_DIR").unwrap_or_else(|_| "migrations".to_string());
    let ctx = ToolContext::bootstrap(database, migrations_dir);

    match cli.command {
        Commands::Query { sql, params } => commands::query::query(&ctx, &sql, &params).await,
        Commands::Execute { sql, params } => commands::query::execute(&ctx, &sql, &params).await,
        Commands::Migrate { migrate_command } => match migrate_command {
            MigrateCommands::List => commands::migrate::list(&ctx).await,
            MigrateCommands::Apply { from, force } => {
                commands::migrate::apply(&ctx, from, force).await
            }
            MigrateCommands::Revert { id } => commands::migrate::revert(&ctx, id).await,
        },
        Commands::Schema { schema_command } => match schema_command {
            SchemaCommands::CreateTable { spec, description } => {
                commands::schema::run(&ctx, "create_table", &spec, description).await
            }
            SchemaCommands::CreateFunction { spec, description } => {
                commands::schema::run(&ctx, "create_function", &spec, description).await
            }
            SchemaCommands::CreateTrigger { spec, description } => {
                commands::schema::run(&ctx, "create_trigger", &spec, description).await
            }
            SchemaCommands::CreateIndex { spec, description } => {
                commands::schema::run(&ctx, "create_index", &spec, description).await
            }
            SchemaCommands::Alter { spec, description } => {
                commands::schema::run(&ctx, "alter_table", &spec, description).await
            }
        },
        Commands::Inspect { inspect_command } => match inspect_command {
            InspectCommands::Schemas => commands::inspect::schemas(&ctx).await,
            InspectCommands::Tables { schema } => commands::inspect::tables(&ctx, &schema).await,
            InspectCommands::Table { schema, table } => {
                commands::inspect::table(&ctx, &schema, &table).await
            }
        },
        Commands::Tools => unreachable!("handled before connecting"),
    }
}
