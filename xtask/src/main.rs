//! Developer tasks for the tenant manager, run as `cargo xtask <task>`
//! (see <https://github.com/matklad/cargo-xtask/>).
//!
//! The tasks provision and populate the tenant table the service reads. They
//! build the table from `tenant_manager_core::tenant::tenant_table_schema`,
//! the same declaration the server uses at startup:
//!
//! - `cargo xtask dynamodb deploy` creates the table, or realigns its capacity
//! - `cargo xtask dynamodb deploy --destroy` deletes it
//! - `cargo xtask dynamodb seed` writes demo tenants
//!
//! Point `AWS_ENDPOINT_URL` at a local DynamoDB to work without an AWS account.

use clap::Parser;

mod dynamodb;
mod prelude;

#[derive(Debug, Parser)]
#[command(name = "xtask")]
#[command(about = "Provision and seed the tenant manager's DynamoDB table", long_about = None)]
struct Cli {
    #[command(flatten)]
    global: Global,

    #[command(subcommand)]
    command: Commands,
}

/// Flags shared by every task.
#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// Print nothing but errors; prompts still appear unless --force is given
    #[clap(long, global = true)]
    pub silent: bool,
}

impl Global {
    pub fn is_silent(&self) -> bool {
        self.silent
    }
}

#[derive(Debug, clap::Subcommand)]
enum Commands {
    /// Create, update, destroy or seed the tenant table
    Dynamodb(dynamodb::DynamodbCommand),
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Dynamodb(cmd) => dynamodb::run(cmd, cli.global).await?,
    }

    Ok(())
}
