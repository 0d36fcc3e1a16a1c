//! DynamoDB infrastructure management commands.

mod client;
mod deploy;
mod error;
mod planning;
mod seed;

pub use error::{DynamodbError, Result};

use crate::prelude::*;
use dialoguer::Confirm;
use tenant_manager_core::tenant::tenant_table_schema;

/// DynamoDB infrastructure management commands.
#[derive(Debug, clap::Parser)]
pub struct DynamodbCommand {
    #[command(subcommand)]
    pub action: DynamodbAction,
}

/// Available DynamoDB actions.
#[derive(Debug, clap::Subcommand)]
pub enum DynamodbAction {
    /// Deploy or destroy the tenant table.
    Deploy(DeployCommand),

    /// Seed the tenant table with demo tenants.
    Seed(SeedCommand),
}

/// Deploy or update the tenant table.
#[derive(Debug, clap::Parser)]
#[command(long_about = "Deploy or destroy the tenant table.

By default, this command creates the tenant table keyed on `tenant_id`
with provisioned throughput, or brings the capacity of an existing table
back in line.

The command shows a plan of changes before applying and asks for confirmation.

Environment variables:
  AWS_ENDPOINT_URL    - Use local DynamoDB (e.g., http://localhost:8000)
  AWS_REGION          - AWS region (defaults to us-east-1)
  AWS_PROFILE         - AWS profile to use for credentials")]
pub struct DeployCommand {
    /// Skip confirmation prompts.
    #[arg(long)]
    pub force: bool,

    /// Destroy the table instead of creating/updating.
    #[arg(long)]
    pub destroy: bool,

    /// Table name to use.
    #[arg(long, default_value = "TenantBootstrap", env = "TENANT_TABLE_NAME")]
    pub table_name: String,
}

/// Seed the tenant table with demo tenants.
#[derive(Debug, clap::Parser)]
#[command(long_about = "Insert demo tenants into the tenant table.

Tenants get stable ids (tenant-001, tenant-002, ...) so seeding twice
overwrites the same records instead of duplicating them.")]
pub struct SeedCommand {
    /// Number of tenants to generate.
    #[arg(long, default_value = "8")]
    pub count: u32,

    /// Table name to use.
    #[arg(long, default_value = "TenantBootstrap", env = "TENANT_TABLE_NAME")]
    pub table_name: String,

    /// Skip confirmation prompts.
    #[arg(long)]
    pub force: bool,
}

/// Main entry point for dynamodb command.
pub async fn run(command: DynamodbCommand, global: crate::Global) -> Result<()> {
    match command.action {
        DynamodbAction::Deploy(deploy_cmd) => run_deploy(deploy_cmd, &global).await,
        DynamodbAction::Seed(seed_cmd) => run_seed(seed_cmd, &global).await,
    }
}

fn confirm(prompt: &str, default: bool) -> Result<()> {
    let confirmed = Confirm::new()
        .with_prompt(prompt)
        .default(default)
        .interact()?;

    if confirmed {
        Ok(())
    } else {
        Err(DynamodbError::UserCancelled)
    }
}

async fn run_deploy(cmd: DeployCommand, global: &crate::Global) -> Result<()> {
    let aws_config = client::AwsConfig::default();

    if !global.is_silent() {
        aprintln!("{} {}", p_b("Target:"), aws_config.target_display());
        aprintln!();
    }

    let dynamo_client = client::create_client(&aws_config).await;
    let current_state = client::get_table_state(&dynamo_client, &cmd.table_name).await?;

    if cmd.destroy {
        let plan = planning::calculate_destroy_plan(current_state.as_ref(), &cmd.table_name);

        if !global.is_silent() {
            aprintln!("{}", p_y("Destroy Plan:"));
            for line in planning::format_destroy_plan(&plan) {
                aprintln!("  {}", p_r(&line));
            }
            aprintln!();
        }

        if matches!(plan, planning::DestroyPlan::AlreadyGone { .. }) {
            if !global.is_silent() {
                aprintln!("{}", p_g("Nothing to destroy."));
            }
            return Ok(());
        }

        if !cmd.force {
            confirm(
                "Are you sure you want to delete this table? ALL DATA WILL BE LOST",
                false,
            )?;
        }

        if !global.is_silent() {
            aprintln!("{}", p_b("Deleting table..."));
        }

        deploy::execute_destroy_plan(&dynamo_client, &plan).await?;

        if !global.is_silent() {
            aprintln!("{}", p_g("Table destroyed successfully."));
        }
        return Ok(());
    }

    let schema = tenant_table_schema(&cmd.table_name);
    let plan = planning::calculate_deploy_plan(current_state.as_ref(), &schema);

    if !global.is_silent() {
        aprintln!("{}", p_c("Deploy Plan:"));
        for line in planning::format_deploy_plan(&plan) {
            if line.starts_with('+') {
                aprintln!("  {}", p_g(&line));
            } else if line.starts_with('!') {
                aprintln!("  {}", p_r(&line));
            } else if line.starts_with('~') {
                aprintln!("  {}", p_y(&line));
            } else {
                aprintln!("  {}", line);
            }
        }
        aprintln!();
    }

    match plan {
        planning::DeployPlan::NoChanges { .. } => {
            if !global.is_silent() {
                aprintln!("{}", p_g("Infrastructure is up to date."));
            }
            return Ok(());
        }
        // Fails without prompting
        planning::DeployPlan::KeyMismatch { .. } => {
            return deploy::execute_deploy_plan(&dynamo_client, &plan).await;
        }
        _ => {}
    }

    if !cmd.force {
        confirm("Apply these changes?", true)?;
    }

    if !global.is_silent() {
        aprintln!("{}", p_b("Applying changes..."));
    }

    deploy::execute_deploy_plan(&dynamo_client, &plan).await?;

    if !global.is_silent() {
        aprintln!("{}", p_g("Infrastructure deployed successfully."));
    }

    Ok(())
}

async fn run_seed(cmd: SeedCommand, global: &crate::Global) -> Result<()> {
    let aws_config = client::AwsConfig::default();

    if !global.is_silent() {
        aprintln!("{} {}", p_b("Target:"), aws_config.target_display());
        aprintln!("{} {}", p_b("Table:"), cmd.table_name);
        aprintln!("{} {}", p_b("Tenant count:"), cmd.count);
        aprintln!();
    }

    let dynamo_client = client::create_client(&aws_config).await;

    if client::get_table_state(&dynamo_client, &cmd.table_name)
        .await?
        .is_none()
    {
        return Err(DynamodbError::TableNotFound {
            table_name: cmd.table_name,
        });
    }

    let tenants = seed::generate_seed_tenants(cmd.count);

    if !global.is_silent() {
        aprintln!("{}", p_c("Tenants to create:"));
        for tenant in tenants.iter().take(5) {
            aprintln!(
                "  {} - {} ({})",
                tenant.tenant_id,
                tenant.company_name.as_deref().unwrap_or_default(),
                tenant.tier.as_deref().unwrap_or_default()
            );
        }
        if tenants.len() > 5 {
            aprintln!("  ... and {} more", tenants.len() - 5);
        }
        aprintln!();
    }

    if !cmd.force {
        confirm(&format!("Insert {} tenants?", tenants.len()), true)?;
    }

    let inserted = seed::seed_tenants(&dynamo_client, &cmd.table_name, &tenants).await?;

    if !global.is_silent() {
        aprintln!("{} {} tenants inserted.", p_g("Success:"), inserted);
    }

    Ok(())
}
