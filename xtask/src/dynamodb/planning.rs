//! Pure functions for calculating deployment plans (Functional Core).

use tenant_manager_core::storage::{ProvisionedThroughput, TableSchema};

/// Represents the current state of a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableState {
    pub status: TableStatus,
    pub partition_key: String,
    /// `None` when the table bills per request.
    pub throughput: Option<ProvisionedThroughput>,
}

/// Table status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableStatus {
    Active,
    Creating,
    Updating,
    Deleting,
}

/// Planned changes for deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeployPlan {
    /// Table doesn't exist, needs to be created.
    CreateTable { schema: TableSchema },
    /// Table exists with different capacity settings.
    UpdateThroughput {
        table_name: String,
        current: Option<ProvisionedThroughput>,
        desired: ProvisionedThroughput,
    },
    /// Table exists but is keyed on another attribute. Cannot be fixed in place.
    KeyMismatch {
        table_name: String,
        expected: String,
        actual: String,
    },
    /// Table is up to date, no changes needed.
    NoChanges { table_name: String },
}

/// Plan for destroying a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DestroyPlan {
    /// Table exists and will be deleted.
    DeleteTable { table_name: String },
    /// Table doesn't exist, nothing to do.
    AlreadyGone { table_name: String },
}

/// Pure function: Calculate what changes are needed to reach desired state.
pub fn calculate_deploy_plan(current: Option<&TableState>, desired: &TableSchema) -> DeployPlan {
    let Some(state) = current else {
        return DeployPlan::CreateTable {
            schema: desired.clone(),
        };
    };

    if state.partition_key != desired.partition_key.name {
        return DeployPlan::KeyMismatch {
            table_name: desired.table_name.clone(),
            expected: desired.partition_key.name.clone(),
            actual: state.partition_key.clone(),
        };
    }

    if state.throughput != Some(desired.throughput) {
        return DeployPlan::UpdateThroughput {
            table_name: desired.table_name.clone(),
            current: state.throughput,
            desired: desired.throughput,
        };
    }

    DeployPlan::NoChanges {
        table_name: desired.table_name.clone(),
    }
}

/// Pure function: Calculate destroy plan.
pub fn calculate_destroy_plan(current: Option<&TableState>, table_name: &str) -> DestroyPlan {
    match current {
        Some(_) => DestroyPlan::DeleteTable {
            table_name: table_name.to_string(),
        },
        None => DestroyPlan::AlreadyGone {
            table_name: table_name.to_string(),
        },
    }
}

fn format_throughput(throughput: Option<ProvisionedThroughput>) -> String {
    match throughput {
        Some(t) => format!(
            "PROVISIONED (read: {}, write: {})",
            t.read_capacity_units, t.write_capacity_units
        ),
        None => "PAY_PER_REQUEST".to_string(),
    }
}

/// Pure function: Format a deploy plan for display.
pub fn format_deploy_plan(plan: &DeployPlan) -> Vec<String> {
    match plan {
        DeployPlan::CreateTable { schema } => vec![
            format!("+ Create table: {}", schema.table_name),
            format!("  Partition key: {} (S)", schema.partition_key.name),
            format!("  Billing: {}", format_throughput(Some(schema.throughput))),
        ],
        DeployPlan::UpdateThroughput {
            table_name,
            current,
            desired,
        } => vec![
            format!("~ Update table: {}", table_name),
            format!(
                "  Billing: {} -> {}",
                format_throughput(*current),
                format_throughput(Some(*desired))
            ),
        ],
        DeployPlan::KeyMismatch {
            table_name,
            expected,
            actual,
        } => vec![
            format!("! Table '{}' is keyed on '{}'", table_name, actual),
            format!("  Expected partition key: {} (S)", expected),
            "  Destroy the table with --destroy and deploy again".to_string(),
        ],
        DeployPlan::NoChanges { table_name } => {
            vec![format!("= Table '{}' is up to date", table_name)]
        }
    }
}

/// Pure function: Format a destroy plan for display.
pub fn format_destroy_plan(plan: &DestroyPlan) -> Vec<String> {
    match plan {
        DestroyPlan::DeleteTable { table_name } => {
            vec![format!(
                "- Delete table: {} (ALL DATA WILL BE LOST)",
                table_name
            )]
        }
        DestroyPlan::AlreadyGone { table_name } => {
            vec![format!("= Table '{}' does not exist", table_name)]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tenant_manager_core::tenant::tenant_table_schema;

    fn active(partition_key: &str, throughput: Option<ProvisionedThroughput>) -> TableState {
        TableState {
            status: TableStatus::Active,
            partition_key: partition_key.to_string(),
            throughput,
        }
    }

    #[test]
    fn test_missing_table_is_created() {
        let schema = tenant_table_schema("TenantBootstrap");
        let plan = calculate_deploy_plan(None, &schema);

        assert_eq!(plan, DeployPlan::CreateTable { schema });
    }

    #[test]
    fn test_matching_table_needs_no_changes() {
        let schema = tenant_table_schema("TenantBootstrap");
        let state = active("tenant_id", Some(schema.throughput));

        let plan = calculate_deploy_plan(Some(&state), &schema);

        assert_eq!(
            plan,
            DeployPlan::NoChanges {
                table_name: "TenantBootstrap".to_string()
            }
        );
    }

    #[test]
    fn test_on_demand_table_is_switched_to_provisioned() {
        let schema = tenant_table_schema("TenantBootstrap");
        let state = active("tenant_id", None);

        let plan = calculate_deploy_plan(Some(&state), &schema);

        assert_eq!(
            plan,
            DeployPlan::UpdateThroughput {
                table_name: "TenantBootstrap".to_string(),
                current: None,
                desired: schema.throughput,
            }
        );
    }

    #[test]
    fn test_different_capacity_is_updated() {
        let schema = tenant_table_schema("TenantBootstrap");
        let state = active(
            "tenant_id",
            Some(ProvisionedThroughput {
                read_capacity_units: 1,
                write_capacity_units: 1,
            }),
        );

        let plan = calculate_deploy_plan(Some(&state), &schema);

        assert!(matches!(plan, DeployPlan::UpdateThroughput { .. }));
    }

    #[test]
    fn test_other_partition_key_is_a_mismatch() {
        let schema = tenant_table_schema("TenantBootstrap");
        let state = active("pk", Some(schema.throughput));

        let plan = calculate_deploy_plan(Some(&state), &schema);

        assert_eq!(
            plan,
            DeployPlan::KeyMismatch {
                table_name: "TenantBootstrap".to_string(),
                expected: "tenant_id".to_string(),
                actual: "pk".to_string(),
            }
        );
    }

    #[test]
    fn test_destroy_plan() {
        let state = active("tenant_id", None);

        assert_eq!(
            calculate_destroy_plan(Some(&state), "TenantBootstrap"),
            DestroyPlan::DeleteTable {
                table_name: "TenantBootstrap".to_string()
            }
        );
        assert_eq!(
            calculate_destroy_plan(None, "TenantBootstrap"),
            DestroyPlan::AlreadyGone {
                table_name: "TenantBootstrap".to_string()
            }
        );
    }

    #[test]
    fn test_format_create_plan() {
        let plan = DeployPlan::CreateTable {
            schema: tenant_table_schema("TenantBootstrap"),
        };

        assert_eq!(
            format_deploy_plan(&plan),
            vec![
                "+ Create table: TenantBootstrap".to_string(),
                "  Partition key: tenant_id (S)".to_string(),
                "  Billing: PROVISIONED (read: 5, write: 5)".to_string(),
            ]
        );
    }

    #[test]
    fn test_format_throughput_update() {
        let plan = DeployPlan::UpdateThroughput {
            table_name: "TenantBootstrap".to_string(),
            current: None,
            desired: ProvisionedThroughput::default(),
        };

        let lines = format_deploy_plan(&plan);

        assert_eq!(lines[0], "~ Update table: TenantBootstrap");
        assert_eq!(
            lines[1],
            "  Billing: PAY_PER_REQUEST -> PROVISIONED (read: 5, write: 5)"
        );
    }
}
