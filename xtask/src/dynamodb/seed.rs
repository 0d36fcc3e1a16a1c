//! Seed command implementation.

use super::error::{DynamodbError, Result};
use aws_sdk_dynamodb::types::{AttributeValue, PutRequest, WriteRequest};
use aws_sdk_dynamodb::Client;
use std::collections::HashMap;
use tenant_manager_core::storage::conversions::item_to_attributes;
use tenant_manager_core::tenant::Tenant;

const COMPANIES: [(&str, &str); 8] = [
    ("Acme Corporation", "Wile Coyote"),
    ("Globex", "Hank Scorpio"),
    ("Initech", "Bill Lumbergh"),
    ("Umbrella", "Albert Wesker"),
    ("Stark Industries", "Pepper Potts"),
    ("Wayne Enterprises", "Lucius Fox"),
    ("Cyberdyne Systems", "Miles Dyson"),
    ("Soylent", "Sol Roth"),
];

const TIERS: [&str; 3] = ["free", "standard", "premium"];

// Mostly active, with the occasional suspended account.
const STATUSES: [&str; 4] = ["active", "active", "active", "suspended"];

/// Generate demo tenants with stable ids (`tenant-001`, `tenant-002`, ...).
pub fn generate_seed_tenants(count: u32) -> Vec<Tenant> {
    (0..count as usize)
        .map(|i| {
            let (company, owner) = COMPANIES[i % COMPANIES.len()];
            let account = company.to_lowercase().replace(' ', "-");
            let suffix = i / COMPANIES.len();
            let account = if suffix == 0 {
                account
            } else {
                format!("{account}-{suffix}")
            };

            Tenant::new(format!("tenant-{:03}", i + 1))
                .with_company_name(company)
                .with_account_name(account)
                .with_owner_name(owner)
                .with_tier(TIERS[i % TIERS.len()])
                .with_status(STATUSES[i % STATUSES.len()])
        })
        .collect()
}

/// Convert a tenant to a DynamoDB item, encoded the way the server stores it.
fn tenant_to_item(tenant: &Tenant) -> HashMap<String, AttributeValue> {
    item_to_attributes(&tenant.clone().into_item())
}

/// Insert tenants with batch writes. Returns how many were accepted.
pub async fn seed_tenants(client: &Client, table_name: &str, tenants: &[Tenant]) -> Result<u32> {
    let mut inserted = 0u32;

    // BatchWriteItem takes at most 25 requests
    for chunk in tenants.chunks(25) {
        let write_requests = chunk
            .iter()
            .map(|tenant| {
                PutRequest::builder()
                    .set_item(Some(tenant_to_item(tenant)))
                    .build()
                    .map(|put| WriteRequest::builder().put_request(put).build())
                    .map_err(|e| DynamodbError::AwsSdk(e.to_string()))
            })
            .collect::<Result<Vec<_>>>()?;

        let response = client
            .batch_write_item()
            .request_items(table_name, write_requests)
            .send()
            .await
            .map_err(|e| DynamodbError::AwsSdk(e.into_service_error().to_string()))?;

        let unprocessed = response
            .unprocessed_items()
            .and_then(|items| items.get(table_name))
            .map_or(0, Vec::len);

        inserted += (chunk.len() - unprocessed) as u32;
    }

    Ok(inserted)
}
