//! Seeding tenants from [`SeedConfig`].
//!
//! Seeding is idempotent: organizations are matched by slug and equipment types
//! by name within their organization, and only missing rows are inserted.

use crate::{
    config::seed::SeedConfig,
    core::{
        equipment_type::{NewEquipmentType, create_equipment_type, get_equipment_type_by_name},
        organization::{
            NewOrganization, create_organization, get_organization_by_slug, validate_slug,
        },
    },
    errors::Result,
};
use sea_orm::{DatabaseConnection, TransactionTrait};
use tracing::{debug, info, instrument};

/// Rows inserted by one seeding pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    /// Organizations inserted because their slug was not present
    pub organizations_created: usize,
    /// Equipment types inserted because their name was not present in the organization
    pub equipment_types_created: usize,
}

/// Inserts every organization and equipment type from `config` that does not exist yet.
///
/// Runs in a single transaction, so a failing row leaves the database unchanged.
#[instrument(skip(db, config))]
pub async fn seed_tenants(db: &DatabaseConnection, config: &SeedConfig) -> Result<SeedSummary> {
    let txn = db.begin().await?;
    let mut summary = SeedSummary::default();

    for seed in &config.organizations {
        // Match on the stored form so a padded slug in the file is still found
        let slug = validate_slug(&seed.slug)?;
        let organization = match get_organization_by_slug(&txn, &slug).await? {
            Some(existing) => {
                debug!(%slug, "Organization already present");
                existing
            }
            None => {
                summary.organizations_created += 1;
                create_organization(
                    &txn,
                    NewOrganization {
                        name: seed.name.clone(),
                        slug,
                        status: seed.status,
                        subscription: seed.subscription,
                        settings: seed.settings.clone(),
                    },
                )
                .await?
            }
        };

        for equipment in &seed.equipment_types {
            if get_equipment_type_by_name(&txn, organization.id, &equipment.name)
                .await?
                .is_some()
            {
                continue;
            }
            create_equipment_type(
                &txn,
                NewEquipmentType {
                    organization_id: organization.id,
                    name: equipment.name.clone(),
                    category: equipment.category.clone(),
                    description: equipment.description.clone(),
                    is_active: None,
                },
            )
            .await?;
            summary.equipment_types_created += 1;
        }
    }

    txn.commit().await?;
    info!(
        organizations = summary.organizations_created,
        equipment_types = summary.equipment_types_created,
        "Seeding complete"
    );
    Ok(summary)
}
