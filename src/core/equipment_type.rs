//! Equipment type business logic.
//!
//! Equipment types can be retired with `is_active = false`. Hard deletes are
//! refused by the database while any invoice still references the type.

use crate::{
    entities::{EquipmentType, equipment_type},
    errors::{Error, Result},
};
use chrono::Utc;
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::{info, instrument};

/// Insert type for `equipment_types`
#[derive(Debug, Clone)]
pub struct NewEquipmentType {
    /// Owning tenant
    pub organization_id: i32,
    /// Display name
    pub name: String,
    /// Free text, e.g. `heavy` or `transport`
    pub category: Option<String>,
    /// Optional free text
    pub description: Option<String>,
    /// Defaults to `true`
    pub is_active: Option<bool>,
}

/// Patch for an existing equipment type. `None` leaves a column untouched.
#[derive(Debug, Clone, Default)]
pub struct EquipmentTypeUpdate {
    /// New name
    pub name: Option<String>,
    /// `Some(None)` clears the category
    pub category: Option<Option<String>>,
    /// `Some(None)` clears the description
    pub description: Option<Option<String>>,
    /// Retire or reinstate the type
    pub is_active: Option<bool>,
}

/// Inserts an equipment type for an existing organization.
#[instrument(skip(db, new), fields(organization_id = new.organization_id))]
pub async fn create_equipment_type<C>(
    db: &C,
    new: NewEquipmentType,
) -> Result<equipment_type::Model>
where
    C: ConnectionTrait,
{
    let name = crate::core::required_text("name", &new.name)?;
    let now = Utc::now();

    let equipment_type = equipment_type::ActiveModel {
        organization_id: Set(new.organization_id),
        name: Set(name),
        category: Set(crate::core::optional_text(new.category)),
        description: Set(crate::core::optional_text(new.description)),
        is_active: Set(new.is_active.unwrap_or(true)),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let result = equipment_type.insert(db).await?;
    info!(id = result.id, "Created equipment type");
    Ok(result)
}

/// Looks up an equipment type by primary key.
pub async fn get_equipment_type_by_id<C>(
    db: &C,
    id: i32,
) -> Result<Option<equipment_type::Model>>
where
    C: ConnectionTrait,
{
    EquipmentType::find_by_id(id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds an organization's equipment type by exact name.
pub async fn get_equipment_type_by_name<C>(
    db: &C,
    organization_id: i32,
    name: &str,
) -> Result<Option<equipment_type::Model>>
where
    C: ConnectionTrait,
{
    EquipmentType::find()
        .filter(equipment_type::Column::OrganizationId.eq(organization_id))
        .filter(equipment_type::Column::Name.eq(name.trim()))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Lists an organization's equipment types by name, optionally including retired ones.
pub async fn list_equipment_types_for_organization<C>(
    db: &C,
    organization_id: i32,
    include_inactive: bool,
) -> Result<Vec<equipment_type::Model>>
where
    C: ConnectionTrait,
{
    let mut query = EquipmentType::find()
        .filter(equipment_type::Column::OrganizationId.eq(organization_id));
    if !include_inactive {
        query = query.filter(equipment_type::Column::IsActive.eq(true));
    }

    query
        .order_by_asc(equipment_type::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Applies `changes` and refreshes `updated_at`.
#[instrument(skip(db, changes))]
pub async fn update_equipment_type<C>(
    db: &C,
    id: i32,
    changes: EquipmentTypeUpdate,
) -> Result<equipment_type::Model>
where
    C: ConnectionTrait,
{
    let existing = get_equipment_type_by_id(db, id)
        .await?
        .ok_or(Error::NotFound {
            entity: "equipment type",
            id,
        })?;

    let mut equipment_type: equipment_type::ActiveModel = existing.into();
    if let Some(name) = changes.name {
        equipment_type.name = Set(crate::core::required_text("name", &name)?);
    }
    if let Some(category) = changes.category {
        equipment_type.category = Set(crate::core::optional_text(category));
    }
    if let Some(description) = changes.description {
        equipment_type.description = Set(crate::core::optional_text(description));
    }
    if let Some(is_active) = changes.is_active {
        equipment_type.is_active = Set(is_active);
    }
    equipment_type.updated_at = Set(Utc::now());

    equipment_type.update(db).await.map_err(Into::into)
}

/// Retires an equipment type while keeping its invoice history intact.
pub async fn deactivate_equipment_type<C>(db: &C, id: i32) -> Result<equipment_type::Model>
where
    C: ConnectionTrait,
{
    update_equipment_type(
        db,
        id,
        EquipmentTypeUpdate {
            is_active: Some(false),
            ..Default::default()
        },
    )
    .await
}

/// Deletes an equipment type.
///
/// Fails with [`Error::ForeignKeyViolation`] while any invoice references it.
#[instrument(skip(db))]
pub async fn delete_equipment_type<C>(db: &C, id: i32) -> Result<()>
where
    C: ConnectionTrait,
{
    let result = EquipmentType::delete_by_id(id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::NotFound {
            entity: "equipment type",
            id,
        });
    }
    Ok(())
}
