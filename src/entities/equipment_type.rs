//! Equipment type entity - A billable class of equipment (excavator, truck, ...).
//!
//! Invoices reference equipment types with `ON DELETE NO ACTION`, so a type
//! cannot be removed while anything has been billed against it.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Equipment type database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "equipment_types")]
pub struct Model {
    /// Unique identifier for the equipment type
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Owning tenant
    pub organization_id: i32,
    /// Display name
    pub name: String,
    /// Free text grouping such as "heavy", "light" or "transport"
    pub category: Option<String>,
    /// Optional free text
    pub description: Option<String>,
    /// Retired types stay referenced by old invoices
    pub is_active: bool,
    /// Set on insert
    pub created_at: DateTimeUtc,
    /// Refreshed on every update
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between EquipmentType and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each equipment type belongs to one organization
    #[sea_orm(
        belongs_to = "super::organization::Entity",
        from = "Column::OrganizationId",
        to = "super::organization::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Organization,
    /// One equipment type is billed on many invoices
    #[sea_orm(has_many = "super::invoice::Entity")]
    Invoices,
}

impl Related<super::organization::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Organization.def()
    }
}

impl Related<super::invoice::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Invoices.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
