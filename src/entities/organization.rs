//! Organization entity - The tenant root.
//!
//! Every user, project and equipment type is scoped to exactly one organization.
//! Deleting an organization removes everything it owns through `ON DELETE CASCADE`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Lifecycle status of a tenant
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum OrganizationStatus {
    /// Operating normally
    #[default]
    #[sea_orm(string_value = "active")]
    Active,
    /// Suspended
    #[sea_orm(string_value = "inactive")]
    Inactive,
    /// Evaluating the product
    #[sea_orm(string_value = "trial")]
    Trial,
}

/// Subscription plan the tenant is billed on
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionTier {
    /// Entry plan
    #[default]
    #[sea_orm(string_value = "basic")]
    Basic,
    /// Mid plan
    #[sea_orm(string_value = "premium")]
    Premium,
    /// Top plan
    #[sea_orm(string_value = "enterprise")]
    Enterprise,
}

/// Organization database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "organizations")]
pub struct Model {
    /// Unique identifier for the organization
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Display name
    pub name: String,
    /// URL-safe identifier, unique across all tenants
    #[sea_orm(unique)]
    pub slug: String,
    /// Lifecycle status, `active` unless set
    #[sea_orm(default_value = "active")]
    pub status: OrganizationStatus,
    /// Billing plan, `basic` unless set
    #[sea_orm(default_value = "basic")]
    pub subscription: SubscriptionTier,
    /// Opaque per-tenant settings document
    #[sea_orm(default_value = "{}")]
    pub settings: Json,
    /// Set on insert
    pub created_at: DateTimeUtc,
    /// Refreshed on every update
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between Organization and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One organization has many users
    #[sea_orm(has_many = "super::user::Entity")]
    Users,
    /// One organization has many projects
    #[sea_orm(has_many = "super::project::Entity")]
    Projects,
    /// One organization has many equipment types
    #[sea_orm(has_many = "super::equipment_type::Entity")]
    EquipmentTypes,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::project::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Projects.def()
    }
}

impl Related<super::equipment_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EquipmentTypes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
