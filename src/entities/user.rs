//! User entity - A login belonging to one organization.
//!
//! Users authenticate with their email and a password hash produced elsewhere;
//! this table only stores the hash.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Access role within an organization
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Manages the organization and its users
    #[sea_orm(string_value = "admin")]
    Admin,
    /// Works with invoices and expenses
    #[sea_orm(string_value = "finance")]
    Finance,
    /// Project manager
    #[sea_orm(string_value = "pm")]
    Pm,
    /// Runs equipment on site
    #[sea_orm(string_value = "operations")]
    Operations,
}

/// User database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Unique identifier for the user
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Owning tenant
    pub organization_id: i32,
    /// Login identity, unique across all tenants
    #[sea_orm(unique)]
    pub email: String,
    /// Never serialized
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Access role
    pub role: UserRole,
    /// Disabled users keep their rows
    pub is_active: bool,
    /// Set on insert
    pub created_at: DateTimeUtc,
    /// Refreshed on every update
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between User and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each user belongs to one organization
    #[sea_orm(
        belongs_to = "super::organization::Entity",
        from = "Column::OrganizationId",
        to = "super::organization::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Organization,
}

impl Related<super::organization::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Organization.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
