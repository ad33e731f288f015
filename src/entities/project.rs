//! Project entity - A client engagement run by an organization.
//!
//! Projects own their invoices; deleting a project cascades to invoices and,
//! through them, to expenses.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Lifecycle status of a project
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    /// Work in progress
    #[default]
    #[sea_orm(string_value = "active")]
    Active,
    /// Finished
    #[sea_orm(string_value = "completed")]
    Completed,
    /// Paused
    #[sea_orm(string_value = "on_hold")]
    OnHold,
    /// Abandoned
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

/// Project database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "projects")]
pub struct Model {
    /// Unique identifier for the project
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Owning tenant
    pub organization_id: i32,
    /// Organization-assigned reference, e.g. "PRJ-2024-001"
    pub project_number: String,
    /// Optional free text
    pub description: Option<String>,
    /// Client the work is billed to
    pub client: String,
    /// Lifecycle status, `active` unless set
    #[sea_orm(default_value = "active")]
    pub status: ProjectStatus,
    /// Planned length in days
    pub duration: Option<i32>,
    /// First day of the project
    pub start_date: Date,
    /// Last day, if known
    pub end_date: Option<Date>,
    /// Set on insert
    pub created_at: DateTimeUtc,
    /// Refreshed on every update
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between Project and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each project belongs to one organization
    #[sea_orm(
        belongs_to = "super::organization::Entity",
        from = "Column::OrganizationId",
        to = "super::organization::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Organization,
    /// One project has many invoices
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
