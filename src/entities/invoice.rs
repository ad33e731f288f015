//! Invoice entity - A bill raised against a project for one equipment type.
//!
//! `amount` is stored in integer cents. The project edge cascades on delete.
//! The equipment type edge is `NO ACTION`: a referenced type cannot be deleted,
//! but the check runs at the end of the statement, so an organization delete
//! can cascade through projects and equipment types in any order.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Payment state of an invoice
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    /// Issued, not yet due
    #[default]
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Settled
    #[sea_orm(string_value = "paid")]
    Paid,
    /// Due and not settled
    #[sea_orm(string_value = "unpaid")]
    Unpaid,
    /// Past due
    #[sea_orm(string_value = "overdue")]
    Overdue,
}

/// Invoice database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "invoices")]
pub struct Model {
    /// Unique identifier for the invoice
    #[sea_orm(primary_key)]
    pub id: i32,
    /// External reference, if any
    pub invoice_number: Option<String>,
    /// Project billed
    pub project_id: i32,
    /// Equipment type billed for
    pub equipment_type_id: i32,
    /// Invoice date
    pub date: Date,
    /// Amount in cents
    pub amount: i64,
    /// Defaults to `pending`
    #[sea_orm(default_value = "pending")]
    pub status: InvoiceStatus,
    /// Optional free text
    pub notes: Option<String>,
    /// Set on insert
    pub created_at: DateTimeUtc,
    /// Refreshed on every update
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between Invoice and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each invoice belongs to one project
    #[sea_orm(
        belongs_to = "super::project::Entity",
        from = "Column::ProjectId",
        to = "super::project::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Project,
    /// Each invoice bills one equipment type
    #[sea_orm(
        belongs_to = "super::equipment_type::Entity",
        from = "Column::EquipmentTypeId",
        to = "super::equipment_type::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    EquipmentType,
    /// One invoice has many expenses
    #[sea_orm(has_many = "super::expense::Entity")]
    Expenses,
}

impl Related<super::project::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Project.def()
    }
}

impl Related<super::equipment_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EquipmentType.def()
    }
}

impl Related<super::expense::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Expenses.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
