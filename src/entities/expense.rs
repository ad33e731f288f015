//! Expense entity - A cost booked against an invoice.
//!
//! Categories are free text; [`ExpenseCategory`] lists the ones the
//! application suggests.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Suggested expense categories. The column itself accepts any text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseCategory {
    /// Fuel for the equipment
    Fuel,
    /// Operator wages
    Salary,
    /// Servicing and repairs
    Maintenance,
    /// Spare parts
    Parts,
    /// Insurance premiums
    Insurance,
    /// Moving equipment to and from site
    Transport,
    /// Anything else
    Other,
}

impl ExpenseCategory {
    /// Every category, in display order
    pub const ALL: [Self; 7] = [
        Self::Fuel,
        Self::Salary,
        Self::Maintenance,
        Self::Parts,
        Self::Insurance,
        Self::Transport,
        Self::Other,
    ];

    /// The text stored in `expenses.category`
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fuel => "fuel",
            Self::Salary => "salary",
            Self::Maintenance => "maintenance",
            Self::Parts => "parts",
            Self::Insurance => "insurance",
            Self::Transport => "transport",
            Self::Other => "other",
        }
    }

    /// Maps stored text back to a suggested category, if it is one.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|category| category.as_str() == value)
    }
}

impl std::fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Expense database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    /// Unique identifier for the expense
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Invoice the cost is booked against
    pub invoice_id: i32,
    /// Free text; see [`ExpenseCategory`]
    pub category: String,
    /// Amount in cents
    pub amount: i64,
    /// Optional free text
    pub description: Option<String>,
    /// Day the cost was incurred
    pub date: Date,
    /// Set on insert
    pub created_at: DateTimeUtc,
    /// Refreshed on every update
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between Expense and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each expense belongs to one invoice
    #[sea_orm(
        belongs_to = "super::invoice::Entity",
        from = "Column::InvoiceId",
        to = "super::invoice::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Invoice,
}

impl Related<super::invoice::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Invoice.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
