//! Expense business logic - Costs booked against an invoice.
//!
//! The parent invoice is not looked up first; a dangling `invoice_id` is left
//! to the foreign key and comes back as [`Error::ForeignKeyViolation`].

use crate::{
    entities::{Expense, ExpenseCategory, expense},
    errors::{Error, Result},
};
use chrono::{NaiveDate, Utc};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::{debug, instrument};

/// Insert type for `expenses`
#[derive(Debug, Clone)]
pub struct NewExpense {
    /// Invoice the cost is booked against
    pub invoice_id: i32,
    /// Free text; see [`ExpenseCategory`] for the suggested values
    pub category: String,
    /// Amount in cents
    pub amount: i64,
    /// Optional free text
    pub description: Option<String>,
    /// Day the cost was incurred
    pub date: NaiveDate,
}

impl NewExpense {
    /// Builds an expense in one of the suggested categories.
    #[must_use]
    pub fn categorized(
        invoice_id: i32,
        category: ExpenseCategory,
        amount: i64,
        date: NaiveDate,
    ) -> Self {
        Self {
            invoice_id,
            category: category.as_str().to_string(),
            amount,
            description: None,
            date,
        }
    }
}

/// Patch for an existing expense. `None` leaves a column untouched.
#[derive(Debug, Clone, Default)]
pub struct ExpenseUpdate {
    /// New category
    pub category: Option<String>,
    /// New amount in cents
    pub amount: Option<i64>,
    /// `Some(None)` clears the description
    pub description: Option<Option<String>>,
    /// New date
    pub date: Option<NaiveDate>,
}

/// Inserts an expense. A missing invoice surfaces as a foreign key violation.
#[instrument(skip(db, new), fields(invoice_id = new.invoice_id))]
pub async fn create_expense<C>(db: &C, new: NewExpense) -> Result<expense::Model>
where
    C: ConnectionTrait,
{
    let category = crate::core::required_text("category", &new.category)?;
    let amount = crate::core::non_negative_cents(new.amount)?;
    if ExpenseCategory::parse(&category).is_none() {
        debug!(%category, "Expense uses a custom category");
    }
    let now = Utc::now();

    let expense = expense::ActiveModel {
        invoice_id: Set(new.invoice_id),
        category: Set(category),
        amount: Set(amount),
        description: Set(crate::core::optional_text(new.description)),
        date: Set(new.date),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    expense.insert(db).await.map_err(Into::into)
}

/// Looks up an expense by primary key.
pub async fn get_expense_by_id<C>(db: &C, id: i32) -> Result<Option<expense::Model>>
where
    C: ConnectionTrait,
{
    Expense::find_by_id(id).one(db).await.map_err(Into::into)
}

/// Lists an invoice's expenses in date order.
pub async fn list_expenses_for_invoice<C>(db: &C, invoice_id: i32) -> Result<Vec<expense::Model>>
where
    C: ConnectionTrait,
{
    Expense::find()
        .filter(expense::Column::InvoiceId.eq(invoice_id))
        .order_by_asc(expense::Column::Date)
        .order_by_asc(expense::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Applies `changes` and refreshes `updated_at`.
#[instrument(skip(db, changes))]
pub async fn update_expense<C>(db: &C, id: i32, changes: ExpenseUpdate) -> Result<expense::Model>
where
    C: ConnectionTrait,
{
    let existing = get_expense_by_id(db, id).await?.ok_or(Error::NotFound {
        entity: "expense",
        id,
    })?;

    let mut expense: expense::ActiveModel = existing.into();
    if let Some(category) = changes.category {
        expense.category = Set(crate::core::required_text("category", &category)?);
    }
    if let Some(amount) = changes.amount {
        expense.amount = Set(crate::core::non_negative_cents(amount)?);
    }
    if let Some(description) = changes.description {
        expense.description = Set(crate::core::optional_text(description));
    }
    if let Some(date) = changes.date {
        expense.date = Set(date);
    }
    expense.updated_at = Set(Utc::now());

    expense.update(db).await.map_err(Into::into)
}

/// Deletes an expense.
#[instrument(skip(db))]
pub async fn delete_expense<C>(db: &C, id: i32) -> Result<()>
where
    C: ConnectionTrait,
{
    let result = Expense::delete_by_id(id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::NotFound {
            entity: "expense",
            id,
        });
    }
    Ok(())
}
