//! Relation aggregates - Rows loaded together with their related rows.
//!
//! Each aggregate flattens its primary row when serialized, so the JSON shape
//! is the row's own columns plus one key per relation.

use crate::{
    entities::{
        EquipmentType, Expense, Invoice, Organization, Project, User, equipment_type, expense,
        invoice, organization, project, user,
    },
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, prelude::*};
use serde::Serialize;

/// An organization with its users
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OrganizationWithUsers {
    /// The organization row
    #[serde(flatten)]
    pub organization: organization::Model,
    /// Its users, ordered by email
    pub users: Vec<user::Model>,
}

/// A project with its invoices
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ProjectWithInvoices {
    /// The project row
    #[serde(flatten)]
    pub project: project::Model,
    /// Its invoices, newest first
    pub invoices: Vec<invoice::Model>,
}

/// An invoice with its expenses and both parents
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct InvoiceWithExpenses {
    /// The invoice row
    #[serde(flatten)]
    pub invoice: invoice::Model,
    /// Expenses booked against the invoice, oldest first
    pub expenses: Vec<expense::Model>,
    /// The project billed
    pub project: project::Model,
    /// The equipment type billed for
    pub equipment_type: equipment_type::Model,
}

/// A project together with the organization that owns it
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProjectWithOrganization {
    /// The project row
    #[serde(flatten)]
    pub project: project::Model,
    /// The owning organization
    pub organization: organization::Model,
}

/// Everything needed to render an invoice
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FullInvoiceDetails {
    /// The invoice row
    #[serde(flatten)]
    pub invoice: invoice::Model,
    /// The project billed, with its organization
    pub project: ProjectWithOrganization,
    /// The equipment type billed for
    pub equipment_type: equipment_type::Model,
    /// Expenses booked against the invoice, oldest first
    pub expenses: Vec<expense::Model>,
}

/// Invoice amount against the costs booked on it, all in cents
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct InvoiceTotals {
    /// The billed amount
    pub invoice_amount: i64,
    /// Sum of the expense amounts
    pub expense_total: i64,
    /// `invoice_amount - expense_total`; negative when costs exceed the bill
    pub margin: i64,
}

impl InvoiceTotals {
    /// Computes the totals from rows already loaded.
    ///
    /// The columns accept any `i64`, so sums saturate at the `i64` bounds
    /// instead of overflowing.
    #[must_use]
    pub fn from_rows(invoice: &invoice::Model, expenses: &[expense::Model]) -> Self {
        let expense_total = expenses
            .iter()
            .map(|expense| expense.amount)
            .fold(0_i64, i64::saturating_add);
        Self {
            invoice_amount: invoice.amount,
            expense_total,
            margin: invoice.amount.saturating_sub(expense_total),
        }
    }
}

impl InvoiceWithExpenses {
    /// Totals over the loaded expenses
    #[must_use]
    pub fn totals(&self) -> InvoiceTotals {
        InvoiceTotals::from_rows(&self.invoice, &self.expenses)
    }
}

impl FullInvoiceDetails {
    /// Totals over the loaded expenses
    #[must_use]
    pub fn totals(&self) -> InvoiceTotals {
        InvoiceTotals::from_rows(&self.invoice, &self.expenses)
    }
}

/// Loads an organization with its users, or `None` if it does not exist.
pub async fn get_organization_with_users<C>(
    db: &C,
    organization_id: i32,
) -> Result<Option<OrganizationWithUsers>>
where
    C: ConnectionTrait,
{
    let Some(organization) = Organization::find_by_id(organization_id).one(db).await? else {
        return Ok(None);
    };
    let users = organization
        .find_related(User)
        .order_by_asc(user::Column::Email)
        .all(db)
        .await?;

    Ok(Some(OrganizationWithUsers {
        organization,
        users,
    }))
}

/// Loads a project with its invoices, or `None` if it does not exist.
pub async fn get_project_with_invoices<C>(
    db: &C,
    project_id: i32,
) -> Result<Option<ProjectWithInvoices>>
where
    C: ConnectionTrait,
{
    let Some(project) = Project::find_by_id(project_id).one(db).await? else {
        return Ok(None);
    };
    let invoices = project
        .find_related(Invoice)
        .order_by_desc(invoice::Column::Date)
        .order_by_asc(invoice::Column::Id)
        .all(db)
        .await?;

    Ok(Some(ProjectWithInvoices { project, invoices }))
}

/// Loads an invoice with its expenses, project and equipment type.
pub async fn get_invoice_with_expenses<C>(
    db: &C,
    invoice_id: i32,
) -> Result<Option<InvoiceWithExpenses>>
where
    C: ConnectionTrait,
{
    let Some(invoice) = Invoice::find_by_id(invoice_id).one(db).await? else {
        return Ok(None);
    };
    let expenses = load_expenses(db, &invoice).await?;
    let project = load_project(db, &invoice).await?;
    let equipment_type = load_equipment_type(db, &invoice).await?;

    Ok(Some(InvoiceWithExpenses {
        invoice,
        expenses,
        project,
        equipment_type,
    }))
}

/// Like [`get_invoice_with_expenses`], with the project's organization attached.
pub async fn get_full_invoice_details<C>(
    db: &C,
    invoice_id: i32,
) -> Result<Option<FullInvoiceDetails>>
where
    C: ConnectionTrait,
{
    let Some(invoice) = Invoice::find_by_id(invoice_id).one(db).await? else {
        return Ok(None);
    };
    let expenses = load_expenses(db, &invoice).await?;
    let project = load_project(db, &invoice).await?;
    let equipment_type = load_equipment_type(db, &invoice).await?;
    let organization = project
        .find_related(Organization)
        .one(db)
        .await?
        .ok_or(Error::NotFound {
            entity: "organization",
            id: project.organization_id,
        })?;

    Ok(Some(FullInvoiceDetails {
        invoice,
        project: ProjectWithOrganization {
            project,
            organization,
        },
        equipment_type,
        expenses,
    }))
}

/// Totals for one invoice, or `None` if the invoice does not exist.
pub async fn get_invoice_totals<C>(db: &C, invoice_id: i32) -> Result<Option<InvoiceTotals>>
where
    C: ConnectionTrait,
{
    let Some(invoice) = Invoice::find_by_id(invoice_id).one(db).await? else {
        return Ok(None);
    };
    let expenses = load_expenses(db, &invoice).await?;
    Ok(Some(InvoiceTotals::from_rows(&invoice, &expenses)))
}

async fn load_expenses<C>(db: &C, invoice: &invoice::Model) -> Result<Vec<expense::Model>>
where
    C: ConnectionTrait,
{
    invoice
        .find_related(Expense)
        .order_by_asc(expense::Column::Date)
        .order_by_asc(expense::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

async fn load_project<C>(db: &C, invoice: &invoice::Model) -> Result<project::Model>
where
    C: ConnectionTrait,
{
    invoice
        .find_related(Project)
        .one(db)
        .await?
        .ok_or(Error::NotFound {
            entity: "project",
            id: invoice.project_id,
        })
}

async fn load_equipment_type<C>(db: &C, invoice: &invoice::Model) -> Result<equipment_type::Model>
where
    C: ConnectionTrait,
{
    invoice
        .find_related(EquipmentType)
        .one(db)
        .await?
        .ok_or(Error::NotFound {
            entity: "equipment type",
            id: invoice.equipment_type_id,
        })
}
