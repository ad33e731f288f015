//! Invoice business logic - Billing a project for the use of an equipment type.
//!
//! A project and an equipment type may only be paired on an invoice when they
//! belong to the same organization. The foreign keys cannot express that, so
//! [`create_invoice`] and [`update_invoice`] check it inside a transaction.

use crate::{
    entities::{EquipmentType, Invoice, InvoiceStatus, Project, invoice},
    errors::{Error, Result},
};
use chrono::{NaiveDate, Utc};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::{info, instrument, warn};

/// Insert type for `invoices`
#[derive(Debug, Clone)]
pub struct NewInvoice {
    /// Project billed
    pub project_id: i32,
    /// Equipment type billed for; must belong to the project's organization
    pub equipment_type_id: i32,
    /// External reference, if any
    pub invoice_number: Option<String>,
    /// Invoice date
    pub date: NaiveDate,
    /// Amount in cents
    pub amount: i64,
    /// Defaults to `pending`
    pub status: Option<InvoiceStatus>,
    /// Optional free text
    pub notes: Option<String>,
}

/// Patch for an existing invoice. `None` leaves a column untouched.
#[derive(Debug, Clone, Default)]
pub struct InvoiceUpdate {
    /// Move the invoice to another equipment type of the same organization
    pub equipment_type_id: Option<i32>,
    /// `Some(None)` clears the invoice number
    pub invoice_number: Option<Option<String>>,
    /// New invoice date
    pub date: Option<NaiveDate>,
    /// New amount in cents
    pub amount: Option<i64>,
    /// New status
    pub status: Option<InvoiceStatus>,
    /// `Some(None)` clears the notes
    pub notes: Option<Option<String>>,
}

/// Checks that `project_id` and `equipment_type_id` exist and share an organization.
async fn ensure_same_tenant<C>(db: &C, project_id: i32, equipment_type_id: i32) -> Result<()>
where
    C: ConnectionTrait,
{
    let project = Project::find_by_id(project_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound {
            entity: "project",
            id: project_id,
        })?;
    let equipment_type = EquipmentType::find_by_id(equipment_type_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound {
            entity: "equipment type",
            id: equipment_type_id,
        })?;

    if project.organization_id != equipment_type.organization_id {
        warn!(
            project_id,
            equipment_type_id, "Rejected invoice spanning two organizations"
        );
        return Err(Error::TenantMismatch {
            project_organization_id: project.organization_id,
            equipment_organization_id: equipment_type.organization_id,
        });
    }
    Ok(())
}

/// Creates an invoice after validating the amount and the tenant scoping.
#[instrument(skip(db, new), fields(project_id = new.project_id))]
pub async fn create_invoice(db: &DatabaseConnection, new: NewInvoice) -> Result<invoice::Model> {
    let amount = crate::core::non_negative_cents(new.amount)?;

    let txn = db.begin().await?;
    ensure_same_tenant(&txn, new.project_id, new.equipment_type_id).await?;

    let now = Utc::now();
    let invoice = invoice::ActiveModel {
        invoice_number: Set(crate::core::optional_text(new.invoice_number)),
        project_id: Set(new.project_id),
        equipment_type_id: Set(new.equipment_type_id),
        date: Set(new.date),
        amount: Set(amount),
        status: Set(new.status.unwrap_or_default()),
        notes: Set(crate::core::optional_text(new.notes)),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let result = invoice.insert(&txn).await?;
    txn.commit().await?;

    info!(id = result.id, amount = result.amount, "Created invoice");
    Ok(result)
}

/// Looks up an invoice by primary key.
pub async fn get_invoice_by_id<C>(db: &C, id: i32) -> Result<Option<invoice::Model>>
where
    C: ConnectionTrait,
{
    Invoice::find_by_id(id).one(db).await.map_err(Into::into)
}

/// Lists a project's invoices, newest invoice date first.
pub async fn list_invoices_for_project<C>(db: &C, project_id: i32) -> Result<Vec<invoice::Model>>
where
    C: ConnectionTrait,
{
    Invoice::find()
        .filter(invoice::Column::ProjectId.eq(project_id))
        .order_by_desc(invoice::Column::Date)
        .order_by_asc(invoice::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Lists every invoice billed against an equipment type.
pub async fn list_invoices_for_equipment_type<C>(
    db: &C,
    equipment_type_id: i32,
) -> Result<Vec<invoice::Model>>
where
    C: ConnectionTrait,
{
    Invoice::find()
        .filter(invoice::Column::EquipmentTypeId.eq(equipment_type_id))
        .order_by_desc(invoice::Column::Date)
        .order_by_asc(invoice::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Lists a project's invoices in one status, e.g. everything still `overdue`.
pub async fn list_invoices_by_status<C>(
    db: &C,
    project_id: i32,
    status: InvoiceStatus,
) -> Result<Vec<invoice::Model>>
where
    C: ConnectionTrait,
{
    Invoice::find()
        .filter(invoice::Column::ProjectId.eq(project_id))
        .filter(invoice::Column::Status.eq(status))
        .order_by_desc(invoice::Column::Date)
        .order_by_asc(invoice::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Applies `changes` to an invoice. Switching the equipment type re-checks tenancy.
#[instrument(skip(db, changes))]
pub async fn update_invoice(
    db: &DatabaseConnection,
    id: i32,
    changes: InvoiceUpdate,
) -> Result<invoice::Model> {
    let txn = db.begin().await?;

    let existing = get_invoice_by_id(&txn, id).await?.ok_or(Error::NotFound {
        entity: "invoice",
        id,
    })?;

    if let Some(equipment_type_id) = changes.equipment_type_id {
        ensure_same_tenant(&txn, existing.project_id, equipment_type_id).await?;
    }

    let mut invoice: invoice::ActiveModel = existing.into();
    if let Some(equipment_type_id) = changes.equipment_type_id {
        invoice.equipment_type_id = Set(equipment_type_id);
    }
    if let Some(invoice_number) = changes.invoice_number {
        invoice.invoice_number = Set(crate::core::optional_text(invoice_number));
    }
    if let Some(date) = changes.date {
        invoice.date = Set(date);
    }
    if let Some(amount) = changes.amount {
        invoice.amount = Set(crate::core::non_negative_cents(amount)?);
    }
    if let Some(status) = changes.status {
        invoice.status = Set(status);
    }
    if let Some(notes) = changes.notes {
        invoice.notes = Set(crate::core::optional_text(notes));
    }
    invoice.updated_at = Set(Utc::now());

    let result = invoice.update(&txn).await?;
    txn.commit().await?;
    Ok(result)
}

/// Sets the status and refreshes `updated_at`.
pub async fn set_invoice_status(
    db: &DatabaseConnection,
    id: i32,
    status: InvoiceStatus,
) -> Result<invoice::Model> {
    update_invoice(
        db,
        id,
        InvoiceUpdate {
            status: Some(status),
            ..Default::default()
        },
    )
    .await
}

/// Deletes an invoice together with its expenses.
#[instrument(skip(db))]
pub async fn delete_invoice<C>(db: &C, id: i32) -> Result<()>
where
    C: ConnectionTrait,
{
    let result = Invoice::delete_by_id(id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::NotFound {
            entity: "invoice",
            id,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_invoice_amount_is_exact_cents() -> Result<()> {
        let (db, fixture) = setup_with_project().await?;

        let invoice = create_test_invoice(
            &db,
            fixture.project.id,
            fixture.equipment_type.id,
            12345,
        )
        .await?;
        assert_eq!(invoice.amount, 12345);

        let fetched = get_invoice_by_id(&db, invoice.id).await?.unwrap();
        assert_eq!(fetched.amount, 12345);
        assert_eq!(crate::core::format_cents(fetched.amount), "123.45");

        Ok(())
    }

    #[tokio::test]
    async fn test_invoice_round_trip() -> Result<()> {
        let (db, fixture) = setup_with_project().await?;

        let created = create_invoice(
            &db,
            NewInvoice {
                project_id: fixture.project.id,
                equipment_type_id: fixture.equipment_type.id,
                invoice_number: Some("INV-0042".to_string()),
                date: date(2024, 4, 30),
                amount: 1_250_000,
                status: Some(InvoiceStatus::Unpaid),
                notes: Some("April hire".to_string()),
            },
        )
        .await?;
        assert_eq!(created.status, InvoiceStatus::Unpaid);

        let fetched = get_invoice_by_id(&db, created.id).await?.unwrap();
        assert_eq!(fetched, created);

        Ok(())
    }

    #[tokio::test]
    async fn test_list_invoices_for_equipment_type() -> Result<()> {
        let (db, fixture) = setup_with_project().await?;
        let crane =
            create_test_equipment_type(&db, fixture.organization.id, "Crane").await?;
        let idle = create_test_equipment_type(&db, fixture.organization.id, "Roller").await?;

        let first =
            create_test_invoice(&db, fixture.project.id, fixture.equipment_type.id, 1_000).await?;
        let second =
            create_test_invoice(&db, fixture.project.id, fixture.equipment_type.id, 2_000).await?;
        let other = create_test_invoice(&db, fixture.project.id, crane.id, 3_000).await?;

        let listed = list_invoices_for_equipment_type(&db, fixture.equipment_type.id).await?;
        let ids: Vec<i32> = listed.iter().map(|invoice| invoice.id).collect();
        assert_eq!(ids, vec![first.id, second.id]);

        let listed = list_invoices_for_equipment_type(&db, crane.id).await?;
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, other.id);
        assert_eq!(listed[0].amount, 3_000);

        assert!(list_invoices_for_equipment_type(&db, idle.id).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_invoice_defaults_to_pending() -> Result<()> {
        let (db, fixture) = setup_with_invoice().await?;
        assert_eq!(fixture.invoice.status, InvoiceStatus::Pending);
        assert_eq!(fixture.invoice.invoice_number, None);
        assert_eq!(fixture.invoice.notes, None);

        let pending =
            list_invoices_by_status(&db, fixture.project.id, InvoiceStatus::Pending).await?;
        assert_eq!(pending, vec![fixture.invoice]);

        Ok(())
    }

    #[tokio::test]
    async fn test_negative_invoice_amount_rejected() -> Result<()> {
        let (db, fixture) = setup_with_project().await?;

        let result =
            create_test_invoice(&db, fixture.project.id, fixture.equipment_type.id, -100).await;
        assert!(matches!(result, Err(Error::InvalidAmount { amount: -100 })));
        assert!(
            list_invoices_for_project(&db, fixture.project.id)
                .await?
                .is_empty()
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_invoice_across_organizations_rejected() -> Result<()> {
        let (db, fixture) = setup_with_project().await?;
        let globex = create_test_organization(&db, "globex").await?;
        let foreign_crane = create_test_equipment_type(&db, globex.id, "Crane").await?;

        let result = create_test_invoice(&db, fixture.project.id, foreign_crane.id, 5000).await;
        assert!(matches!(
            result,
            Err(Error::TenantMismatch {
                project_organization_id,
                equipment_organization_id,
            }) if project_organization_id == fixture.organization.id
                && equipment_organization_id == globex.id
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_invoice_with_missing_parent() -> Result<()> {
        let (db, fixture) = setup_with_project().await?;

        let result = create_test_invoice(&db, 999, fixture.equipment_type.id, 100).await;
        assert!(matches!(
            result,
            Err(Error::NotFound {
                entity: "project",
                id: 999
            })
        ));

        // Bypassing the checks leaves enforcement to the foreign key
        let now = Utc::now();
        let orphan = invoice::ActiveModel {
            project_id: Set(999),
            equipment_type_id: Set(fixture.equipment_type.id),
            date: Set(date(2024, 1, 31)),
            amount: Set(100),
            status: Set(InvoiceStatus::Pending),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        let result: Result<invoice::Model> = orphan.insert(&db).await.map_err(Into::into);
        assert!(matches!(result, Err(Error::ForeignKeyViolation { .. })));

        Ok(())
    }

    #[tokio::test]
    async fn test_invoice_missing_amount_is_not_null_violation() -> Result<()> {
        let (db, fixture) = setup_with_project().await?;
        let now = Utc::now();

        let invoice = invoice::ActiveModel {
            project_id: Set(fixture.project.id),
            equipment_type_id: Set(fixture.equipment_type.id),
            date: Set(date(2024, 1, 31)),
            status: Set(InvoiceStatus::Pending),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        let result: Result<invoice::Model> = invoice.insert(&db).await.map_err(Into::into);
        assert!(matches!(result, Err(Error::NotNullViolation { .. })));

        Ok(())
    }

    #[tokio::test]
    async fn test_update_invoice() -> Result<()> {
        let (db, fixture) = setup_with_invoice().await?;

        let paid = set_invoice_status(&db, fixture.invoice.id, InvoiceStatus::Paid).await?;
        assert_eq!(paid.status, InvoiceStatus::Paid);
        assert!(paid.updated_at >= fixture.invoice.updated_at);

        let corrected = update_invoice(
            &db,
            fixture.invoice.id,
            InvoiceUpdate {
                amount: Some(99_999),
                invoice_number: Some(Some("INV-7".to_string())),
                ..Default::default()
            },
        )
        .await?;
        assert_eq!(corrected.amount, 99_999);
        assert_eq!(corrected.invoice_number.as_deref(), Some("INV-7"));
        assert_eq!(corrected.status, InvoiceStatus::Paid);

        let globex = create_test_organization(&db, "globex").await?;
        let foreign = create_test_equipment_type(&db, globex.id, "Grader").await?;
        let result = update_invoice(
            &db,
            fixture.invoice.id,
            InvoiceUpdate {
                equipment_type_id: Some(foreign.id),
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(result, Err(Error::TenantMismatch { .. })));

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_invoice_cascades_to_expenses() -> Result<()> {
        let (db, fixture) = setup_with_invoice().await?;
        let expense = create_test_expense(&db, fixture.invoice.id, "fuel", 4200).await?;

        delete_invoice(&db, fixture.invoice.id).await?;

        assert!(get_invoice_by_id(&db, fixture.invoice.id).await?.is_none());
        assert!(
            crate::core::expense::get_expense_by_id(&db, expense.id)
                .await?
                .is_none()
        );
        // The equipment type is free to go once nothing references it
        crate::core::equipment_type::delete_equipment_type(&db, fixture.equipment_type.id)
            .await?;

        Ok(())
    }
}
