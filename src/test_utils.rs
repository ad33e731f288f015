//! Shared test utilities.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test rows with sensible defaults.
#![allow(clippy::unwrap_used)]

use crate::{
    core::{equipment_type, expense, invoice, organization, project, user},
    entities::{self, InvoiceStatus, UserRole},
    errors::Result,
};
use chrono::{NaiveDate, Utc};
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all database tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = crate::config::database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Shorthand for a calendar date in tests.
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Creates a test organization named after its slug, with default status and plan.
pub async fn create_test_organization(
    db: &DatabaseConnection,
    slug: &str,
) -> Result<entities::organization::Model> {
    organization::create_organization(
        db,
        organization::NewOrganization {
            name: format!("{slug} ltd"),
            slug: slug.to_string(),
            ..Default::default()
        },
    )
    .await
}

/// Creates an active project-manager user.
pub async fn create_test_user(
    db: &DatabaseConnection,
    organization_id: i32,
    email: &str,
) -> Result<entities::user::Model> {
    user::create_user(
        db,
        user::NewUser {
            organization_id,
            email: email.to_string(),
            password_hash: "test-hash".to_string(),
            role: UserRole::Pm,
            is_active: None,
        },
    )
    .await
}

/// Creates a test project starting 2024-01-15 with no end date.
pub async fn create_test_project(
    db: &DatabaseConnection,
    organization_id: i32,
    project_number: &str,
) -> Result<entities::project::Model> {
    project::create_project(
        db,
        project::NewProject {
            organization_id,
            project_number: project_number.to_string(),
            description: None,
            client: "Test Client".to_string(),
            status: None,
            duration: None,
            start_date: date(2024, 1, 15),
            end_date: None,
        },
    )
    .await
}

/// Creates an active test equipment type in the "heavy" category.
pub async fn create_test_equipment_type(
    db: &DatabaseConnection,
    organization_id: i32,
    name: &str,
) -> Result<entities::equipment_type::Model> {
    equipment_type::create_equipment_type(
        db,
        equipment_type::NewEquipmentType {
            organization_id,
            name: name.to_string(),
            category: Some("heavy".to_string()),
            description: None,
            is_active: None,
        },
    )
    .await
}

/// Creates a pending test invoice dated 2024-01-31.
pub async fn create_test_invoice(
    db: &DatabaseConnection,
    project_id: i32,
    equipment_type_id: i32,
    amount: i64,
) -> Result<entities::invoice::Model> {
    invoice::create_invoice(
        db,
        invoice::NewInvoice {
            project_id,
            equipment_type_id,
            invoice_number: None,
            date: date(2024, 1, 31),
            amount,
            status: None,
            notes: None,
        },
    )
    .await
}

/// Creates a test expense dated 2024-01-20.
pub async fn create_test_expense(
    db: &DatabaseConnection,
    invoice_id: i32,
    category: &str,
    amount: i64,
) -> Result<entities::expense::Model> {
    expense::create_expense(
        db,
        expense::NewExpense {
            invoice_id,
            category: category.to_string(),
            amount,
            description: None,
            date: date(2024, 1, 20),
        },
    )
    .await
}

/// Rows created by [`setup_with_project`] and [`setup_with_invoice`].
#[derive(Debug, Clone)]
pub struct TestTenant {
    /// The tenant
    pub organization: entities::organization::Model,
    /// Its project
    pub project: entities::project::Model,
    /// Its equipment type
    pub equipment_type: entities::equipment_type::Model,
    /// An invoice on both, or a placeholder row
    pub invoice: entities::invoice::Model,
}

/// Sets up an "acme" organization with one project and one equipment type.
/// The returned `invoice` is a placeholder row that is not persisted.
pub async fn setup_with_project() -> Result<(DatabaseConnection, TestTenant)> {
    let db = setup_test_db().await?;
    let organization = create_test_organization(&db, "acme").await?;
    let project = create_test_project(&db, organization.id, "PRJ-001").await?;
    let equipment_type = create_test_equipment_type(&db, organization.id, "Excavator").await?;
    let invoice = invoice_row(0, 0);
    Ok((
        db,
        TestTenant {
            organization,
            project,
            equipment_type,
            invoice,
        },
    ))
}

/// Same as [`setup_with_project`] plus a persisted 1000.00 invoice.
pub async fn setup_with_invoice() -> Result<(DatabaseConnection, TestTenant)> {
    let (db, mut fixture) = setup_with_project().await?;
    fixture.invoice =
        create_test_invoice(&db, fixture.project.id, fixture.equipment_type.id, 100_000).await?;
    Ok((db, fixture))
}

/// An invoice model that never touched the database.
pub fn invoice_row(id: i32, amount: i64) -> entities::invoice::Model {
    let now = Utc::now();
    entities::invoice::Model {
        id,
        invoice_number: None,
        project_id: 0,
        equipment_type_id: 0,
        date: date(2024, 1, 31),
        amount,
        status: InvoiceStatus::Pending,
        notes: None,
        created_at: now,
        updated_at: now,
    }
}

/// An expense model that never touched the database.
pub fn expense_row(id: i32, invoice_id: i32, amount: i64) -> entities::expense::Model {
    let now = Utc::now();
    entities::expense::Model {
        id,
        invoice_id,
        category: "other".to_string(),
        amount,
        description: None,
        date: date(2024, 1, 20),
        created_at: now,
        updated_at: now,
    }
}
