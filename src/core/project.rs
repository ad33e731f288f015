//! Project business logic - Client engagements owned by an organization.
//!
//! `end_date` and `duration` are optional; when an end date is given it may
//! not fall before the start date.

use crate::{
    entities::{Project, ProjectStatus, project},
    errors::{Error, Result},
};
use chrono::{NaiveDate, Utc};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::{info, instrument};

/// Insert type for `projects`
#[derive(Debug, Clone)]
pub struct NewProject {
    /// Owning tenant
    pub organization_id: i32,
    /// Tenant-assigned project number
    pub project_number: String,
    /// Optional free text
    pub description: Option<String>,
    /// Client the work is billed to
    pub client: String,
    /// Defaults to `active`
    pub status: Option<ProjectStatus>,
    /// Planned length in days
    pub duration: Option<i32>,
    /// First day of the project
    pub start_date: NaiveDate,
    /// Last day of the project; must not precede `start_date`
    pub end_date: Option<NaiveDate>,
}

/// Patch for an existing project. The nested options on nullable columns
/// distinguish "leave alone" (`None`) from "clear" (`Some(None)`).
#[derive(Debug, Clone, Default)]
pub struct ProjectUpdate {
    /// New project number
    pub project_number: Option<String>,
    /// `Some(None)` clears the description
    pub description: Option<Option<String>>,
    /// New client
    pub client: Option<String>,
    /// New status
    pub status: Option<ProjectStatus>,
    /// `Some(None)` clears the duration
    pub duration: Option<Option<i32>>,
    /// New start date
    pub start_date: Option<NaiveDate>,
    /// `Some(None)` clears the end date
    pub end_date: Option<Option<NaiveDate>>,
}

fn validate_schedule(
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
    duration: Option<i32>,
) -> Result<()> {
    if let Some(end_date) = end_date {
        if end_date < start_date {
            return Err(Error::Validation {
                message: format!("end date {end_date} is before start date {start_date}"),
            });
        }
    }
    if let Some(duration) = duration {
        if duration < 0 {
            return Err(Error::Validation {
                message: format!("duration cannot be negative: {duration} days"),
            });
        }
    }
    Ok(())
}

/// Inserts a project after checking its schedule.
#[instrument(skip(db, new), fields(organization_id = new.organization_id))]
pub async fn create_project<C>(db: &C, new: NewProject) -> Result<project::Model>
where
    C: ConnectionTrait,
{
    let project_number = crate::core::required_text("project_number", &new.project_number)?;
    let client = crate::core::required_text("client", &new.client)?;
    validate_schedule(new.start_date, new.end_date, new.duration)?;
    let now = Utc::now();

    let project = project::ActiveModel {
        organization_id: Set(new.organization_id),
        project_number: Set(project_number),
        description: Set(crate::core::optional_text(new.description)),
        client: Set(client),
        status: Set(new.status.unwrap_or_default()),
        duration: Set(new.duration),
        start_date: Set(new.start_date),
        end_date: Set(new.end_date),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let result = project.insert(db).await?;
    info!(id = result.id, "Created project");
    Ok(result)
}

/// Looks up a project by primary key.
pub async fn get_project_by_id<C>(db: &C, id: i32) -> Result<Option<project::Model>>
where
    C: ConnectionTrait,
{
    Project::find_by_id(id).one(db).await.map_err(Into::into)
}

/// Lists an organization's projects, most recent start date first.
pub async fn list_projects_for_organization<C>(
    db: &C,
    organization_id: i32,
) -> Result<Vec<project::Model>>
where
    C: ConnectionTrait,
{
    Project::find()
        .filter(project::Column::OrganizationId.eq(organization_id))
        .order_by_desc(project::Column::StartDate)
        .order_by_asc(project::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Lists an organization's projects in one status.
pub async fn list_projects_by_status<C>(
    db: &C,
    organization_id: i32,
    status: ProjectStatus,
) -> Result<Vec<project::Model>>
where
    C: ConnectionTrait,
{
    Project::find()
        .filter(project::Column::OrganizationId.eq(organization_id))
        .filter(project::Column::Status.eq(status))
        .order_by_desc(project::Column::StartDate)
        .order_by_asc(project::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Applies `changes`, rechecks the schedule and refreshes `updated_at`.
#[instrument(skip(db, changes))]
pub async fn update_project<C>(db: &C, id: i32, changes: ProjectUpdate) -> Result<project::Model>
where
    C: ConnectionTrait,
{
    let existing = get_project_by_id(db, id).await?.ok_or(Error::NotFound {
        entity: "project",
        id,
    })?;

    // Validate the schedule as it will look after the patch
    let start_date = changes.start_date.unwrap_or(existing.start_date);
    let end_date = changes.end_date.unwrap_or(existing.end_date);
    let duration = changes.duration.unwrap_or(existing.duration);
    validate_schedule(start_date, end_date, duration)?;

    let mut project: project::ActiveModel = existing.into();
    if let Some(project_number) = changes.project_number {
        project.project_number = Set(crate::core::required_text("project_number", &project_number)?);
    }
    if let Some(description) = changes.description {
        project.description = Set(crate::core::optional_text(description));
    }
    if let Some(client) = changes.client {
        project.client = Set(crate::core::required_text("client", &client)?);
    }
    if let Some(status) = changes.status {
        project.status = Set(status);
    }
    project.start_date = Set(start_date);
    project.end_date = Set(end_date);
    project.duration = Set(duration);
    project.updated_at = Set(Utc::now());

    project.update(db).await.map_err(Into::into)
}

/// Sets the status and refreshes `updated_at`.
pub async fn set_project_status<C>(
    db: &C,
    id: i32,
    status: ProjectStatus,
) -> Result<project::Model>
where
    C: ConnectionTrait,
{
    update_project(
        db,
        id,
        ProjectUpdate {
            status: Some(status),
            ..Default::default()
        },
    )
    .await
}

/// Deletes a project together with its invoices and their expenses.
#[instrument(skip(db))]
pub async fn delete_project<C>(db: &C, id: i32) -> Result<()>
where
    C: ConnectionTrait,
{
    let result = Project::delete_by_id(id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::NotFound {
            entity: "project",
            id,
        });
    }
    Ok(())
}
