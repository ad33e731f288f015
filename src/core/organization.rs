//! Organization business logic - Tenant creation, lookup, update and removal.
//!
//! Removing an organization relies on the database to cascade the delete to its
//! users, projects and equipment types, and from there to invoices and expenses.

use crate::{
    entities::{Organization, OrganizationStatus, SubscriptionTier, organization},
    errors::{Error, Result},
};
use chrono::Utc;
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::{debug, info, instrument};

/// Insert type for `organizations`. Unset optional fields take the column defaults.
#[derive(Debug, Clone, Default)]
pub struct NewOrganization {
    /// Display name
    pub name: String,
    /// Validated with [`validate_slug`]
    pub slug: String,
    /// Defaults to `active`
    pub status: Option<OrganizationStatus>,
    /// Defaults to `basic`
    pub subscription: Option<SubscriptionTier>,
    /// Defaults to `{}`
    pub settings: Option<Json>,
}

/// Patch for an existing organization. `None` leaves a column untouched.
#[derive(Debug, Clone, Default)]
pub struct OrganizationUpdate {
    /// New display name
    pub name: Option<String>,
    /// New slug, validated like on insert
    pub slug: Option<String>,
    /// New status
    pub status: Option<OrganizationStatus>,
    /// New subscription tier
    pub subscription: Option<SubscriptionTier>,
    /// Replaces the whole settings document
    pub settings: Option<Json>,
}

/// Slugs are lowercase ASCII letters, digits and single inner hyphens.
pub fn validate_slug(slug: &str) -> Result<String> {
    let slug = crate::core::required_text("slug", slug)?;
    let valid_chars = slug
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    if !valid_chars || slug.starts_with('-') || slug.ends_with('-') || slug.contains("--") {
        return Err(Error::Validation {
            message: format!("invalid slug '{slug}'"),
        });
    }
    Ok(slug)
}

/// Creates a new organization. A duplicate slug surfaces as [`Error::UniqueViolation`].
#[instrument(skip(db, new), fields(slug = %new.slug))]
pub async fn create_organization<C>(db: &C, new: NewOrganization) -> Result<organization::Model>
where
    C: ConnectionTrait,
{
    let name = crate::core::required_text("name", &new.name)?;
    let slug = validate_slug(&new.slug)?;
    let now = Utc::now();

    let organization = organization::ActiveModel {
        name: Set(name),
        slug: Set(slug),
        status: Set(new.status.unwrap_or_default()),
        subscription: Set(new.subscription.unwrap_or_default()),
        settings: Set(new.settings.unwrap_or_else(|| serde_json::json!({}))),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let result = organization.insert(db).await?;
    info!(id = result.id, "Created organization");
    Ok(result)
}

/// Looks up an organization by primary key.
pub async fn get_organization_by_id<C>(db: &C, id: i32) -> Result<Option<organization::Model>>
where
    C: ConnectionTrait,
{
    Organization::find_by_id(id).one(db).await.map_err(Into::into)
}

/// Finds an organization by its slug.
pub async fn get_organization_by_slug<C>(
    db: &C,
    slug: &str,
) -> Result<Option<organization::Model>>
where
    C: ConnectionTrait,
{
    Organization::find()
        .filter(organization::Column::Slug.eq(slug))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves all organizations ordered by name.
pub async fn list_organizations<C>(db: &C) -> Result<Vec<organization::Model>>
where
    C: ConnectionTrait,
{
    Organization::find()
        .order_by_asc(organization::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Applies `changes` to an organization and refreshes `updated_at`.
#[instrument(skip(db, changes))]
pub async fn update_organization<C>(
    db: &C,
    id: i32,
    changes: OrganizationUpdate,
) -> Result<organization::Model>
where
    C: ConnectionTrait,
{
    let existing = get_organization_by_id(db, id)
        .await?
        .ok_or(Error::NotFound {
            entity: "organization",
            id,
        })?;

    let mut organization: organization::ActiveModel = existing.into();
    if let Some(name) = changes.name {
        organization.name = Set(crate::core::required_text("name", &name)?);
    }
    if let Some(slug) = changes.slug {
        organization.slug = Set(validate_slug(&slug)?);
    }
    if let Some(status) = changes.status {
        organization.status = Set(status);
    }
    if let Some(subscription) = changes.subscription {
        organization.subscription = Set(subscription);
    }
    if let Some(settings) = changes.settings {
        organization.settings = Set(settings);
    }
    organization.updated_at = Set(Utc::now());

    organization.update(db).await.map_err(Into::into)
}

/// Sets the lifecycle status of an organization.
pub async fn set_organization_status<C>(
    db: &C,
    id: i32,
    status: OrganizationStatus,
) -> Result<organization::Model>
where
    C: ConnectionTrait,
{
    update_organization(
        db,
        id,
        OrganizationUpdate {
            status: Some(status),
            ..Default::default()
        },
    )
    .await
}

/// Deletes an organization and, through the cascades, everything it owns.
#[instrument(skip(db))]
pub async fn delete_organization<C>(db: &C, id: i32) -> Result<()>
where
    C: ConnectionTrait,
{
    let result = Organization::delete_by_id(id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::NotFound {
            entity: "organization",
            id,
        });
    }
    debug!(id, "Deleted organization");
    Ok(())
}
