//! User business logic - Creating and maintaining the logins of an organization.
//!
//! Emails are normalized to lowercase before they are stored, so the unique key
//! on `users.email` is effectively case-insensitive. Password hashing happens
//! before these functions are called; only the hash is persisted.

use crate::{
    entities::{User, UserRole, user},
    errors::{Error, Result},
};
use chrono::Utc;
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::{info, instrument};

/// Insert type for `users`
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Owning tenant
    pub organization_id: i32,
    /// Login identity; trimmed and lowercased before storage
    pub email: String,
    /// Hash produced by the caller
    pub password_hash: String,
    /// Access role
    pub role: UserRole,
    /// Defaults to `true`
    pub is_active: Option<bool>,
}

/// Patch for an existing user. `None` leaves a column untouched.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    /// New email, normalized like on insert
    pub email: Option<String>,
    /// New password hash
    pub password_hash: Option<String>,
    /// New role
    pub role: Option<UserRole>,
    /// Enable or disable the login
    pub is_active: Option<bool>,
}

fn normalize_email(email: &str) -> Result<String> {
    let email = crate::core::required_text("email", email)?.to_lowercase();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(email),
        _ => Err(Error::Validation {
            message: format!("invalid email '{email}'"),
        }),
    }
}

/// Creates a user in an organization.
///
/// A missing organization surfaces as [`Error::ForeignKeyViolation`], a reused
/// email as [`Error::UniqueViolation`].
#[instrument(skip(db, new), fields(organization_id = new.organization_id))]
pub async fn create_user<C>(db: &C, new: NewUser) -> Result<user::Model>
where
    C: ConnectionTrait,
{
    let email = normalize_email(&new.email)?;
    let password_hash = crate::core::required_text("password_hash", &new.password_hash)?;
    let now = Utc::now();

    let user = user::ActiveModel {
        organization_id: Set(new.organization_id),
        email: Set(email),
        password_hash: Set(password_hash),
        role: Set(new.role),
        is_active: Set(new.is_active.unwrap_or(true)),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let result = user.insert(db).await?;
    info!(id = result.id, "Created user");
    Ok(result)
}

/// Looks up a user by primary key.
pub async fn get_user_by_id<C>(db: &C, id: i32) -> Result<Option<user::Model>>
where
    C: ConnectionTrait,
{
    User::find_by_id(id).one(db).await.map_err(Into::into)
}

/// Looks a user up by login email, ignoring case.
pub async fn get_user_by_email<C>(db: &C, email: &str) -> Result<Option<user::Model>>
where
    C: ConnectionTrait,
{
    User::find()
        .filter(user::Column::Email.eq(email.trim().to_lowercase()))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Lists the users of an organization ordered by email.
pub async fn list_users_for_organization<C>(
    db: &C,
    organization_id: i32,
) -> Result<Vec<user::Model>>
where
    C: ConnectionTrait,
{
    User::find()
        .filter(user::Column::OrganizationId.eq(organization_id))
        .order_by_asc(user::Column::Email)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Applies `changes` and refreshes `updated_at`.
#[instrument(skip(db, changes))]
pub async fn update_user<C>(db: &C, id: i32, changes: UserUpdate) -> Result<user::Model>
where
    C: ConnectionTrait,
{
    let existing = get_user_by_id(db, id)
        .await?
        .ok_or(Error::NotFound { entity: "user", id })?;

    let mut user: user::ActiveModel = existing.into();
    if let Some(email) = changes.email {
        user.email = Set(normalize_email(&email)?);
    }
    if let Some(password_hash) = changes.password_hash {
        user.password_hash = Set(crate::core::required_text("password_hash", &password_hash)?);
    }
    if let Some(role) = changes.role {
        user.role = Set(role);
    }
    if let Some(is_active) = changes.is_active {
        user.is_active = Set(is_active);
    }
    user.updated_at = Set(Utc::now());

    user.update(db).await.map_err(Into::into)
}

/// Enables or disables a login without deleting it.
pub async fn set_user_active<C>(db: &C, id: i32, is_active: bool) -> Result<user::Model>
where
    C: ConnectionTrait,
{
    update_user(
        db,
        id,
        UserUpdate {
            is_active: Some(is_active),
            ..Default::default()
        },
    )
    .await
}

/// Deletes a user.
#[instrument(skip(db))]
pub async fn delete_user<C>(db: &C, id: i32) -> Result<()>
where
    C: ConnectionTrait,
{
    let result = User::delete_by_id(id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::NotFound { entity: "user", id });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    #[test]
    fn test_normalize_email() {
        assert_eq!(
            normalize_email("  Ops@Acme.Example ").unwrap(),
            "ops@acme.example"
        );
        assert!(normalize_email("not-an-email").is_err());
        assert!(normalize_email("@acme.example").is_err());
        assert!(normalize_email("").is_err());
    }

    #[tokio::test]
    async fn test_user_round_trip() -> Result<()> {
        let db = setup_test_db().await?;
        let organization = create_test_organization(&db, "acme").await?;

        let created = create_user(
            &db,
            NewUser {
                organization_id: organization.id,
                email: "Finance@Acme.Example".to_string(),
                password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_string(),
                role: UserRole::Finance,
                is_active: None,
            },
        )
        .await?;

        assert_eq!(created.email, "finance@acme.example");
        assert!(created.is_active);

        let fetched = get_user_by_id(&db, created.id).await?.unwrap();
        assert_eq!(fetched, created);

        let by_email = get_user_by_email(&db, "FINANCE@acme.example").await?.unwrap();
        assert_eq!(by_email.id, created.id);

        Ok(())
    }

    #[tokio::test]
    async fn test_duplicate_email_is_unique_violation() -> Result<()> {
        let db = setup_test_db().await?;
        let acme = create_test_organization(&db, "acme").await?;
        let globex = create_test_organization(&db, "globex").await?;

        create_test_user(&db, acme.id, "pm@example.com").await?;
        let result = create_test_user(&db, globex.id, "PM@example.com").await;
        assert!(matches!(result, Err(Error::UniqueViolation { .. })));

        Ok(())
    }

    #[tokio::test]
    async fn test_user_requires_existing_organization() -> Result<()> {
        let db = setup_test_db().await?;

        let result = create_test_user(&db, 42, "ghost@example.com").await;
        assert!(matches!(result, Err(Error::ForeignKeyViolation { .. })));

        Ok(())
    }

    #[tokio::test]
    async fn test_user_missing_password_hash_is_not_null_violation() -> Result<()> {
        let db = setup_test_db().await?;
        let organization = create_test_organization(&db, "acme").await?;
        let now = Utc::now();

        let user = user::ActiveModel {
            organization_id: Set(organization.id),
            email: Set("nohash@example.com".to_string()),
            role: Set(UserRole::Operations),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        let result: Result<user::Model> = user.insert(&db).await.map_err(Into::into);
        assert!(matches!(result, Err(Error::NotNullViolation { .. })));

        Ok(())
    }

    #[tokio::test]
    async fn test_update_and_deactivate_user() -> Result<()> {
        let db = setup_test_db().await?;
        let organization = create_test_organization(&db, "acme").await?;
        let user = create_test_user(&db, organization.id, "pm@example.com").await?;

        let promoted = update_user(
            &db,
            user.id,
            UserUpdate {
                role: Some(UserRole::Admin),
                ..Default::default()
            },
        )
        .await?;
        assert_eq!(promoted.role, UserRole::Admin);
        assert!(promoted.updated_at >= user.updated_at);

        let disabled = set_user_active(&db, user.id, false).await?;
        assert!(!disabled.is_active);

        delete_user(&db, user.id).await?;
        assert!(get_user_by_id(&db, user.id).await?.is_none());
        assert!(list_users_for_organization(&db, organization.id).await?.is_empty());

        Ok(())
    }
}
