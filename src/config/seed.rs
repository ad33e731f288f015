//! Tenant seed configuration loaded from a TOML file.
//!
//! The seed file lists organizations, each with the equipment types it starts
//! out with. It is applied by [`crate::core::seed::seed_tenants`] on startup.
//!
//! ```toml
//! [[organizations]]
//! name = "Acme Earthworks"
//! slug = "acme-earthworks"
//! subscription = "premium"
//!
//! [organizations.settings]
//! timezone = "Europe/Dublin"
//!
//! [[organizations.equipment_types]]
//! name = "Excavator"
//! category = "heavy"
//! ```

use crate::entities::{OrganizationStatus, SubscriptionTier};
use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Used when `LEDGER_SEED_FILE` is not set.
pub const DEFAULT_SEED_FILE: &str = "config.toml";

/// Configuration structure representing the entire seed file
#[derive(Debug, Default, Deserialize)]
pub struct SeedConfig {
    /// Tenants to create, in file order
    #[serde(default)]
    pub organizations: Vec<OrganizationSeed>,
}

/// One tenant to create if its slug is not taken yet
#[derive(Debug, Clone, Deserialize)]
pub struct OrganizationSeed {
    /// Display name
    pub name: String,
    /// Slug the tenant is matched on; trimmed before lookup
    pub slug: String,
    /// Defaults to `active`
    #[serde(default)]
    pub status: Option<OrganizationStatus>,
    /// Defaults to `basic`
    #[serde(default)]
    pub subscription: Option<SubscriptionTier>,
    /// Any TOML table; stored as the organization's JSON settings
    #[serde(default)]
    pub settings: Option<serde_json::Value>,
    /// Equipment types to create under this tenant
    #[serde(default)]
    pub equipment_types: Vec<EquipmentTypeSeed>,
}

/// An equipment type created for its parent organization
#[derive(Debug, Clone, Deserialize)]
pub struct EquipmentTypeSeed {
    /// Name the type is matched on within its organization
    pub name: String,
    /// Free text, e.g. `heavy` or `transport`
    #[serde(default)]
    pub category: Option<String>,
    /// Optional free text
    #[serde(default)]
    pub description: Option<String>,
}

/// Path of the seed file, from `LEDGER_SEED_FILE` or the default.
#[must_use]
pub fn get_seed_file() -> String {
    std::env::var("LEDGER_SEED_FILE").unwrap_or_else(|_| DEFAULT_SEED_FILE.to_string())
}

/// Parses seed configuration from TOML text.
pub fn parse_seed_config(contents: &str) -> Result<SeedConfig> {
    toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse seed file: {e}"),
    })
}

/// Loads seed configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - Required fields are missing or an enum value is unknown
pub fn load_seed_config<P: AsRef<Path>>(path: P) -> Result<SeedConfig> {
    let path = path.as_ref();
    tracing::debug!("Loading seed configuration from {:?}", path);
    let contents = std::fs::read_to_string(path).map_err(|e| Error::Config {
        message: format!("Failed to read seed file {}: {e}", path.display()),
    })?;

    parse_seed_config(&contents)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_parse_seed_config() {
        let toml_str = r#"
            [[organizations]]
            name = "Acme Earthworks"
            slug = "acme-earthworks"
            subscription = "premium"

            [organizations.settings]
            timezone = "Europe/Dublin"
            invoice_prefix = "ACM"

            [[organizations.equipment_types]]
            name = "Excavator"
            category = "heavy"

            [[organizations.equipment_types]]
            name = "Van"

            [[organizations]]
            name = "Globex"
            slug = "globex"
            status = "trial"
        "#;

        let config = parse_seed_config(toml_str).unwrap();
        assert_eq!(config.organizations.len(), 2);

        let acme = &config.organizations[0];
        assert_eq!(acme.subscription, Some(SubscriptionTier::Premium));
        assert_eq!(acme.status, None);
        assert_eq!(
            acme.settings.as_ref().unwrap()["timezone"],
            "Europe/Dublin"
        );
        assert_eq!(acme.equipment_types.len(), 2);
        assert_eq!(acme.equipment_types[0].category.as_deref(), Some("heavy"));
        assert_eq!(acme.equipment_types[1].category, None);

        let globex = &config.organizations[1];
        assert_eq!(globex.status, Some(OrganizationStatus::Trial));
        assert!(globex.equipment_types.is_empty());
        assert!(globex.settings.is_none());
    }

    #[test]
    fn test_unknown_subscription_is_config_error() {
        let toml_str = r#"
            [[organizations]]
            name = "Initech"
            slug = "initech"
            subscription = "platinum"
        "#;

        assert!(matches!(
            parse_seed_config(toml_str),
            Err(Error::Config { .. })
        ));
    }

    #[test]
    fn test_empty_seed_file() {
        let config = parse_seed_config("").unwrap();
        assert!(config.organizations.is_empty());
    }

    #[test]
    fn test_missing_seed_file() {
        assert!(matches!(
            load_seed_config("does/not/exist.toml"),
            Err(Error::Config { .. })
        ));
    }
}
