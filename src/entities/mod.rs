//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for selected rows, an ActiveModel for partial
//! inserts and updates, and an Entity struct for operations.

pub mod equipment_type;
pub mod expense;
pub mod invoice;
pub mod organization;
pub mod project;
pub mod user;

// Re-export specific types to avoid conflicts
pub use equipment_type::{
    Column as EquipmentTypeColumn, Entity as EquipmentType, Model as EquipmentTypeModel,
};
pub use expense::{Column as ExpenseColumn, Entity as Expense, ExpenseCategory, Model as ExpenseModel};
pub use invoice::{Column as InvoiceColumn, Entity as Invoice, InvoiceStatus, Model as InvoiceModel};
pub use organization::{
    Column as OrganizationColumn, Entity as Organization, Model as OrganizationModel,
    OrganizationStatus, SubscriptionTier,
};
pub use project::{Column as ProjectColumn, Entity as Project, Model as ProjectModel, ProjectStatus};
pub use user::{Column as UserColumn, Entity as User, Model as UserModel, UserRole};
