//! Database models
//!
//! One module per table, each owning its row struct, input structs, and
//! query methods. All tenant data is scoped by `organization_id` and API
//! lookups go through the `*_and_organization` variants so cross-tenant IDs
//! behave like missing rows.

pub mod alert;
pub mod employee;
pub mod equipment;
pub mod medical_exam;
pub mod membership;
pub mod org_module;
pub mod organization;
pub mod subscription;
pub mod training;
pub mod user;
