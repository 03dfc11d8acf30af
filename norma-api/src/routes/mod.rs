/// API route handlers
///
/// # Modules
///
/// - `health`: liveness and database connectivity
/// - `auth`: registration, login, token refresh
/// - `organizations`: current-organization read/update
/// - `modules`: catalog, entitlement state, access resolution, trials
/// - `employees`: employee CRUD with CNP validation
/// - `records`: medical exams, trainings, equipment inspections
/// - `alerts`: expiry scan output
/// - `billing`: payment provider webhook
/// - `cron`: scheduled triggers guarded by a static secret

pub mod alerts;
pub mod auth;
pub mod billing;
pub mod cron;
pub mod employees;
pub mod health;
pub mod modules;
pub mod organizations;
pub mod records;
