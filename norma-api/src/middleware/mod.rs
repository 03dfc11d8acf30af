/// API middleware
///
/// - `security`: response security headers (OWASP recommendations)

pub mod security;
