/// Authorization helpers and permission checks
///
/// Role-based access control on top of organization memberships:
///
/// 1. **Membership**: the user must belong to the organization
/// 2. **Role**: the membership role must meet the required level
///    (Owner > Admin > Member > Viewer)
///
/// # Example
///
/// ```no_run
/// use norma_shared::auth::authorization::require_role;
/// use norma_shared::models::membership::MembershipRole;
/// use sqlx::PgPool;
/// use uuid::Uuid;
///
/// # async fn example(pool: PgPool, org_id: Uuid, user_id: Uuid) -> Result<(), Box<dyn std::error::Error>> {
/// // Only owners may start module trials
/// require_role(&pool, org_id, user_id, MembershipRole::Owner).await?;
/// # Ok(())
/// # }
/// ```

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::membership::{Membership, MembershipRole};

/// Error type for authorization checks
#[derive(Debug, thiserror::Error)]
pub enum AuthzError {
    /// User is not a member of the organization
    #[error("Not a member of organization {0}")]
    NotMember(Uuid),

    /// User's role is below the required level
    #[error("Insufficient permissions: requires {required:?}, has {actual:?}")]
    InsufficientRole {
        required: MembershipRole,
        actual: MembershipRole,
    },

    /// Database error
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

/// Checks that a user is a member of an organization
///
/// # Errors
///
/// Returns `AuthzError::NotMember` if the user has no membership.
pub async fn require_membership(
    pool: &PgPool,
    organization_id: Uuid,
    user_id: Uuid,
) -> Result<(), AuthzError> {
    let has_access = Membership::has_access(pool, organization_id, user_id).await?;

    if !has_access {
        return Err(AuthzError::NotMember(organization_id));
    }

    Ok(())
}

/// Checks that a user has at least the required role in an organization
///
/// # Errors
///
/// Returns `AuthzError::NotMember` if there is no membership and
/// `AuthzError::InsufficientRole` if the role is too low.
pub async fn require_role(
    pool: &PgPool,
    organization_id: Uuid,
    user_id: Uuid,
    required_role: MembershipRole,
) -> Result<(), AuthzError> {
    let membership = Membership::find(pool, organization_id, user_id)
        .await?
        .ok_or(AuthzError::NotMember(organization_id))?;

    if !membership.role.has_permission(&required_role) {
        return Err(AuthzError::InsufficientRole {
            required: required_role,
            actual: membership.role,
        });
    }

    Ok(())
}
