/// Common test utilities for integration tests
///
/// Shared infrastructure for the API integration suite:
/// - test database setup and cleanup
/// - test organization/user creation
/// - JWT token generation
/// - router construction with a mock notification channel
///
/// Tests that use [`TestContext`] require a running PostgreSQL pointed to
/// by `DATABASE_URL` and are marked `#[ignore]`.

use norma_api::app::{build_router, AppState};
use norma_api::config::Config;
use norma_shared::auth::jwt::{create_token, Claims, TokenType};
use norma_shared::models::membership::{CreateMembership, Membership, MembershipRole};
use norma_shared::models::organization::{CreateOrganization, Organization};
use norma_shared::models::user::{CreateUser, User};
use norma_worker::channels::MockChannel;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

/// Test context containing all necessary resources
pub struct TestContext {
    pub db: PgPool,
    pub app: axum::Router,
    pub config: Config,
    pub organization: Organization,
    pub user: User,
    pub jwt_token: String,
    pub mock_channel: MockChannel,
}

impl TestContext {
    /// Creates a new test context with a fresh organization and user
    pub async fn new() -> anyhow::Result<Self> {
        // Test configuration comes from the environment (.env in dev)
        std::env::set_var(
            "JWT_SECRET",
            std::env::var("JWT_SECRET")
                .unwrap_or_else(|_| "integration-test-secret-32-bytes!!".to_string()),
        );
        std::env::set_var(
            "BILLING_WEBHOOK_SECRET",
            std::env::var("BILLING_WEBHOOK_SECRET").unwrap_or_else(|_| "whsec_test".to_string()),
        );
        std::env::set_var(
            "CRON_SECRET",
            std::env::var("CRON_SECRET").unwrap_or_else(|_| "cron_test_secret".to_string()),
        );

        let config = Config::from_env()?;

        let db = PgPool::connect(&config.database.url).await?;

        // Run migrations (path relative to the shared crate)
        sqlx::migrate!("../norma-shared/migrations").run(&db).await?;

        let organization = Organization::create(
            &db,
            CreateOrganization {
                name: format!("Test SRL {}", Uuid::new_v4()),
                cui: None,
            },
        )
        .await?;

        let user = User::create(
            &db,
            CreateUser {
                email: format!("test-{}@example.com", Uuid::new_v4()),
                password_hash: "test_hash".to_string(), // Not used in these tests
                name: Some("Test User".to_string()),
            },
        )
        .await?;

        Membership::create(
            &db,
            CreateMembership {
                organization_id: organization.id,
                user_id: user.id,
                role: MembershipRole::Owner,
            },
        )
        .await?;

        let claims = Claims::new(user.id, organization.id, TokenType::Access);
        let jwt_token = create_token(&claims, &config.jwt.secret)?;

        let mock_channel = MockChannel::new();
        let state = AppState::new(
            db.clone(),
            config.clone(),
            vec![Arc::new(mock_channel.clone())],
        );
        let app = build_router(state);

        Ok(TestContext {
            db,
            app,
            config,
            organization,
            user,
            jwt_token,
            mock_channel,
        })
    }

    /// Returns authorization header value
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.jwt_token)
    }

    /// Cleans up test data
    pub async fn cleanup(&self) -> anyhow::Result<()> {
        // Delete the organization (cascades to everything tenant-scoped)
        Organization::delete(&self.db, self.organization.id).await?;
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(self.user.id)
            .execute(&self.db)
            .await?;
        Ok(())
    }
}

/// Reads a JSON response body
pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}
