//! Account registration, login and demo-account seeding.

use std::sync::Arc;

use serde::Serialize;
use storefront_core::validation::validate_registration;
use storefront_core::{CoreError, Registration, Role, User, ValidationError};
use storefront_db::seed::{seed_demo_data, SeedReport};
use storefront_db::{Database, NewUser};
use tracing::{info, warn};

use crate::auth::{hash_password, verify_password, JwtManager};
use crate::error::{ApiError, ApiResult};

/// Same message for unknown users and wrong passwords.
pub const INVALID_CREDENTIALS: &str = "Invalid username or password.";

/// Demo accounts: (full name, email, username, password, role).
const DEMO_USERS: &[(&str, &str, &str, &str, Role)] = &[
    ("System Admin", "admin@storefront.local", "admin", "admin123", Role::Admin),
    ("Demo Visitor", "visitor@storefront.local", "visitor", "visitor123", Role::Visitor),
];

/// A successful login.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResult {
    pub token: String,
    pub expires_in: i64,
    pub username: String,
    pub role: Role,
}

/// Authentication service.
#[derive(Clone)]
pub struct AuthService {
    db: Database,
    jwt: Arc<JwtManager>,
}

impl AuthService {
    /// Create a new authentication service.
    pub fn new(db: Database, jwt: Arc<JwtManager>) -> Self {
        AuthService { db, jwt }
    }

    /// Registers a new Visitor account.
    ///
    /// Field rules and username/email uniqueness are checked together so the
    /// client sees every problem at once.
    pub async fn register(&self, registration: &Registration) -> ApiResult<User> {
        let mut violations = validate_registration(registration);

        let users = self.db.users();
        let username = registration.username.trim();
        let email = registration.email.trim();

        if !username.is_empty() && users.username_exists(username).await? {
            violations.push(ValidationError::Duplicate {
                field: "Username".to_string(),
                value: username.to_string(),
            });
        }
        if !email.is_empty() && users.email_exists(email).await? {
            violations.push(ValidationError::Duplicate {
                field: "Email".to_string(),
                value: email.to_string(),
            });
        }

        if !violations.is_empty() {
            return Err(CoreError::ValidationFailed(violations).into());
        }

        let user = users
            .insert(&NewUser {
                full_name: registration.full_name.trim().to_string(),
                email: email.to_string(),
                username: username.to_string(),
                password_hash: hash_password(&registration.password)?,
                role: Role::Visitor,
            })
            .await?;

        info!(user_id = %user.id, username = %user.username, "User registered");
        Ok(user)
    }

    /// Exchanges a username and password for a bearer token.
    pub async fn login(&self, username: &str, password: &str) -> ApiResult<LoginResult> {
        let Some(user) = self.db.users().find_by_username(username.trim()).await? else {
            warn!(username = %username, "Login rejected: unknown user");
            return Err(ApiError::validation(INVALID_CREDENTIALS));
        };

        if !verify_password(password, &user.password_hash) {
            warn!(username = %username, "Login rejected: wrong password");
            return Err(ApiError::validation(INVALID_CREDENTIALS));
        }

        let token = self.jwt.generate_token(&user)?;
        info!(user_id = %user.id, role = %user.role, "User logged in");

        Ok(LoginResult {
            token,
            expires_in: self.jwt.lifetime_secs(),
            username: user.username,
            role: user.role,
        })
    }
}

/// Builds the demo accounts with freshly hashed passwords.
pub fn demo_users() -> ApiResult<Vec<NewUser>> {
    DEMO_USERS
        .iter()
        .map(|(full_name, email, username, password, role)| {
            Ok(NewUser {
                full_name: full_name.to_string(),
                email: email.to_string(),
                username: username.to_string(),
                password_hash: hash_password(password)?,
                role: *role,
            })
        })
        .collect()
}

/// Seeds demo accounts and products into an empty database.
pub async fn seed_demo(db: &Database) -> ApiResult<SeedReport> {
    let users = if db.users().count().await? == 0 {
        demo_users()?
    } else {
        Vec::new()
    };
    Ok(seed_demo_data(db, &users).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use storefront_db::DbConfig;

    async fn service() -> AuthService {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let jwt = Arc::new(JwtManager::new(
            "test-secret".to_string(),
            "storefront-api".to_string(),
            "storefront-clients".to_string(),
            3600,
        ));
        AuthService::new(db, jwt)
    }

    fn registration(username: &str, email: &str) -> Registration {
        Registration {
            full_name: "Sara Ali".to_string(),
            email: email.to_string(),
            username: username.to_string(),
            password: "secret1".to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let auth = service().await;

        let user = auth.register(&registration("sara", "sara@example.com")).await.unwrap();
        assert_eq!(user.role, Role::Visitor);
        assert!(user.password_hash.starts_with("$argon2"));

        let login = auth.login("sara", "secret1").await.unwrap();
        assert_eq!(login.role, Role::Visitor);
        assert_eq!(login.expires_in, 3600);

        let claims = auth.jwt.validate_token(&login.token).unwrap();
        assert_eq!(claims.sub, user.id.to_string());
    }

    #[tokio::test]
    async fn test_login_failures_look_the_same() {
        let auth = service().await;
        auth.register(&registration("sara", "sara@example.com")).await.unwrap();

        let wrong_password = auth.login("sara", "nope").await.unwrap_err();
        let unknown_user = auth.login("omar", "secret1").await.unwrap_err();

        assert_eq!(wrong_password.code, ErrorCode::ValidationError);
        assert_eq!(wrong_password.message, INVALID_CREDENTIALS);
        assert_eq!(unknown_user.message, INVALID_CREDENTIALS);
    }

    #[tokio::test]
    async fn test_duplicate_username_and_email() {
        let auth = service().await;
        auth.register(&registration("sara", "sara@example.com")).await.unwrap();

        let err = auth
            .register(&registration("sara", "SARA@example.com"))
            .await
            .unwrap_err();

        assert_eq!(
            err.details,
            vec![
                "Username 'sara' already exists.".to_string(),
                "Email 'SARA@example.com' already exists.".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_seed_demo_once() {
        let auth = service().await;

        let report = seed_demo(&auth.db).await.unwrap();
        assert_eq!(report.users, 2);
        assert_eq!(report.products, 3);

        let again = seed_demo(&auth.db).await.unwrap();
        assert_eq!(again.users, 0);

        assert!(auth.login("admin", "admin123").await.is_ok());
    }
}
