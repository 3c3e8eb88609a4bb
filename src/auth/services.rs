use std::sync::Arc;

use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::{
        dto::AuthResponse,
        jwt::JwtKeys,
        password::{dummy_verify, hash_password_async, verify_password_async},
        repo::{StoreError, UserStore},
        repo_types::{NewUser, UserProfile},
    },
    error::{AppError, AppResult},
};

/// Signup, signin and profile lookup over an injected store and key set.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    keys: JwtKeys,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, keys: JwtKeys) -> Self {
        Self { users, keys }
    }

    pub fn keys(&self) -> &JwtKeys {
        &self.keys
    }

    #[instrument(skip(self, name, password))]
    pub async fn signup(
        &self,
        email: String,
        name: String,
        password: String,
    ) -> AppResult<AuthResponse> {
        // Fast path only; insert_if_absent is what actually guards uniqueness.
        if self.users.find_by_email(&email).await?.is_some() {
            warn!("email already registered");
            return Err(AppError::AlreadyExists);
        }

        let password_hash = hash_password_async(password).await?;

        let user = match self
            .users
            .insert_if_absent(NewUser {
                email,
                name,
                password_hash,
            })
            .await
        {
            Ok(user) => user,
            Err(StoreError::Conflict) => {
                warn!("email registered concurrently");
                return Err(AppError::AlreadyExists);
            }
            Err(e) => return Err(e.into()),
        };

        let access_token = self.keys.sign(user.id, &user.email)?;
        info!(user_id = %user.id, "user registered");
        Ok(AuthResponse {
            access_token,
            user: user.into(),
        })
    }

    #[instrument(skip(self, password))]
    pub async fn signin(&self, email: String, password: String) -> AppResult<AuthResponse> {
        let user = match self.users.find_by_email(&email).await? {
            Some(user) => user,
            None => {
                dummy_verify(password).await;
                warn!("signin unknown email");
                return Err(AppError::InvalidCredentials);
            }
        };

        if !verify_password_async(password, user.password_hash.clone()).await? {
            warn!(user_id = %user.id, "signin invalid password");
            return Err(AppError::InvalidCredentials);
        }

        let access_token = self.keys.sign(user.id, &user.email)?;
        info!(user_id = %user.id, "user signed in");
        Ok(AuthResponse {
            access_token,
            user: user.into(),
        })
    }

    #[instrument(skip(self))]
    pub async fn profile(&self, user_id: Uuid) -> AppResult<UserProfile> {
        self.users.find_by_id(user_id).await?.ok_or_else(|| {
            warn!("token subject has no account");
            AppError::Unauthorized("User not found".into())
        })
    }
}
