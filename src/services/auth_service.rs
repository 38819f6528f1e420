//! Authentication service - token issuance, credential checks, refresh.
//!
//! Tokens are stateless: the server persists nothing per token, so logout
//! is client-side discard and revocation is out of scope.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{Config, TOKEN_TYPE_BEARER};
use crate::domain::{normalize_email, NewUser, Password, User, UserResponse};
use crate::errors::{AppError, AppResult};
use crate::infra::UserRepository;

/// JWT claims payload: user id, role id list, issue and expiry times
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub roles: Vec<Uuid>,
    pub iat: i64,
    pub exp: i64,
}

/// Access/refresh token pair
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    /// Short-lived access token
    pub access: String,
    /// Longer-lived refresh token
    pub refresh: String,
    /// Always "Bearer"
    pub token_type: String,
    /// Access token lifetime in seconds
    pub expires_in: i64,
}

/// Successful authentication result
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub user: UserResponse,
    pub tokens: TokenPair,
}

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register a new user; the store assigns the default role
    async fn register(
        &self,
        email: String,
        password: String,
        first_name: String,
        last_name: String,
    ) -> AppResult<AuthResponse>;

    /// Authenticate credentials and return a fresh token pair
    async fn login(&self, email: String, password: String) -> AppResult<AuthResponse>;

    /// Exchange a valid refresh token for a fresh token pair
    async fn refresh(&self, refresh_token: &str) -> AppResult<AuthResponse>;

    /// Verify a token's signature and expiry, returning its claims
    fn verify_token(&self, token: &str) -> AppResult<Claims>;
}

/// Sign a token pair for a user (shared helper to avoid duplication)
fn generate_tokens(user: &User, config: &Config) -> AppResult<TokenPair> {
    let now = Utc::now();
    let key = EncodingKey::from_secret(config.jwt_secret_bytes());

    let access_exp = now + Duration::minutes(config.access_token_minutes);
    let access = encode(
        &Header::default(),
        &Claims {
            sub: user.id,
            roles: user.role_ids.clone(),
            iat: now.timestamp(),
            exp: access_exp.timestamp(),
        },
        &key,
    )?;

    let refresh_exp = now + Duration::days(config.refresh_token_days);
    let refresh = encode(
        &Header::default(),
        &Claims {
            sub: user.id,
            roles: user.role_ids.clone(),
            iat: now.timestamp(),
            exp: refresh_exp.timestamp(),
        },
        &key,
    )?;

    Ok(TokenPair {
        access,
        refresh,
        token_type: TOKEN_TYPE_BEARER.to_string(),
        expires_in: config.access_token_minutes * 60,
    })
}

/// Concrete implementation of AuthService.
pub struct Authenticator {
    users: Arc<dyn UserRepository>,
    config: Config,
}

impl Authenticator {
    pub fn new(users: Arc<dyn UserRepository>, config: Config) -> Self {
        Self { users, config }
    }

    fn respond(&self, user: User) -> AppResult<AuthResponse> {
        let tokens = generate_tokens(&user, &self.config)?;
        Ok(AuthResponse {
            user: UserResponse::from(user),
            tokens,
        })
    }
}

#[async_trait]
impl AuthService for Authenticator {
    async fn register(
        &self,
        email: String,
        password: String,
        first_name: String,
        last_name: String,
    ) -> AppResult<AuthResponse> {
        let email = normalize_email(&email);

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AppError::conflict("User"));
        }

        let password_hash = Password::new(&password)?.into_string();
        let user = self
            .users
            .create(NewUser {
                email,
                password_hash,
                first_name,
                last_name,
                role_ids: Vec::new(),
            })
            .await?;

        self.respond(user)
    }

    async fn login(&self, email: String, password: String) -> AppResult<AuthResponse> {
        let email = normalize_email(&email);
        let user_result = self.users.find_by_email(&email).await?;

        // Verify against a dummy hash when the user is unknown so the
        // timing of the failure does not reveal whether the email exists.
        let dummy_hash =
            "$argon2id$v=19$m=19456,t=2,p=1$dummysalt123456$dummyhash1234567890123456789012";

        let hash = user_result
            .as_ref()
            .map(|u| u.password_hash.as_str())
            .unwrap_or(dummy_hash);

        let password_valid = Password::from_hash(hash.to_string()).verify(&password);

        let user = match user_result {
            Some(user) if password_valid => user,
            _ => return Err(AppError::InvalidCredentials),
        };

        if !user.is_active {
            return Err(AppError::Forbidden);
        }

        self.users.touch_last_login(user.id).await?;

        self.respond(user)
    }

    async fn refresh(&self, refresh_token: &str) -> AppResult<AuthResponse> {
        let claims = self.verify_token(refresh_token)?;

        let user = self
            .users
            .find_by_id(claims.sub)
            .await?
            .ok_or(AppError::Unauthorized)?;

        self.respond(user)
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret_bytes()),
            &Validation::default(),
        )?;

        Ok(token_data.claims)
    }
}
