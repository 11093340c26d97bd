use crate::AppState;
use crate::config::{AuthConfig, IdentityProviderKind};
use crate::db::enums::UserRole;
use crate::db::models::User;
use crate::db::store::Store;
use crate::error::{AppError, AppResult};
use crate::services::context::RequestContext;
use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, State},
    http::{HeaderMap, Request, request::Parts},
    middleware::Next,
    response::Response,
};
use headers::{Authorization, HeaderMapExt, authorization::Bearer};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Header read by the mock provider.
pub const USER_ID_HEADER: &str = "x-user-id";

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid, // user_id
    pub team_id: Uuid,
    pub role: UserRole,
    pub exp: u64,
    pub iat: u64,
    pub jti: String,
}

/// Resolves the caller of a request.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn resolve(&self, headers: &HeaderMap) -> AppResult<RequestContext>;
}

/// Development user switcher: trusts `x-user-id` and looks the user up.
pub struct MockIdentityProvider {
    store: Arc<dyn Store>,
}

impl MockIdentityProvider {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl IdentityProvider for MockIdentityProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn resolve(&self, headers: &HeaderMap) -> AppResult<RequestContext> {
        let user_id = headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::auth("Missing x-user-id header"))?;
        let user_id =
            Uuid::parse_str(user_id.trim()).map_err(|_| AppError::auth("Invalid x-user-id header"))?;

        let user = self
            .store
            .find_user(user_id)
            .await?
            .ok_or_else(|| AppError::auth("Unknown user"))?;

        Ok(RequestContext {
            user_id: user.id,
            team_id: user.team_id,
            role: user.role,
        })
    }
}

/// HS256 bearer tokens carrying the caller's team and role.
pub struct JwtIdentityProvider {
    secret: String,
    expires_in: u64,
}

impl JwtIdentityProvider {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            secret: config.jwt_secret.clone(),
            expires_in: config.access_token_expires_in,
        }
    }

    pub fn issue_token(&self, user: &User) -> AppResult<String> {
        let now = chrono::Utc::now().timestamp().max(0) as u64;
        let claims = Claims {
            sub: user.id,
            team_id: user.team_id,
            role: user.role,
            exp: now + self.expires_in,
            iat: now,
            jti: Uuid::new_v4().to_string(),
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_ref()),
        )?)
    }

    pub fn verify_token(&self, token: &str) -> AppResult<Claims> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_ref()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }
}

#[async_trait]
impl IdentityProvider for JwtIdentityProvider {
    fn name(&self) -> &'static str {
        "jwt"
    }

    async fn resolve(&self, headers: &HeaderMap) -> AppResult<RequestContext> {
        let bearer = headers
            .typed_get::<Authorization<Bearer>>()
            .ok_or_else(|| AppError::auth("Missing bearer token"))?;
        let claims = self.verify_token(bearer.token())?;

        Ok(RequestContext {
            user_id: claims.sub,
            team_id: claims.team_id,
            role: claims.role,
        })
    }
}

/// Picks the provider named by configuration.
pub fn identity_provider(config: &AuthConfig, store: Arc<dyn Store>) -> Arc<dyn IdentityProvider> {
    match config.provider {
        IdentityProviderKind::Mock => Arc::new(MockIdentityProvider::new(store)),
        IdentityProviderKind::Jwt => Arc::new(JwtIdentityProvider::new(config)),
    }
}

/// Resolves the caller and stores the `RequestContext` in request extensions.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request<axum::body::Body>,
    next: Next<axum::body::Body>,
) -> Result<Response, AppError> {
    let ctx = state
        .identity
        .resolve(request.headers())
        .await
        .inspect_err(|err| {
            tracing::debug!(provider = state.identity.name(), error = %err, "identity rejected");
        })?;

    request.extensions_mut().insert(ctx);
    Ok(next.run(request).await)
}

#[async_trait]
impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<RequestContext>()
            .cloned()
            .ok_or_else(|| AppError::auth("Authentication required"))
    }
}
