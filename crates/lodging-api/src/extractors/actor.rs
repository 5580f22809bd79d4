//! `Actor` extractor: the caller identity resolved by the upstream gateway.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use lodging_core::error::AppError;
use lodging_core::types::id::UserId;
use lodging_engine::ActorContext;
use lodging_entity::user::UserRole;

use crate::error::ApiError;

/// Header carrying the authenticated user's id.
pub const ACTOR_ID_HEADER: &str = "x-actor-id";
/// Header carrying the authenticated user's role.
pub const ACTOR_ROLE_HEADER: &str = "x-actor-role";

/// Authenticated caller available in handlers.
#[derive(Debug, Clone)]
pub struct Actor(pub ActorContext);

impl std::ops::Deref for Actor {
    type Target = ActorContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S> FromRequestParts<S> for Actor
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let actor_id: UserId = header(parts, ACTOR_ID_HEADER)?
            .parse()
            .map_err(|_| AppError::authorization("Invalid x-actor-id header"))?;
        let role: UserRole = header(parts, ACTOR_ROLE_HEADER)?
            .parse()
            .map_err(|_| AppError::authorization("Invalid x-actor-role header"))?;

        Ok(Actor(ActorContext::new(actor_id, role)))
    }
}

fn header<'a>(parts: &'a Parts, name: &str) -> Result<&'a str, AppError> {
    parts
        .headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::authorization(format!("Missing {name} header")))
}
