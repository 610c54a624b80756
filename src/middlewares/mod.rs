use actix_web::{
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    middleware::Next,
    web, Error, HttpMessage, HttpRequest,
};
use uuid::Uuid;

use crate::{api::error, configs::AuthConfig, utils::Claims};

/// Identity of the caller, placed in request extensions by [`authentication`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub id: Uuid,
}

fn bearer_token(req: &ServiceRequest) -> Option<String> {
    let header = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string());

    // Browsers cannot set headers on a WebSocket handshake.
    header.or_else(|| {
        web::Query::<std::collections::HashMap<String, String>>::from_query(req.query_string())
            .ok()
            .and_then(|q| q.get("access_token").cloned())
    })
}

fn resolve_user(req: &ServiceRequest, config: &AuthConfig) -> Result<AuthUser, error::Error> {
    if config.allow_user_id_header {
        if let Some(raw) = req.headers().get("X-User-Id").and_then(|h| h.to_str().ok()) {
            let id = Uuid::parse_str(raw.trim())
                .map_err(|_| error::Error::unauthorized("Invalid user id header"))?;
            return Ok(AuthUser { id });
        }
    }

    let token = bearer_token(req)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| error::Error::unauthorized("Token Invalid or Expired"))?;

    let claims = Claims::decode(&token, config)
        .map_err(|_| error::Error::unauthorized("Token Invalid or Expired"))?;

    Ok(AuthUser { id: claims.sub })
}

pub async fn authentication<B>(
    req: ServiceRequest,
    next: Next<B>,
) -> Result<ServiceResponse<B>, Error>
where
    B: MessageBody + 'static,
{
    let config = req
        .app_data::<web::Data<AuthConfig>>()
        .cloned()
        .ok_or_else(|| {
            log::error!("AuthConfig is not registered as app data");
            error::Error::InternalServer
        })?;

    let user = resolve_user(&req, &config)?;
    req.extensions_mut().insert(user);

    next.call(req).await
}

pub fn get_extensions<T: Clone + 'static>(req: &HttpRequest) -> Result<T, error::Error> {
    req.extensions().get::<T>().cloned().ok_or_else(|| error::Error::unauthorized("Unauthorized"))
}
