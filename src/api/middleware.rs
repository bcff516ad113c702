use super::ApiState;
use crate::domain::model::Identity;
use crate::error::*;
use axum::body::Body;
use axum::extract::State;
use axum::http::{header, HeaderMap, Request};
use axum::middleware::Next;
use axum::response::Response;
use serde_json::Value;

/// Resolves `Authorization: Bearer <token>` and attaches the [`Identity`].
pub async fn authenticate(
    State(state): State<ApiState>,
    mut req: Request<Body>,
    next: Next<Body>,
) -> Result<Response> {
    let token = extract_bearer(req.headers()).map(str::to_string);
    let identity = match token {
        Some(token) => state.authenticator.authenticate(&token).await,
        None => None,
    };

    match identity {
        Some(identity) => {
            req.extensions_mut().insert(identity);
            Ok(next.run(req).await)
        }
        None => Err(GeneralError::unauthorized(
            state.translator.translate("errors.auth.unauthorized"),
        )),
    }
}

/// The body's `userId` has to be the caller.
pub async fn authorize_owner(
    State(state): State<ApiState>,
    req: Request<Body>,
    next: Next<Body>,
) -> Result<Response> {
    let identity = match req.extensions().get::<Identity>() {
        Some(identity) => identity.clone(),
        None => {
            return Err(GeneralError::unauthorized(
                state.translator.translate("errors.auth.unauthorized"),
            ))
        }
    };
    let (body, req) = buffer_json(req).await?;

    let owner = body.get("userId").and_then(Value::as_str);
    if owner != Some(identity.user_id.0.as_str()) {
        tracing::debug!(caller = %identity.user_id, ?owner, "owner mismatch");
        return Err(GeneralError::forbidden(
            state.translator.translate("errors.auth.forbidden"),
        ));
    }
    Ok(next.run(req).await)
}

pub async fn validate_tweet(req: Request<Body>, next: Next<Body>) -> Result<Response> {
    let (body, req) = buffer_json(req).await?;
    require_fields(&body, &["content", "userId"])?;
    Ok(next.run(req).await)
}

pub async fn validate_comment(req: Request<Body>, next: Next<Body>) -> Result<Response> {
    let (body, req) = buffer_json(req).await?;
    require_fields(&body, &["comment", "tweetId", "userId"])?;
    Ok(next.run(req).await)
}

fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// Reads the whole body as JSON and hands back an equivalent request for the
/// next layer.
async fn buffer_json(req: Request<Body>) -> Result<(Value, Request<Body>)> {
    let (parts, body) = req.into_parts();
    let bytes = hyper::body::to_bytes(body)
        .await
        .map_err(|err| GeneralError::invalid_payload(err.to_string()))?;
    let value = serde_json::from_slice::<Value>(&bytes)
        .map_err(|err| GeneralError::invalid_payload(format!("invalid JSON body: {}", err)))?;
    Ok((value, Request::from_parts(parts, Body::from(bytes))))
}

fn require_fields(body: &Value, fields: &[&str]) -> Result<()> {
    for field in fields {
        match body.get(field).and_then(Value::as_str) {
            Some(value) if !value.trim().is_empty() => {}
            _ => {
                return Err(GeneralError::invalid_payload(format!(
                    "\"{}\" is required",
                    field
                )))
            }
        }
    }
    Ok(())
}
