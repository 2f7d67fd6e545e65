//! Acting-user middleware
//!
//! Authentication lives in front of this server. The upstream proxy passes
//! the signed-in user as `x-user-id`; requests without it act as the
//! configured default user.

use axum::{extract::Request, middleware::Next, response::Response};
use opsdesk::AuthenticatedUserId;

pub const USER_HEADER: &str = "x-user-id";

pub async fn identity_middleware(mut request: Request, next: Next) -> Response {
    let user = request
        .headers()
        .get(USER_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string);

    if let Some(user) = user {
        request.extensions_mut().insert(AuthenticatedUserId(user));
    }
    next.run(request).await
}
