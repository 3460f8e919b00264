use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::{Authorization, HeaderMapExt};

use crate::auth::extractor::{CurrentUser, Identity};
use crate::auth::jwt;
use crate::state::SharedState;

/// Decode the bearer token if there is one and attach the resulting [`Identity`].
/// A bad or expired token never rejects the request; it just leaves the caller anonymous.
pub async fn attach_identity(
    State(state): State<SharedState>,
    mut req: Request,
    next: Next,
) -> Response {
    let identity = match req.headers().typed_get::<Authorization<Bearer>>() {
        Some(Authorization(bearer)) => {
            match jwt::decode_token(bearer.token(), &state.config.jwt_secret) {
                Ok(claims) => Identity::authenticated(CurrentUser::from(claims)),
                Err(e) => {
                    tracing::debug!(reason = %e, "ignoring bearer token");
                    Identity::anonymous()
                }
            }
        }
        None => Identity::anonymous(),
    };

    req.extensions_mut().insert(identity);
    next.run(req).await
}
