use axum::Json;
use serde::Serialize;

use crate::auth::Identity;
use crate::domain::user::User;

#[derive(Serialize)]
pub struct UserBody {
    user: User,
}

/// GET /users/me: the application user backing the caller's token.
pub async fn me(identity: Identity) -> Json<UserBody> {
    Json(UserBody { user: identity.user })
}
