use actix_web::{HttpResponse, Result};

use crate::middlewares::auth_context::AuthContext;
use crate::structs::user::ProfileResponse;

/// Who is signed in, with avatar initials for the menu
pub async fn get_profile(auth: AuthContext) -> Result<HttpResponse> {
    let user = auth.require_user()?;
    Ok(HttpResponse::Ok().json(ProfileResponse::from(user)))
}
