use serde::Serialize;

use crate::middlewares::auth_context::AuthUser;

#[derive(Serialize)]
pub struct ProfileResponse {
    pub id: String,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
    pub initials: Option<String>,
}

impl From<&AuthUser> for ProfileResponse {
    fn from(user: &AuthUser) -> Self {
        Self {
            id: user.id.clone(),
            email: user.email.clone(),
            full_name: user.full_name.clone(),
            avatar_url: user.avatar_url.clone(),
            initials: user.initials(),
        }
    }
}
