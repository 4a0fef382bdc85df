use std::future::{Ready, ready};

use actix_web::{FromRequest, HttpMessage, HttpRequest, dev::Payload, error};
use serde::Serialize;

use crate::utils::jwt::Claims;

/// The signed-in user, as described by the identity provider.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthUser {
    pub id: String,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            email: claims.email,
            full_name: claims.user_metadata.full_name,
            avatar_url: claims.user_metadata.avatar_url,
        }
    }
}

impl AuthUser {
    /// Avatar fallback: first letters of the first two name parts, or the
    /// first two characters of the email.
    pub fn initials(&self) -> Option<String> {
        let from_name: String = self
            .full_name
            .as_deref()
            .unwrap_or_default()
            .split(' ')
            .filter_map(|part| part.chars().next())
            .flat_map(char::to_uppercase)
            .take(2)
            .collect();
        if !from_name.is_empty() {
            return Some(from_name);
        }

        self.email
            .as_deref()
            .map(|email| email.chars().take(2).flat_map(char::to_uppercase).collect::<String>())
            .filter(|initials| !initials.is_empty())
    }
}

/// Per-request session handed to handlers that care who is calling.
///
/// Populated by [`super::authmw::SessionRestore`] when a valid token is
/// presented; empty for anonymous callers.
#[derive(Debug, Clone, Default)]
pub struct AuthContext {
    user: Option<AuthUser>,
}

impl AuthContext {
    pub fn populate(&mut self, user: AuthUser) {
        self.user = Some(user);
    }

    /// Sign-out.
    pub fn clear(&mut self) {
        self.user = None;
    }

    pub fn user(&self) -> Option<&AuthUser> {
        self.user.as_ref()
    }

    pub fn require_user(&self) -> actix_web::Result<&AuthUser> {
        self.user
            .as_ref()
            .ok_or_else(|| error::ErrorUnauthorized("Sign in to manage saved QR codes"))
    }
}

impl FromRequest for AuthContext {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let mut context = AuthContext::default();
        if let Some(user) = req.extensions().get::<AuthUser>().cloned() {
            context.populate(user);
        }
        ready(Ok(context))
    }
}
