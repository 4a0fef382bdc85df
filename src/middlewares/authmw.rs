use std::future::{Ready, ready};
use std::rc::Rc;

use actix_web::{
    Error, HttpMessage,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
    error::ErrorUnauthorized,
    http::header,
};
use futures_util::future::LocalBoxFuture;

use crate::middlewares::auth_context::AuthUser;
use crate::utils::jwt::validate_token;

/// Restores the caller's session from a `Bearer` token.
///
/// Requests without an `Authorization` header pass through anonymously;
/// a header that is present but unusable is rejected.
pub struct SessionRestore {
    secret: Rc<str>,
    audience: Option<Rc<str>>,
}

impl SessionRestore {
    pub fn new(secret: &str, audience: Option<&str>) -> Self {
        Self {
            secret: Rc::from(secret),
            audience: audience.map(Rc::from),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for SessionRestore
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = SessionRestoreMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SessionRestoreMiddleware {
            service,
            secret: self.secret.clone(),
            audience: self.audience.clone(),
        }))
    }
}

pub struct SessionRestoreMiddleware<S> {
    service: S,
    secret: Rc<str>,
    audience: Option<Rc<str>>,
}

impl<S, B> Service<ServiceRequest> for SessionRestoreMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        // No header, no session
        if !req.headers().contains_key(header::AUTHORIZATION) {
            return Box::pin(self.service.call(req));
        }

        let user = match session_user(&req, &self.secret, self.audience.as_deref()) {
            Ok(user) => user,
            Err(e) => return Box::pin(async move { Err(e) }),
        };
        req.extensions_mut().insert(user);

        Box::pin(self.service.call(req))
    }
}

fn session_user(
    req: &ServiceRequest,
    secret: &str,
    audience: Option<&str>,
) -> Result<AuthUser, Error> {
    let auth_header_str = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or_else(|| ErrorUnauthorized("No authorization header"))?
        .to_str()
        .map_err(|_| ErrorUnauthorized("Invalid authorization header"))?;

    let token = auth_header_str
        .strip_prefix("Bearer ")
        .ok_or_else(|| ErrorUnauthorized("Invalid authorization format"))?;

    let claims = validate_token(token, secret, audience).map_err(|e| {
        log::debug!("Rejected token: {:#}", e);
        ErrorUnauthorized("Invalid token")
    })?;

    Ok(AuthUser::from(claims))
}
