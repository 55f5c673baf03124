use std::future::{ready, Ready};
use std::rc::Rc;

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::AUTHORIZATION,
    Error, HttpMessage,
};
use futures::future::LocalBoxFuture;

use crate::services::AuthSettings;

/// Decodes `Authorization: Bearer <token>` and stores the resulting
/// `Claims` in the request extensions. Requests without a valid token pass
/// through anonymously; handlers decide whether identity is required.
pub struct BearerAuth {
    settings: Rc<AuthSettings>,
}

impl BearerAuth {
    pub fn new(settings: AuthSettings) -> Self {
        Self {
            settings: Rc::new(settings),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for BearerAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = BearerAuthService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(BearerAuthService {
            service,
            settings: Rc::clone(&self.settings),
        }))
    }
}

pub struct BearerAuthService<S> {
    service: S,
    settings: Rc<AuthSettings>,
}

/// Token part of a `Bearer` authorization header, if any.
pub fn bearer_token(header: &str) -> Option<&str> {
    let token = header.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then_some(token)
}

impl<S, B> Service<ServiceRequest> for BearerAuthService<S>
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
        let token = req
            .headers()
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(bearer_token);

        if let Some(token) = token {
            match self.settings.verify_token(token) {
                Ok(claims) => {
                    log::debug!("🔑 Token accepted for {}", claims.username);
                    req.extensions_mut().insert(claims);
                }
                Err(e) => log::debug!("🔑 Ignoring bearer token: {}", e),
            }
        }

        let fut = self.service.call(req);
        Box::pin(async move { fut.await })
    }
}
