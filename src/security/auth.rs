use actix_service::Transform;
use actix_web::{
    body::{EitherBody, MessageBody},
    dev::{Service, ServiceRequest, ServiceResponse},
    http::header::HeaderValue,
    Error, HttpResponse,
};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use futures_util::future::{ok, LocalBoxFuture, Ready};
use htpasswd_verify::Htpasswd;
use log::{debug, info};
use std::collections::HashMap;
use std::rc::Rc;
use std::task::{Context, Poll};

/// HTTP Basic authentication against htpasswd entries.
/// Without entries (`None`) every request is let through.
pub struct AuthMiddleware {
    htpasswd: Option<Rc<HashMap<String, String>>>,
}

impl AuthMiddleware {
    pub fn new(htpasswd: Option<HashMap<String, String>>) -> Self {
        Self {
            htpasswd: htpasswd.map(Rc::new),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(AuthMiddlewareService {
            service: Rc::new(service),
            htpasswd: self.htpasswd.clone(),
        })
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
    htpasswd: Option<Rc<HashMap<String, String>>>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let htpasswd = self.htpasswd.clone();

        Box::pin(async move {
            debug!("Processing request: {}", req.path());
            let authorized = match &htpasswd {
                None => true,
                Some(entries) => match req.headers().get("Authorization") {
                    Some(header) => is_authorized(header, entries),
                    None => {
                        info!("No Authorization header found");
                        false
                    }
                },
            };

            if authorized {
                let res = service.call(req).await?;
                return Ok(res.map_into_left_body());
            }

            let response = req.into_response(
                HttpResponse::Unauthorized()
                    .append_header(("WWW-Authenticate", r#"Basic realm="Restricted""#))
                    .finish()
                    .map_into_right_body(),
            );
            info!("Request unauthorized, returning 401");
            Ok(response)
        })
    }
}

fn is_authorized(header: &HeaderValue, entries: &HashMap<String, String>) -> bool {
    let Some((username, password)) = decode_basic(header) else {
        debug!("Authorization header format is invalid");
        return false;
    };

    match entries.get(&username) {
        Some(hashed) => {
            let valid = Htpasswd::new_owned(&format!("{}:{}", username, hashed))
                .check(&username, &password);
            if valid {
                info!("User authenticated successfully");
            } else {
                info!("Invalid password for user");
            }
            valid
        }
        None => {
            info!("User not found in htpasswd");
            false
        }
    }
}

fn decode_basic(header: &HeaderValue) -> Option<(String, String)> {
    let encoded = header.to_str().ok()?.strip_prefix("Basic ")?.trim();
    let decoded = String::from_utf8(STANDARD.decode(encoded).ok()?).ok()?;
    let (username, password) = decoded.split_once(':')?;
    Some((username.to_string(), password.to_string()))
}
