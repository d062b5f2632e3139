use std::future::{ready, Ready};

use actix_web::{
    cookie::Cookie,
    dev::Payload,
    http::{header, StatusCode},
    web, FromRequest, HttpRequest, HttpResponse, ResponseError,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::error::AppError;

pub const TOKEN_COOKIE: &str = "token";

/// Reset tokens live for one hour.
const RESET_TOKEN_TTL_HOURS: i64 = 1;

/// Signed, self-contained session claim. Login tokens carry no expiry;
/// reset tokens carry a one-hour expiry and the `reset` purpose flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub email: String,
    pub iat: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub reset: bool,
}

/// Signs and verifies session tokens with the server secret. Built once
/// from config at startup and injected into handlers.
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenCodec {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Login tokens have no exp claim; expiry is still enforced
        // whenever one is present.
        validation.required_spec_claims.clear();

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// General-access token bound to an email, without expiry.
    pub fn issue_login(&self, email: &str) -> Result<String, AppError> {
        self.sign(Claims {
            email: email.to_owned(),
            iat: Utc::now().timestamp(),
            exp: None,
            reset: false,
        })
    }

    /// Token authorizing exactly one password change, expiring in an hour.
    pub fn issue_reset(&self, email: &str) -> Result<String, AppError> {
        let now = Utc::now();
        self.sign(Claims {
            email: email.to_owned(),
            iat: now.timestamp(),
            exp: Some((now + Duration::hours(RESET_TOKEN_TTL_HOURS)).timestamp()),
            reset: true,
        })
    }

    fn sign(&self, claims: Claims) -> Result<String, AppError> {
        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(e.to_string()))
    }

    /// Purpose-agnostic verification: signature, structure and expiry.
    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|_| AppError::InvalidToken)
    }

    /// Verification for general access. A reset token never opens a
    /// login-gated page.
    pub fn verify_login(&self, token: &str) -> Result<Claims, AppError> {
        let claims = self.verify(token)?;
        if claims.reset {
            return Err(AppError::InvalidToken);
        }
        Ok(claims)
    }

    /// Verification for the password-change operation only.
    pub fn verify_reset(&self, token: &str) -> Result<Claims, AppError> {
        let claims = self.verify(token)?;
        if !claims.reset {
            return Err(AppError::WrongPurpose);
        }
        Ok(claims)
    }
}

/// Cookie carrying the session token.
pub fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build(TOKEN_COOKIE, token)
        .path("/")
        .http_only(true)
        .finish()
}

/// Empty, immediately-expiring replacement for the session cookie.
pub fn clear_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::build(TOKEN_COOKIE, "")
        .path("/")
        .http_only(true)
        .finish();
    cookie.make_removal();
    cookie
}

/// Gate failure: both cases redirect to the login page; an invalid token
/// is additionally cleared from the cookie store.
#[derive(Debug, Error)]
pub enum AuthRedirect {
    #[error("missing session token")]
    Missing,
    #[error("invalid session token")]
    Invalid,
}

impl ResponseError for AuthRedirect {
    fn status_code(&self) -> StatusCode {
        StatusCode::FOUND
    }

    fn error_response(&self) -> HttpResponse {
        let mut resp = HttpResponse::Found();
        resp.insert_header((header::LOCATION, "/login"));
        if matches!(self, AuthRedirect::Invalid) {
            resp.cookie(clear_cookie());
        }
        resp.finish()
    }
}

/// Authenticated identity, extracted from the `token` cookie. Using this
/// as a handler argument is what gates a route.
pub struct AuthedUser(pub Claims);

impl FromRequest for AuthedUser {
    type Error = AuthRedirect;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let Some(codec) = req.app_data::<web::Data<TokenCodec>>() else {
            return ready(Err(AuthRedirect::Missing));
        };

        let result = match req.cookie(TOKEN_COOKIE) {
            None => Err(AuthRedirect::Missing),
            Some(cookie) => codec.verify_login(cookie.value()).map(AuthedUser).map_err(|_| {
                debug!("rejecting invalid session token");
                AuthRedirect::Invalid
            }),
        };
        ready(result)
    }
}
