//! Admin authentication.
//!
//! The admin flag lives in a session cookie signed by the `biscotti`
//! processor. The token is compared in constant time to mitigate timing attacks.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use biscotti::config::{CryptoAlgorithm, CryptoRule};
use biscotti::{
    Key, Processor, ProcessorConfig, RemovalCookie, RequestCookies, ResponseCookie,
    ResponseCookies, SameSite,
};
use sha2::{Digest, Sha512};
use subtle::ConstantTimeEq;

use crate::AppState;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "session";

/// Message shown on the login page after a rejected token.
pub const INVALID_TOKEN_MESSAGE: &str = "Invalid admin token.";

const ADMIN_VALUE: &str = "admin";
const GUEST_VALUE: &str = "guest";

/// Session state carried in the signed cookie.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AdminSession {
    pub is_admin: bool,
}

impl AdminSession {
    pub fn admin() -> Self {
        Self { is_admin: true }
    }

    /// Read the session from request headers.
    ///
    /// Cookies that fail to parse or verify are skipped; the first verified
    /// `session` cookie decides. No verified cookie means a guest.
    pub fn from_headers(headers: &HeaderMap, processor: &Processor) -> Self {
        let mut cookies = RequestCookies::new();
        for value in headers.get_all(header::COOKIE) {
            let Ok(value) = value.to_str() else {
                tracing::debug!("Ignoring a non-UTF-8 Cookie header");
                continue;
            };
            // One bad pair must not discard the rest of the header.
            for pair in value.split(';').map(str::trim).filter(|p| !p.is_empty()) {
                if let Err(e) = cookies.extend_from_header(pair, processor) {
                    tracing::debug!("Ignoring an invalid request cookie: {}", e);
                }
            }
        }

        cookies
            .get_all(SESSION_COOKIE)
            .and_then(|all| all.values().next())
            .map(|value| Self {
                is_admin: value == ADMIN_VALUE,
            })
            .unwrap_or_default()
    }

    /// `Set-Cookie` header values carrying this session.
    pub fn set_cookie_headers(
        &self,
        processor: &Processor,
    ) -> Vec<(header::HeaderName, HeaderValue)> {
        let value = if self.is_admin { ADMIN_VALUE } else { GUEST_VALUE };
        let mut cookies = ResponseCookies::new();
        cookies.insert(
            ResponseCookie::new(SESSION_COOKIE, value)
                .set_path("/")
                .set_http_only(true)
                .set_same_site(SameSite::Lax),
        );
        to_header_pairs(cookies, processor)
    }
}

/// `Set-Cookie` header values telling the client to drop the session cookie.
pub fn clear_cookie_headers(processor: &Processor) -> Vec<(header::HeaderName, HeaderValue)> {
    let mut cookies = ResponseCookies::new();
    cookies.insert(RemovalCookie::new(SESSION_COOKIE).set_path("/"));
    to_header_pairs(cookies, processor)
}

fn to_header_pairs(
    cookies: ResponseCookies<'_>,
    processor: &Processor,
) -> Vec<(header::HeaderName, HeaderValue)> {
    cookies
        .header_values(processor)
        .filter_map(|value| match HeaderValue::from_str(&value) {
            Ok(value) => Some((header::SET_COOKIE, value)),
            Err(_) => {
                tracing::error!("Dropping an unencodable Set-Cookie value: {}", value);
                None
            }
        })
        .collect()
}

/// Build the cookie processor that signs and verifies the session cookie.
///
/// The signing key is derived from `secret`, so any non-empty string works
/// and changing it invalidates every session.
pub fn cookie_processor(secret: &str) -> Processor {
    // A SHA-512 digest is exactly the 64 bytes `Key::from` requires.
    let master = Sha512::digest(secret.as_bytes());

    let mut config = ProcessorConfig::default();
    config.crypto_rules.push(CryptoRule {
        cookie_names: vec![SESSION_COOKIE.to_string()],
        algorithm: CryptoAlgorithm::Signing,
        key: Key::from(master.to_vec()),
        fallbacks: vec![],
    });
    config.into()
}

/// Check a submitted token against the configured admin token.
///
/// An empty configured token never matches, so admin login stays closed
/// until one is set.
pub fn verify_admin_token(submitted: &str, configured: &str) -> bool {
    !configured.is_empty() && constant_time_compare(submitted, configured)
}

/// Gate for admin routes: guests are sent to the login page.
pub async fn require_admin(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let session = AdminSession::from_headers(request.headers(), &state.cookies);

    if session.is_admin {
        next.run(request).await
    } else {
        tracing::debug!("Admin session required for {}", request.uri().path());
        Redirect::to(&state.config.url("/admin/login")).into_response()
    }
}

/// Perform constant-time string comparison.
fn constant_time_compare(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}
