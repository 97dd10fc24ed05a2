//! Session cookies for freshly issued tokens.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::{Duration, OffsetDateTime};

use domain::{TokenPair, ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE, SESSION_COOKIE_PATH};

/// Maps a token pair onto `Secure`, `HttpOnly`, `SameSite=Strict` cookies.
#[derive(Debug, Clone, Default)]
pub struct SessionEstablisher {
    domain: Option<String>,
}

impl SessionEstablisher {
    pub fn new(domain: Option<String>) -> Self {
        Self { domain }
    }

    fn cookie(&self, name: &'static str, value: &str, ttl_secs: i64) -> Cookie<'static> {
        let mut cookie = Cookie::build((name, value.to_string()))
            .path(SESSION_COOKIE_PATH)
            .secure(true)
            .http_only(true)
            .same_site(SameSite::Strict)
            .max_age(Duration::seconds(ttl_secs))
            .build();

        // Max-Age alone when the expiry falls outside the representable range.
        if let Some(expires) = OffsetDateTime::now_utc().checked_add(Duration::seconds(ttl_secs)) {
            cookie.set_expires(expires);
        }

        if let Some(domain) = &self.domain {
            cookie.set_domain(domain.clone());
        }
        cookie
    }

    /// Access cookie first, refresh cookie second.
    pub fn session_cookies(&self, tokens: &TokenPair) -> [Cookie<'static>; 2] {
        [
            self.cookie(ACCESS_TOKEN_COOKIE, &tokens.access_token, tokens.access_expires_in),
            self.cookie(REFRESH_TOKEN_COOKIE, &tokens.refresh_token, tokens.refresh_expires_in),
        ]
    }

    /// Add both session cookies to the response jar.
    pub fn establish(&self, jar: CookieJar, tokens: &TokenPair) -> CookieJar {
        let [access, refresh] = self.session_cookies(tokens);
        jar.add(access).add(refresh)
    }
}
