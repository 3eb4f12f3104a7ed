//! Per-request cookie handle
//!
//! Carries the cookies a request arrived with and the `Set-Cookie` values
//! the response should send back. The host builds one from the request
//! headers and applies it to the response headers.

use cookie::Cookie;
use http::header::{COOKIE, SET_COOKIE};
use http::{HeaderMap, HeaderValue};
use sessionkit_core::{SessionError, SessionResult};
use std::collections::HashMap;
use tracing::warn;

#[derive(Debug, Clone, Default)]
pub struct HttpContext {
    request_cookies: HashMap<String, String>,
    response_cookies: Vec<Cookie<'static>>,
}

impl HttpContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect cookies from every `Cookie` header. The first occurrence of a
    /// name wins; malformed pairs are skipped.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let mut context = Self::new();

        for value in headers.get_all(COOKIE) {
            let Ok(value) = value.to_str() else {
                warn!("Ignoring non-ASCII Cookie header");
                continue;
            };

            for cookie in Cookie::split_parse(value.to_string()).flatten() {
                context
                    .request_cookies
                    .entry(cookie.name().to_string())
                    .or_insert_with(|| cookie.value().to_string());
            }
        }

        context
    }

    pub fn with_request_cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.request_cookies.insert(name.into(), value.into());
        self
    }

    pub fn request_cookie(&self, name: &str) -> Option<&str> {
        self.request_cookies.get(name).map(String::as_str)
    }

    pub fn queue_cookie(&mut self, cookie: Cookie<'static>) {
        self.response_cookies.push(cookie);
    }

    pub fn response_cookies(&self) -> &[Cookie<'static>] {
        &self.response_cookies
    }

    pub fn take_response_cookies(&mut self) -> Vec<Cookie<'static>> {
        std::mem::take(&mut self.response_cookies)
    }

    /// Append one `Set-Cookie` header per queued cookie
    pub fn apply_to(&self, headers: &mut HeaderMap) -> SessionResult<()> {
        for cookie in &self.response_cookies {
            let value = HeaderValue::from_str(&cookie.to_string()).map_err(|e| {
                SessionError::backend("cookie", format!("Invalid Set-Cookie value: {}", e))
            })?;
            headers.append(SET_COOKIE, value);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_headers_parses_all_cookie_headers() {
        let mut headers = HeaderMap::new();
        headers.append(COOKIE, HeaderValue::from_static("sess=abc123; theme=dark"));
        headers.append(COOKIE, HeaderValue::from_static("lang=en"));

        let context = HttpContext::from_headers(&headers);

        assert_eq!(context.request_cookie("sess"), Some("abc123"));
        assert_eq!(context.request_cookie("theme"), Some("dark"));
        assert_eq!(context.request_cookie("lang"), Some("en"));
        assert_eq!(context.request_cookie("missing"), None);
    }

    #[test]
    fn test_first_cookie_with_name_wins() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("sess=first; sess=second"));

        let context = HttpContext::from_headers(&headers);
        assert_eq!(context.request_cookie("sess"), Some("first"));
    }

    #[test]
    fn test_apply_to_appends_set_cookie_headers() {
        let mut context = HttpContext::new();
        context.queue_cookie(Cookie::new("a", "1"));
        context.queue_cookie(Cookie::new("b", "2"));

        let mut headers = HeaderMap::new();
        context.apply_to(&mut headers).unwrap();

        let values: Vec<&str> = headers
            .get_all(SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap())
            .collect();
        assert_eq!(values, vec!["a=1", "b=2"]);
    }

    #[test]
    fn test_take_response_cookies_drains_queue() {
        let mut context = HttpContext::new();
        context.queue_cookie(Cookie::new("a", "1"));

        assert_eq!(context.take_response_cookies().len(), 1);
        assert!(context.response_cookies().is_empty());
    }
}
