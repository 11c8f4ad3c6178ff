//! Set-Cookie rewriting for localhost sessions.
//!
//! Upstream backends scope their session cookies to their own domain and,
//! usually, to https. Both make the browser drop the cookie when the app is
//! served from plain-HTTP localhost, so the middleware strips the `Domain`
//! attribute from every response cookie and, when the local listener is not
//! secure, the `Secure` attribute as well.
//!
//! The layer sits outermost in the chain, so it observes the final header
//! values no matter which inner handler produced them.

use axum::{
    extract::{Request, State},
    http::{header::SET_COOKIE, HeaderValue},
    middleware::Next,
    response::Response,
};

use crate::http::server::AppState;

/// Middleware: rewrite every `Set-Cookie` value on the response.
pub async fn rewrite_set_cookie(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    let mut response = next.run(req).await;

    let values: Vec<HeaderValue> = response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .cloned()
        .collect();
    if values.is_empty() {
        return response;
    }

    let secure = state.options.secure;
    let headers = response.headers_mut();
    headers.remove(SET_COOKIE);

    for value in values {
        let rewritten = match value.to_str() {
            Ok(original) => {
                let result = rewrite_cookie(original, secure);
                if result != original {
                    tracing::debug!(was = %original, now = %result, "rewrote Set-Cookie");
                }
                HeaderValue::from_str(&result).unwrap_or(value)
            }
            // Opaque bytes are left untouched.
            Err(_) => value,
        };
        headers.append(SET_COOKIE, rewritten);
    }

    response
}

/// Strip `Domain=…;` and, on plain-HTTP listeners, `Secure;` from one
/// cookie value. Idempotent.
pub fn rewrite_cookie(value: &str, secure: bool) -> String {
    let mut result = strip_attribute(value, "Domain=");
    if !secure {
        result = strip_literal(&result, "Secure;");
    }
    result
}

/// Remove every `<marker>…;` run, greedy to the next semicolon. A marker
/// without a terminating semicolon is left in place.
fn strip_attribute(value: &str, marker: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find(marker) {
        let tail = &rest[start..];
        match tail.find(';') {
            Some(end) => {
                out.push_str(&rest[..start]);
                rest = tail[end + 1..].trim_start();
            }
            None => break,
        }
    }

    out.push_str(rest);
    out.trim_end().to_owned()
}

/// Remove every occurrence of an exact literal plus the whitespace after it.
fn strip_literal(value: &str, literal: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find(literal) {
        out.push_str(&rest[..start]);
        rest = rest[start + literal.len()..].trim_start();
    }

    out.push_str(rest);
    out.trim_end().to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_domain_and_secure_on_plain_listeners() {
        assert_eq!(
            rewrite_cookie("sid=1; Domain=example.com; Secure;", false),
            "sid=1;"
        );
    }

    #[test]
    fn keeps_secure_on_secure_listeners() {
        assert_eq!(
            rewrite_cookie("sid=1; Domain=example.com; Secure;", true),
            "sid=1; Secure;"
        );
    }

    #[test]
    fn rewrite_is_idempotent() {
        let once = rewrite_cookie("sid=1; Domain=example.com; Secure;", false);
        assert_eq!(rewrite_cookie(&once, false), once);

        let once = rewrite_cookie("sid=1; Domain=example.com; Secure;", true);
        assert_eq!(rewrite_cookie(&once, true), once);
    }

    #[test]
    fn cookies_without_matching_attributes_pass_unchanged() {
        assert_eq!(
            rewrite_cookie("sid=1; Path=/; HttpOnly", false),
            "sid=1; Path=/; HttpOnly"
        );
    }

    #[test]
    fn domain_values_are_removed_greedily_to_the_next_semicolon() {
        assert_eq!(
            rewrite_cookie("a=1; Domain=.example.com; Path=/", false),
            "a=1; Path=/"
        );
    }

    #[test]
    fn unterminated_attributes_are_left_in_place() {
        assert_eq!(
            rewrite_cookie("sid=1; Domain=example.com", false),
            "sid=1; Domain=example.com"
        );
        assert_eq!(rewrite_cookie("sid=1; Secure", false), "sid=1; Secure");
    }

    #[test]
    fn each_value_is_rewritten_independently() {
        let values = ["a=1; Domain=x.com; Secure;", "b=2; Secure;", "c=3"];
        let rewritten: Vec<String> = values
            .iter()
            .map(|value| rewrite_cookie(value, false))
            .collect();
        assert_eq!(rewritten, vec!["a=1;", "b=2;", "c=3"]);
    }
}
