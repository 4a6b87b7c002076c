//! Response security headers.
//!
//! The header set is computed once from [`SecurityHeadersConfig`] and
//! stamped onto every response, error responses included.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{
        header::{
            CONTENT_SECURITY_POLICY, REFERRER_POLICY, STRICT_TRANSPORT_SECURITY,
            X_CONTENT_TYPE_OPTIONS, X_FRAME_OPTIONS, X_XSS_PROTECTION,
        },
        HeaderMap, HeaderName, HeaderValue,
    },
    middleware::Next,
    response::Response,
};

use crate::config::SecurityHeadersConfig;

/// Precomputed header set, cheap to clone into the middleware state.
#[derive(Debug, Clone, Default)]
pub struct SecurityHeaders(Arc<HeaderMap>);

impl SecurityHeaders {
    /// Build the header set. Values that are not valid header text are
    /// skipped with a warning; config validation normally catches them first.
    #[must_use]
    pub fn from_config(config: &SecurityHeadersConfig) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
        headers.insert(X_XSS_PROTECTION, HeaderValue::from_static("1; mode=block"));

        insert_configured(&mut headers, X_FRAME_OPTIONS, &config.frame_options);
        insert_configured(
            &mut headers,
            CONTENT_SECURITY_POLICY,
            &config.content_security_policy,
        );
        insert_configured(&mut headers, REFERRER_POLICY, &config.referrer_policy);

        // HTTPS deployments only
        if config.hsts_enabled {
            let mut hsts = format!("max-age={}", config.hsts_max_age);
            if config.hsts_include_subdomains {
                hsts.push_str("; includeSubDomains");
            }
            insert_configured(&mut headers, STRICT_TRANSPORT_SECURITY, &hsts);
        }

        Self(Arc::new(headers))
    }

    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.0
    }
}

fn insert_configured(headers: &mut HeaderMap, name: HeaderName, value: &str) {
    match HeaderValue::from_str(value) {
        Ok(value) => {
            headers.insert(name, value);
        }
        Err(_) => tracing::warn!(header = %name, "skipping invalid security header value"),
    }
}

/// Middleware that copies the configured headers onto each response.
///
/// ```ignore
/// let headers = SecurityHeaders::from_config(&config.security_headers);
/// let app = Router::new()
///     .merge(routes)
///     .layer(middleware::from_fn_with_state(headers, security_headers_middleware));
/// ```
pub async fn security_headers_middleware(
    State(headers): State<SecurityHeaders>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;
    let target = response.headers_mut();
    for (name, value) in headers.headers() {
        target.insert(name.clone(), value.clone());
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_baseline_headers() {
        let headers = SecurityHeaders::from_config(&SecurityHeadersConfig::default());
        let map = headers.headers();

        for name in [
            X_CONTENT_TYPE_OPTIONS,
            X_FRAME_OPTIONS,
            X_XSS_PROTECTION,
            CONTENT_SECURITY_POLICY,
            REFERRER_POLICY,
        ] {
            assert!(map.contains_key(&name), "missing {name}");
        }
        assert!(!map.contains_key(STRICT_TRANSPORT_SECURITY));
    }

    #[test]
    fn hsts_value_follows_config() {
        let config = SecurityHeadersConfig {
            hsts_enabled: true,
            hsts_max_age: 600,
            hsts_include_subdomains: false,
            ..SecurityHeadersConfig::default()
        };
        let headers = SecurityHeaders::from_config(&config);
        assert_eq!(
            headers.headers().get(STRICT_TRANSPORT_SECURITY),
            Some(&HeaderValue::from_static("max-age=600"))
        );
    }

    #[test]
    fn invalid_value_is_skipped() {
        let config = SecurityHeadersConfig {
            referrer_policy: "bad\nvalue".to_string(),
            ..SecurityHeadersConfig::default()
        };
        let headers = SecurityHeaders::from_config(&config);
        assert!(!headers.headers().contains_key(REFERRER_POLICY));
        assert!(headers.headers().contains_key(X_CONTENT_TYPE_OPTIONS));
    }
}
