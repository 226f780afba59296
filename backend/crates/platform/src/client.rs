//! Client identification utilities
//!
//! Helpers for reading caller-supplied metadata off HTTP request headers.

use axum::http::{HeaderMap, header};
use std::net::IpAddr;

/// Caller metadata carried alongside a request body
#[derive(Debug, Clone, Default)]
pub struct ClientContext {
    /// Client IP address (from X-Forwarded-For or direct connection)
    pub ip: Option<IpAddr>,
    /// Raw `Authorization` header value, if present and valid UTF-8
    pub authorization: Option<String>,
    /// User-Agent (logging only)
    pub user_agent: Option<String>,
}

impl ClientContext {
    /// Collect caller metadata from headers and the direct peer address
    pub fn from_headers(headers: &HeaderMap, direct_ip: Option<IpAddr>) -> Self {
        Self {
            ip: extract_client_ip(headers, direct_ip),
            authorization: extract_authorization(headers),
            user_agent: headers
                .get(header::USER_AGENT)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
        }
    }

    /// IP as string (for logging)
    pub fn ip_string(&self) -> Option<String> {
        self.ip.map(|ip| ip.to_string())
    }
}

/// Extract the `Authorization` header value, trimmed.
///
/// Empty values are treated as absent.
pub fn extract_authorization(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Extract client IP address from headers
///
/// Checks X-Forwarded-For header first (for reverse proxy setups),
/// then falls back to direct connection IP.
pub fn extract_client_ip(headers: &HeaderMap, direct_ip: Option<IpAddr>) -> Option<IpAddr> {
    if let Some(xff) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
        if let Some(first_ip) = xff.split(',').next() {
            if let Ok(ip) = first_ip.trim().parse::<IpAddr>() {
                return Some(ip);
            }
        }
    }
    direct_ip
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_extract_authorization() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("  c2ln  "));
        assert_eq!(extract_authorization(&headers), Some("c2ln".to_string()));
    }

    #[test]
    fn test_extract_authorization_missing_or_empty() {
        let mut headers = HeaderMap::new();
        assert_eq!(extract_authorization(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("   "));
        assert_eq!(extract_authorization(&headers), None);
    }

    #[test]
    fn test_extract_client_ip_xff() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("192.168.1.1, 10.0.0.1"),
        );

        let ip = extract_client_ip(&headers, None);
        assert_eq!(ip, Some("192.168.1.1".parse().unwrap()));
    }

    #[test]
    fn test_client_context_direct_ip() {
        let mut headers = HeaderMap::new();
        headers.insert(header::USER_AGENT, HeaderValue::from_static("wallet/1.0"));
        let direct: IpAddr = "127.0.0.1".parse().unwrap();

        let ctx = ClientContext::from_headers(&headers, Some(direct));
        assert_eq!(ctx.ip, Some(direct));
        assert_eq!(ctx.user_agent.as_deref(), Some("wallet/1.0"));
        assert!(ctx.authorization.is_none());
        assert_eq!(ctx.ip_string().as_deref(), Some("127.0.0.1"));
    }
}
