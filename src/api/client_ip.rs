//! Client IP extraction from HTTP headers.
//!
//! Telemetry is normally posted through a reverse proxy, so the first
//! parseable `X-Forwarded-For` entry wins; the socket remote address is the
//! fallback for direct connections.

use axum::http::HeaderMap;
use std::net::IpAddr;

pub fn extract_client_ip(headers: &HeaderMap, socket_addr: IpAddr) -> IpAddr {
    headers
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|xff| xff.split(',').next())
        .and_then(|entry| entry.trim().parse::<IpAddr>().ok())
        .unwrap_or(socket_addr)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn socket() -> IpAddr {
        "192.0.2.1".parse().unwrap()
    }

    #[test]
    fn falls_back_to_socket_address() {
        let headers = HeaderMap::new();
        assert_eq!(extract_client_ip(&headers, socket()), socket());
    }

    #[test]
    fn takes_first_forwarded_entry() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            "203.0.113.9, 198.51.100.7".parse().unwrap(),
        );
        assert_eq!(
            extract_client_ip(&headers, socket()),
            "203.0.113.9".parse::<IpAddr>().unwrap()
        );
    }

    #[test]
    fn garbage_header_falls_back_to_socket() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", "not-an-ip".parse().unwrap());
        assert_eq!(extract_client_ip(&headers, socket()), socket());
    }

    #[test]
    fn handles_ipv6_entries() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", "2001:db8::1".parse().unwrap());
        assert_eq!(
            extract_client_ip(&headers, socket()),
            "2001:db8::1".parse::<IpAddr>().unwrap()
        );
    }
}
