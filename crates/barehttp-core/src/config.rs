//! Listen address configuration
//!
//! Services are configured with a URL-like string such as
//! `http://localhost:8081/`. Only the host and port matter; the host token
//! decides which interface the listener binds:
//!
//! | host | bind |
//! |---|---|
//! | `localhost`, `127.0.0.1`, `::1` | loopback only |
//! | `0.0.0.0`, `*`, `+` | all interfaces |
//! | any other IP literal | that address |
//! | anything else | all interfaces |

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// Host and port parsed out of a listen URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenUrl {
    /// Host token without brackets
    pub host: String,
    pub port: u16,
}

impl ListenUrl {
    /// Parse a URL-like string; a missing or invalid port becomes `default_port`
    pub fn parse(url: &str, default_port: u16) -> Self {
        let rest = url.trim();
        let rest = rest.split_once("://").map_or(rest, |(_, r)| r);
        let authority = rest.split(['/', '?', '#']).next().unwrap_or("");
        let authority = authority.rsplit_once('@').map_or(authority, |(_, a)| a);

        let (host, port) = if let Some(bracketed) = authority.strip_prefix('[') {
            match bracketed.split_once(']') {
                Some((host, tail)) => (host, tail.strip_prefix(':')),
                None => (bracketed, None),
            }
        } else if authority.matches(':').count() > 1 {
            // Bare IPv6 literal, no port possible
            (authority, None)
        } else {
            match authority.split_once(':') {
                Some((host, port)) => (host, Some(port)),
                None => (authority, None),
            }
        };

        let port = port
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(default_port);
        Self {
            host: host.to_string(),
            port,
        }
    }

    /// Same host with another port
    pub fn with_port(&self, port: u16) -> Self {
        Self {
            host: self.host.clone(),
            port,
        }
    }

    /// Address the listener binds to
    pub fn bind_ip(&self) -> IpAddr {
        let host = self.host.as_str();
        if host.eq_ignore_ascii_case("localhost") || host == "127.0.0.1" || host == "::1" {
            return IpAddr::V4(Ipv4Addr::LOCALHOST);
        }
        match host {
            "0.0.0.0" | "*" | "+" => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            _ => host
                .parse()
                .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED)),
        }
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_ip(), self.port)
    }

    /// Host shown in the startup log line
    pub fn display_host(&self) -> String {
        let host = self.host.as_str();
        if host.eq_ignore_ascii_case("localhost") || host == "127.0.0.1" || host == "::1" {
            return "localhost".to_string();
        }
        match host {
            "0.0.0.0" | "*" | "+" => "0.0.0.0".to_string(),
            _ => self.bind_ip().to_string(),
        }
    }
}

impl fmt::Display for ListenUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "http://[{}]:{}/", self.host, self.port)
        } else {
            write!(f, "http://{}:{}/", self.host, self.port)
        }
    }
}

/// Pick the listen URL from the usual sources.
///
/// Precedence: explicit URL, then the service port, then the generic
/// `PORT`, then `default_url` untouched. Ports replace only the port of
/// the default URL. Unparsable ports are ignored.
pub fn resolve_listen_url(
    url: Option<&str>,
    service_port: Option<&str>,
    generic_port: Option<&str>,
    default_url: &str,
    default_port: u16,
) -> ListenUrl {
    if let Some(url) = url.map(str::trim).filter(|u| !u.is_empty()) {
        return ListenUrl::parse(url, default_port);
    }

    let default = ListenUrl::parse(default_url, default_port);
    [service_port, generic_port]
        .into_iter()
        .flatten()
        .find_map(|p| p.trim().parse::<u16>().ok())
        .map_or(default.clone(), |port| default.with_port(port))
}

/// Generic `PORT` from the environment, if set
pub fn generic_port() -> Option<String> {
    std::env::var("PORT").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_url() {
        let url = ListenUrl::parse("http://localhost:8081/", 80);
        assert_eq!(url.host, "localhost");
        assert_eq!(url.port, 8081);
    }

    #[test]
    fn test_parse_without_scheme_or_port() {
        assert_eq!(ListenUrl::parse("0.0.0.0", 8080).port, 8080);
        assert_eq!(ListenUrl::parse("example.org:9000/x", 1).port, 9000);
        assert_eq!(ListenUrl::parse("http://*:abc/", 8082).port, 8082);
        assert_eq!(ListenUrl::parse("http://+:70000/", 8082).port, 8082);
    }

    #[test]
    fn test_parse_ipv6() {
        let url = ListenUrl::parse("http://[::1]:9090/", 80);
        assert_eq!(url.host, "::1");
        assert_eq!(url.port, 9090);

        let url = ListenUrl::parse("[fe80::1]", 80);
        assert_eq!(url.host, "fe80::1");
        assert_eq!(url.port, 80);

        let url = ListenUrl::parse("::", 81);
        assert_eq!(url.host, "::");
        assert_eq!(url.port, 81);
    }

    #[test]
    fn test_bind_ip() {
        let loopback = IpAddr::V4(Ipv4Addr::LOCALHOST);
        let any = IpAddr::V4(Ipv4Addr::UNSPECIFIED);
        for (host, expected) in [
            ("localhost", loopback),
            ("LocalHost", loopback),
            ("127.0.0.1", loopback),
            ("::1", loopback),
            ("0.0.0.0", any),
            ("*", any),
            ("+", any),
            ("example.org", any),
            ("10.0.0.7", "10.0.0.7".parse().unwrap()),
        ] {
            let url = ListenUrl { host: host.to_string(), port: 1 };
            assert_eq!(url.bind_ip(), expected, "{}", host);
        }
    }

    #[test]
    fn test_display_host() {
        let url = |h: &str| ListenUrl { host: h.to_string(), port: 1 };
        assert_eq!(url("127.0.0.1").display_host(), "localhost");
        assert_eq!(url("*").display_host(), "0.0.0.0");
        assert_eq!(url("10.0.0.7").display_host(), "10.0.0.7");
        assert_eq!(url("my-box").display_host(), "0.0.0.0");
    }

    #[test]
    fn test_precedence() {
        let default = "http://localhost:8081/";
        let pick = |u, s, g| resolve_listen_url(u, s, g, default, 8081);

        assert_eq!(pick(Some("http://0.0.0.0:9000/"), Some("1"), Some("2")).port, 9000);
        assert_eq!(pick(None, Some("9001"), Some("9002")).port, 9001);
        assert_eq!(pick(None, None, Some("9002")).port, 9002);
        assert_eq!(pick(None, Some("bogus"), Some("9002")).port, 9002);
        assert_eq!(pick(None, None, None), ListenUrl::parse(default, 8081));
        assert_eq!(pick(Some("  "), None, None).port, 8081);

        let picked = pick(None, Some("9001"), None);
        assert_eq!(picked.host, "localhost");
        assert_eq!(picked.to_string(), "http://localhost:9001/");
    }
}
