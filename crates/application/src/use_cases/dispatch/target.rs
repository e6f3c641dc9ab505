use bucketwire_domain::TransportError;
use http::header::{HeaderValue, HOST};
use http::uri::{Authority, Uri};
use http::Request;
use std::net::IpAddr;

/// The symbolic destination of a request: what gets resolved, what the
/// `Host` header carries and what the certificate must name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTarget {
    host: String,
    port: Option<u16>,
}

impl RequestTarget {
    pub fn from_uri(uri: &Uri) -> Result<Self, TransportError> {
        if uri.scheme().is_none() {
            return Err(TransportError::MissingHost(uri.to_string()));
        }

        let host = uri
            .host()
            .map(|h| h.trim_start_matches('[').trim_end_matches(']'))
            .filter(|h| !h.is_empty())
            .ok_or_else(|| TransportError::MissingHost(uri.to_string()))?;

        Ok(Self {
            host: host.to_ascii_lowercase(),
            port: uri.port_u16(),
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> Option<u16> {
        self.port
    }

    /// Value for the `Host` header; the port only appears when the caller
    /// spelled it out.
    pub fn host_header(&self) -> String {
        let host = if self.host.contains(':') {
            format!("[{}]", self.host)
        } else {
            self.host.clone()
        };
        with_port(host, self.port)
    }

    /// Connection authority pointing at `ip` instead of the hostname.
    pub fn ip_authority(&self, ip: IpAddr) -> String {
        let ip = match ip {
            IpAddr::V4(v4) => v4.to_string(),
            IpAddr::V6(v6) => format!("[{}]", v6),
        };
        with_port(ip, self.port)
    }

    /// Point `request` at `ip` while keeping the hostname as its logical
    /// identity. Path, query, method, headers and body are untouched.
    pub fn rewrite<B>(&self, request: Request<B>, ip: IpAddr) -> Result<Request<B>, TransportError> {
        let (mut parts, body) = request.into_parts();

        let mut uri_parts = std::mem::take(&mut parts.uri).into_parts();
        uri_parts.authority = Some(
            self.ip_authority(ip)
                .parse::<Authority>()
                .map_err(TransportError::exchange)?,
        );
        parts.uri = Uri::from_parts(uri_parts).map_err(TransportError::exchange)?;

        let host = HeaderValue::from_str(&self.host_header()).map_err(TransportError::exchange)?;
        parts.headers.insert(HOST, host);

        Ok(Request::from_parts(parts, body))
    }
}

fn with_port(host: String, port: Option<u16>) -> String {
    match port {
        Some(port) => format!("{}:{}", host, port),
        None => host,
    }
}
