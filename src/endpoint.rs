//! Endpoint resolution, including the mutual-TLS environment switches.

use std::fmt;

use crate::errors::Error;

/// Default service host.
pub const DEFAULT_ENDPOINT: &str = "aiplatform.googleapis.com";

/// Default host when mutual TLS is in effect.
pub const DEFAULT_MTLS_ENDPOINT: &str = "aiplatform.mtls.googleapis.com";

/// Environment switch selecting the mTLS endpoint: `always`, `never`, `auto`.
pub const USE_MTLS_ENDPOINT_ENV: &str = "USE_MTLS_ENDPOINT";

/// Environment switch gating client certificates: `true` or `false`.
pub const USE_CLIENT_CERTIFICATE_ENV: &str = "USE_CLIENT_CERTIFICATE";

/// URL scheme accepted in endpoint strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    Https,
    Http,
}

impl Scheme {
    pub fn as_str(self) -> &'static str {
        match self {
            Scheme::Https => "https",
            Scheme::Http => "http",
        }
    }

    fn default_port(self) -> u16 {
        match self {
            Scheme::Https => 443,
            Scheme::Http => 80,
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resolved endpoint descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
    pub scheme: Scheme,
    pub is_mtls: bool,
}

impl Endpoint {
    /// Base URL without a trailing slash, omitting the scheme's default
    /// port.
    pub fn url(&self) -> String {
        if self.port == self.scheme.default_port() {
            format!("{}://{}", self.scheme, self.host)
        } else {
            format!("{}://{}:{}", self.scheme, self.host, self.port)
        }
    }
}

/// Derives the mutual-TLS counterpart of a host.
///
/// `mtls` is inserted after the first label, so `x.googleapis.com` becomes
/// `x.mtls.googleapis.com` and `x.sandbox.googleapis.com` becomes
/// `x.mtls.sandbox.googleapis.com`. Hosts already containing `.mtls.` are
/// returned unchanged.
pub fn mtls_host(host: &str) -> String {
    if host.contains(".mtls.") {
        return host.to_string();
    }
    match host.split_once('.') {
        Some((first, rest)) => format!("{first}.mtls.{rest}"),
        None => host.to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum MtlsEndpointMode {
    Always,
    Never,
    #[default]
    Auto,
}

impl MtlsEndpointMode {
    fn parse(value: Option<&str>) -> Result<Self, Error> {
        match value {
            None => Ok(MtlsEndpointMode::Auto),
            Some("always") => Ok(MtlsEndpointMode::Always),
            Some("never") => Ok(MtlsEndpointMode::Never),
            Some("auto") => Ok(MtlsEndpointMode::Auto),
            Some(other) => Err(Error::config(format!(
                "mutual TLS misconfigured: {USE_MTLS_ENDPOINT_ENV} must be always, never, or auto, got {other:?}"
            ))),
        }
    }
}

fn parse_client_cert_switch(value: Option<&str>) -> Result<bool, Error> {
    match value {
        None => Ok(false),
        Some("true") => Ok(true),
        Some("false") => Ok(false),
        Some(other) => Err(Error::config(format!(
            "mutual TLS misconfigured: {USE_CLIENT_CERTIFICATE_ENV} must be true or false, got {other:?}"
        ))),
    }
}

/// Outcome of endpoint resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct EndpointSelection {
    pub(crate) endpoint: Endpoint,
    /// Whether the configured client certificate should be presented.
    pub(crate) use_client_cert: bool,
}

/// Resolves the endpoint from the explicit setting, the environment
/// switches, and client certificate availability.
pub(crate) fn resolve(
    user_endpoint: Option<&str>,
    has_cert_source: bool,
) -> Result<EndpointSelection, Error> {
    resolve_with(
        user_endpoint,
        has_cert_source,
        env_switch(USE_MTLS_ENDPOINT_ENV).as_deref(),
        env_switch(USE_CLIENT_CERTIFICATE_ENV).as_deref(),
    )
}

fn resolve_with(
    user_endpoint: Option<&str>,
    has_cert_source: bool,
    mtls_mode: Option<&str>,
    client_cert_switch: Option<&str>,
) -> Result<EndpointSelection, Error> {
    let mode = MtlsEndpointMode::parse(mtls_mode)?;
    let use_client_cert = parse_client_cert_switch(client_cert_switch)? && has_cert_source;

    // An explicit endpoint is used verbatim; the switches still decide
    // whether the certificate is presented.
    if let Some(value) = user_endpoint {
        let endpoint = parse_endpoint(value, value.contains(".mtls."))?;
        return Ok(EndpointSelection {
            endpoint,
            use_client_cert,
        });
    }

    let pick_mtls = match mode {
        MtlsEndpointMode::Always => true,
        MtlsEndpointMode::Never => false,
        MtlsEndpointMode::Auto => use_client_cert,
    };
    let host = if pick_mtls {
        DEFAULT_MTLS_ENDPOINT
    } else {
        DEFAULT_ENDPOINT
    };
    Ok(EndpointSelection {
        endpoint: parse_endpoint(host, pick_mtls)?,
        use_client_cert,
    })
}

/// Parses `host`, `host:port`, or `scheme://host[:port]`, tolerating one
/// trailing slash.
fn parse_endpoint(value: &str, is_mtls: bool) -> Result<Endpoint, Error> {
    let (scheme, rest) = match value.split_once("://") {
        Some(("https", rest)) => (Scheme::Https, rest),
        Some(("http", rest)) => (Scheme::Http, rest),
        Some((other, _)) => {
            return Err(Error::config(format!(
                "unsupported endpoint scheme {other:?}"
            )))
        }
        None => (Scheme::Https, value),
    };
    let rest = rest.trim_end_matches('/');
    let (host, port) = match rest.rsplit_once(':') {
        Some((host, port)) if !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit()) => {
            let port = port
                .parse::<u16>()
                .map_err(|_| Error::config(format!("endpoint port out of range in {value:?}")))?;
            (host, Some(port))
        }
        _ => (rest, None),
    };
    if host.is_empty() {
        return Err(Error::config(format!("endpoint host missing in {value:?}")));
    }
    Ok(Endpoint {
        host: host.to_string(),
        port: port.unwrap_or_else(|| scheme.default_port()),
        scheme,
        is_mtls,
    })
}

fn env_switch(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_mtls_hosts() {
        assert_eq!(
            mtls_host("aiplatform.googleapis.com"),
            "aiplatform.mtls.googleapis.com"
        );
        assert_eq!(
            mtls_host("foo.sandbox.googleapis.com"),
            "foo.mtls.sandbox.googleapis.com"
        );
        assert_eq!(
            mtls_host("bar.mtls.googleapis.com"),
            "bar.mtls.googleapis.com"
        );
        assert_eq!(mtls_host(DEFAULT_ENDPOINT), DEFAULT_MTLS_ENDPOINT);
    }

    #[test]
    fn auto_mode_follows_certificate_state() {
        let plain = resolve_with(None, false, None, None).unwrap();
        assert_eq!(plain.endpoint.host, DEFAULT_ENDPOINT);
        assert!(!plain.use_client_cert);

        let with_cert = resolve_with(None, true, Some("auto"), Some("true")).unwrap();
        assert_eq!(with_cert.endpoint.host, DEFAULT_MTLS_ENDPOINT);
        assert!(with_cert.use_client_cert);
        assert!(with_cert.endpoint.is_mtls);
    }

    #[test]
    fn certificate_needs_the_enable_switch() {
        let selection = resolve_with(None, true, None, None).unwrap();
        assert_eq!(selection.endpoint.host, DEFAULT_ENDPOINT);
        assert!(!selection.use_client_cert);
    }

    #[test]
    fn always_and_never_force_the_choice() {
        let forced = resolve_with(None, false, Some("always"), None).unwrap();
        assert_eq!(forced.endpoint.host, DEFAULT_MTLS_ENDPOINT);

        let never = resolve_with(None, true, Some("never"), Some("true")).unwrap();
        assert_eq!(never.endpoint.host, DEFAULT_ENDPOINT);
        assert!(never.use_client_cert);
    }

    #[test]
    fn invalid_switch_values_are_config_errors() {
        let err = resolve_with(None, false, Some("sometimes"), None).unwrap_err();
        assert!(err.to_string().contains(USE_MTLS_ENDPOINT_ENV));

        let err = resolve_with(None, false, None, Some("1")).unwrap_err();
        assert!(err.to_string().contains(USE_CLIENT_CERTIFICATE_ENV));
    }

    #[test]
    fn explicit_endpoint_is_used_verbatim() {
        let selection =
            resolve_with(Some("http://127.0.0.1:4318/"), false, Some("always"), None).unwrap();
        assert_eq!(selection.endpoint.host, "127.0.0.1");
        assert_eq!(selection.endpoint.port, 4318);
        assert_eq!(selection.endpoint.scheme, Scheme::Http);
        assert_eq!(selection.endpoint.url(), "http://127.0.0.1:4318");
    }

    #[test]
    fn bare_hosts_default_to_https() {
        let endpoint = parse_endpoint("eu-aiplatform.googleapis.com", false).unwrap();
        assert_eq!(endpoint.port, 443);
        assert_eq!(endpoint.url(), "https://eu-aiplatform.googleapis.com");
    }

    #[test]
    fn malformed_endpoints_are_rejected() {
        assert!(parse_endpoint("ftp://host", false).is_err());
        assert!(parse_endpoint("https://", false).is_err());
        assert!(parse_endpoint("host:70000", false).is_err());
    }
}
