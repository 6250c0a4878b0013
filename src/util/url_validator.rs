use std::net::IpAddr;
use thiserror::Error;
use url::Url;

#[derive(Error, Debug)]
pub enum UrlValidationError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("Unsupported scheme: {0} (only http/https allowed)")]
    UnsupportedScheme(String),
    #[error("URL carries embedded credentials")]
    Credentials,
    #[error("Private or local address not allowed: {0}")]
    PrivateHost(String),
}

/// Check a catalog-supplied URL before handing it to the system opener.
///
/// Poster paths and homepages come from a third party, so only public
/// `http`/`https` URLs without userinfo are passed on. Anything else could
/// launch an arbitrary handler on the user's machine.
pub fn validate_url_for_open(url_str: &str) -> Result<Url, UrlValidationError> {
    let url = Url::parse(url_str.trim())?;

    match url.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlValidationError::UnsupportedScheme(scheme.to_owned())),
    }

    if !url.username().is_empty() || url.password().is_some() {
        return Err(UrlValidationError::Credentials);
    }

    let host = url.host_str().unwrap_or_default();
    if host.is_empty() || host.eq_ignore_ascii_case("localhost") {
        return Err(UrlValidationError::PrivateHost(host.to_owned()));
    }

    let bare = host
        .strip_prefix('[')
        .and_then(|h| h.strip_suffix(']'))
        .unwrap_or(host);
    if let Ok(ip) = bare.parse::<IpAddr>() {
        if is_non_public(&ip) {
            return Err(UrlValidationError::PrivateHost(ip.to_string()));
        }
    }

    Ok(url)
}

fn is_non_public(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => {
            v4.is_private() || v4.is_loopback() || v4.is_link_local() || v4.is_unspecified()
        }
        IpAddr::V6(v6) => {
            let first = v6.segments()[0];
            v6.is_loopback()
                || v6.is_unspecified()
                || (first & 0xfe00) == 0xfc00 // unique local
                || (first & 0xffc0) == 0xfe80 // link local
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poster_url_accepted() {
        let url = validate_url_for_open("https://image.tmdb.org/t/p/original/abc.jpg").unwrap();
        assert_eq!(url.host_str(), Some("image.tmdb.org"));
    }

    #[test]
    fn test_non_web_schemes_rejected() {
        assert!(matches!(
            validate_url_for_open("file:///etc/passwd"),
            Err(UrlValidationError::UnsupportedScheme(_))
        ));
        assert!(validate_url_for_open("javascript:alert(1)").is_err());
    }

    #[test]
    fn test_credentials_rejected() {
        assert!(matches!(
            validate_url_for_open("https://user:pw@example.com/"),
            Err(UrlValidationError::Credentials)
        ));
    }

    #[test]
    fn test_local_hosts_rejected() {
        assert!(validate_url_for_open("http://localhost/poster.jpg").is_err());
        assert!(validate_url_for_open("http://127.0.0.1/poster.jpg").is_err());
        assert!(validate_url_for_open("http://192.168.1.10:8080/x").is_err());
        assert!(validate_url_for_open("http://[::1]/x").is_err());
        assert!(validate_url_for_open("http://[fe80::1]/x").is_err());
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(matches!(
            validate_url_for_open("not a url"),
            Err(UrlValidationError::InvalidUrl(_))
        ));
    }
}
