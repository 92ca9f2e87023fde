use crate::UrlError;
use url::Url;

/// Relative location of the policy resource under a site root
pub const ROBOTS_PATH: &str = "robots.txt";

/// Parses and validates a site base URL
///
/// Only absolute `http` and `https` URLs are accepted; the URL parser
/// already rejects those without a host.
///
/// # Arguments
///
/// * `base` - The base URL string, e.g. `https://example.com`
///
/// # Returns
///
/// * `Ok(Url)` - The parsed base URL
/// * `Err(UrlError)` - The string is not an absolute HTTP(S) URL
pub fn parse_base_url(base: &str) -> Result<Url, UrlError> {
    let url = Url::parse(base.trim())?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    Ok(url)
}

/// Resolves the robots.txt URL for a site base URL
///
/// This uses relative reference resolution, not string concatenation, so the
/// result depends on whether the base path ends with a slash.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use robots_guard::url::robots_url;
///
/// let base = Url::parse("https://example.com").unwrap();
/// assert_eq!(robots_url(&base).unwrap().as_str(), "https://example.com/robots.txt");
///
/// let base = Url::parse("https://example.com/docs/").unwrap();
/// assert_eq!(robots_url(&base).unwrap().as_str(), "https://example.com/docs/robots.txt");
/// ```
pub fn robots_url(base: &Url) -> Result<Url, UrlError> {
    Ok(base.join(ROBOTS_PATH)?)
}
