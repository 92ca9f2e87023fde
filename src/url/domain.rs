use url::Url;

/// Returns the root of the site a URL belongs to
///
/// The root is the URL's origin followed by `/`, which is the base against
/// which robots.txt is resolved for that site. URLs without a tuple origin
/// (e.g. `data:` URLs) have no site root.
///
/// # Arguments
///
/// * `url` - The URL to extract the site root from
///
/// # Returns
///
/// * `Some(String)` - The site root, e.g. `https://example.com/`
/// * `None` - If the URL has an opaque origin
///
/// # Examples
///
/// ```
/// use url::Url;
/// use robots_guard::url::site_root;
///
/// let url = Url::parse("https://EXAMPLE.COM/path?q=1").unwrap();
/// assert_eq!(site_root(&url), Some("https://example.com/".to_string()));
///
/// let url = Url::parse("http://example.com:8080/a/b").unwrap();
/// assert_eq!(site_root(&url), Some("http://example.com:8080/".to_string()));
/// ```
pub fn site_root(url: &Url) -> Option<String> {
    let origin = url.origin();
    if !origin.is_tuple() {
        return None;
    }
    Some(format!("{}/", origin.ascii_serialization()))
}
