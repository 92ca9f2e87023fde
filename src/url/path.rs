use url::Url;

/// Reduces a crawl target to the path and query robots.txt rules apply to
///
/// Absolute URLs are parsed so that scheme, host, port, and fragment are
/// dropped and the path comes back percent-encoded the way the URL parser
/// normalizes it. Strings that are not absolute URLs are treated as
/// site-relative references.
///
/// # Arguments
///
/// * `target` - An absolute URL or a site-relative path
///
/// # Returns
///
/// The path, followed by `?query` when the target has one. Never empty.
///
/// # Examples
///
/// ```
/// use robots_guard::url::path_and_query;
///
/// assert_eq!(path_and_query("https://example.com/a/b?x=1#frag"), "/a/b?x=1");
/// assert_eq!(path_and_query("https://example.com"), "/");
/// assert_eq!(path_and_query("/private/page"), "/private/page");
/// ```
pub fn path_and_query(target: &str) -> String {
    match Url::parse(target) {
        Ok(url) => {
            let mut out = String::with_capacity(target.len());
            if !url.path().starts_with('/') {
                out.push('/');
            }
            out.push_str(url.path());
            if let Some(query) = url.query() {
                out.push('?');
                out.push_str(query);
            }
            out
        }
        Err(_) => relative_path(target),
    }
}

/// Handles site-relative references that the URL parser rejects
fn relative_path(target: &str) -> String {
    let without_fragment = target.split('#').next().unwrap_or_default().trim();

    if without_fragment.is_empty() {
        return "/".to_string();
    }

    if without_fragment.starts_with('/') {
        without_fragment.to_string()
    } else {
        format!("/{}", without_fragment)
    }
}
