/// Checks if a host falls within an allowed domain entry
///
/// An entry matches the host exactly or any subdomain of it. A leading `*.`
/// on the entry is accepted and means the same thing. Comparison ignores
/// ASCII case.
///
/// # Examples
///
/// ```
/// use ripple_crawl::url::matches_domain;
///
/// assert!(matches_domain("example.com", "example.com"));
/// assert!(matches_domain("example.com", "blog.example.com"));
/// assert!(matches_domain("*.example.com", "api.v2.example.com"));
/// assert!(!matches_domain("example.com", "myexample.com"));
/// ```
pub fn matches_domain(entry: &str, host: &str) -> bool {
    let base = entry.strip_prefix("*.").unwrap_or(entry);
    if base.is_empty() || host.len() < base.len() {
        return false;
    }

    if host.len() == base.len() {
        return host.eq_ignore_ascii_case(base);
    }

    let split = host.len() - base.len();
    host.is_char_boundary(split)
        && host[split..].eq_ignore_ascii_case(base)
        && host[..split].ends_with('.')
}

/// Checks if a URL path matches a deny pattern
///
/// A pattern without `*` matches when it occurs anywhere in the path. A
/// pattern containing `*` is a glob anchored at both ends, where `*` matches
/// any run of characters, `/` included.
///
/// # Examples
///
/// ```
/// use ripple_crawl::url::matches_path;
///
/// assert!(matches_path("/private", "/a/private/b"));
/// assert!(matches_path("*.pdf", "/docs/report.pdf"));
/// assert!(!matches_path("/admin/*", "/admin"));
/// ```
pub fn matches_path(pattern: &str, path: &str) -> bool {
    if pattern.contains('*') {
        glob_match(pattern, path)
    } else {
        path.contains(pattern)
    }
}

fn glob_match(pattern: &str, text: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let text: Vec<char> = text.chars().collect();

    let (mut p, mut t) = (0, 0);
    // Position of the last `*` seen and the text index it is currently absorbing up to
    let mut backtrack: Option<(usize, usize)> = None;

    while t < text.len() {
        if p < pattern.len() && pattern[p] == '*' {
            backtrack = Some((p, t));
            p += 1;
        } else if p < pattern.len() && pattern[p] == text[t] {
            p += 1;
            t += 1;
        } else if let Some((star, absorbed)) = backtrack {
            p = star + 1;
            t = absorbed + 1;
            backtrack = Some((star, absorbed + 1));
        } else {
            return false;
        }
    }

    pattern[p..].iter().all(|&c| c == '*')
}
