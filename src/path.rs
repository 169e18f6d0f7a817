//! Path normalization helpers shared by registration, dispatch and URI generation.

/// Returns the canonical form of a path: exactly one leading slash and no
/// trailing slash, except for the root `/`.
///
/// Leading and trailing `/` and `\` are trimmed before the canonical slash is
/// prepended, so `"foo/"`, `"/foo"` and `"\\foo\\"` all normalize to `"/foo"`.
pub fn normalize(path: &str) -> String {
    let trimmed = path.trim_matches(|c| c == '/' || c == '\\');
    let mut normalized = String::with_capacity(trimmed.len() + 1);
    normalized.push('/');
    normalized.push_str(trimmed);
    normalized
}

/// Joins an already normalized prefix with an already normalized path.
///
/// The root prefix `/` is neutral, and joining onto the root path yields the
/// prefix itself: `join("/foo", "/")` is `"/foo"`.
pub fn join(prefix: &str, path: &str) -> String {
    match (prefix, path) {
        ("/", _) | ("", _) => path.to_owned(),
        (_, "/") => prefix.to_owned(),
        _ => [prefix, path].concat(),
    }
}

/// Strips a single trailing slash from a request path, unless the path is the root.
pub fn trim_trailing_slash(path: &str) -> &str {
    if path.len() > 1 && path.ends_with('/') {
        &path[..path.len() - 1]
    } else {
        path
    }
}

/// Drops the query string and fragment from a request target.
pub fn without_query(path: &str) -> &str {
    match path.find(|c| c == '?' || c == '#') {
        Some(idx) => &path[..idx],
        None => path,
    }
}

/// Removes the base path from a request path.
///
/// The base path is compared case-insensitively and must end on a segment
/// boundary. Returns `None` if the request lives outside the base path. An
/// empty remainder is the root `/`.
pub fn strip_base<'a>(base: &str, path: &'a str) -> Option<&'a str> {
    if base.is_empty() || base == "/" {
        return Some(path);
    }

    let head = path.get(..base.len())?;
    if !head.eq_ignore_ascii_case(base) {
        return None;
    }

    match &path[base.len()..] {
        "" => Some("/"),
        rest if rest.starts_with('/') => Some(rest),
        _ => None,
    }
}
