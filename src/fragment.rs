//! Fragment resolution.
//!
//! The router never looks at the raw address. It works with the *fragment*:
//! the part of the address that routes are matched against, with the root
//! prefix, the query string and surrounding slashes removed.
//!
//! | Mode      | Address                          | Fragment   | Query source |
//! |-----------|----------------------------------|------------|--------------|
//! | `History` | `/app/user/42?tab=info` (root `/app`) | `user/42` | `?tab=info` |
//! | `Hash`    | `/index.html#/user/42?tab=info`  | `user/42`  | `tab=info`   |
//!
//! # Example
//!
//! ```
//! use spa_navigator::fragment::{resolve, trim_slashes};
//! use spa_navigator::{Location, Mode};
//!
//! let location = Location::parse("/app/user/42?tab=info");
//! assert_eq!(resolve(&location, Mode::History, "/app/"), "user/42");
//! assert_eq!(trim_slashes("//a/b//"), "a/b");
//! ```

use crate::params::QueryParams;
use crate::platform::Location;
use crate::settings::Mode;
use std::borrow::Cow;

/// Strip leading and trailing slashes.
#[inline]
pub fn trim_slashes(path: &str) -> &str {
    path.trim_start_matches('/').trim_end_matches('/')
}

/// Normalise a caller-supplied path into a fragment.
///
/// A missing path yields the empty fragment.
pub fn from_path(path: Option<&str>) -> String {
    path.map(|p| trim_slashes(p).to_string()).unwrap_or_default()
}

/// Resolve the fragment of `location` for the given mode and root.
pub fn resolve(location: &Location, mode: Mode, root: &str) -> String {
    match mode {
        Mode::History => history_fragment(location, root),
        Mode::Hash => hash_fragment(location),
    }
}

/// Resolve the query parameters of `location` for the given mode.
pub fn resolve_query(location: &Location, mode: Mode) -> QueryParams {
    match mode {
        Mode::History => QueryParams::parse(&location.search),
        Mode::Hash => {
            let hash = strip_hash(&location.hash);
            hash.split_once('?')
                .map(|(_, query)| QueryParams::parse(query))
                .unwrap_or_default()
        }
    }
}

/// Path-mode fragment: query cut, path decoded, root prefix stripped.
///
/// Escapes of URI delimiters such as `%2F` or `%3F` stay encoded, so an
/// escaped slash never splits a segment.
pub fn history_fragment(location: &Location, root: &str) -> String {
    let raw = location.pathname.split('?').next().unwrap_or_default();
    let decoded = decode_path(raw);
    let path = trim_slashes(&decoded);

    let root = trim_slashes(root);
    let path = if root.is_empty() {
        path
    } else if path == root {
        ""
    } else {
        path.strip_prefix(root)
            .and_then(|rest| rest.strip_prefix('/'))
            .unwrap_or(path)
    };

    trim_slashes(path).to_string()
}

/// Hash-mode fragment: everything after `#` up to the first `?`.
pub fn hash_fragment(location: &Location) -> String {
    let hash = strip_hash(&location.hash);
    let path = hash.split('?').next().unwrap_or_default();
    trim_slashes(path).to_string()
}

/// Characters whose escapes [`decode_path`] leaves alone.
const RESERVED: &[u8] = b";/?:@&=+$,#";

/// Percent-decode `text` except for escapes of [`RESERVED`] characters.
///
/// A chunk that does not decode to UTF-8 is kept as written.
pub fn decode_path(text: &str) -> Cow<'_, str> {
    if !text.contains('%') {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut chunk_start = 0;
    let mut cursor = 0;
    while let Some(offset) = text[cursor..].find('%') {
        let at = cursor + offset;
        let byte = text
            .get(at + 1..at + 3)
            .filter(|hex| hex.bytes().all(|b| b.is_ascii_hexdigit()))
            .and_then(|hex| u8::from_str_radix(hex, 16).ok());
        match byte {
            Some(byte) if RESERVED.contains(&byte) => {
                out.push_str(&decode_chunk(&text[chunk_start..at]));
                out.push_str(&text[at..at + 3]);
                chunk_start = at + 3;
                cursor = at + 3;
            }
            _ => cursor = at + 1,
        }
    }
    out.push_str(&decode_chunk(&text[chunk_start..]));
    Cow::Owned(out)
}

fn decode_chunk(chunk: &str) -> Cow<'_, str> {
    urlencoding::decode(chunk).unwrap_or(Cow::Borrowed(chunk))
}

fn strip_hash(hash: &str) -> &str {
    hash.strip_prefix('#').unwrap_or(hash)
}
