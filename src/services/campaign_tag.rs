//! Canonical `utm_source=<value>` tags from whatever the frontend forwarded.
//!
//! Tags arrive raw (`TT-123`), as a query string (`utm_source=x&utm_medium=y`),
//! or percent-encoded once or twice. [`TagState`] names each shape and
//! [`resolve`] maps every state to exactly one action.
//!
//! A canonical tag never contains a raw `%`, `&`, `+` or `=` in its value; those
//! are written as `%25`, `%26`, `%2B`, `%3D`. That makes every canonical tag
//! classify as [`TagState::AlreadyCanonical`], so canonicalizing twice is a no-op.

use std::borrow::Cow;
use thiserror::Error;
use tracing::warn;
use url::form_urlencoded;

const SOURCE_KEY: &str = "utm_source";
const SOURCE_PREFIX: &str = "utm_source=";
const ENCODED_EQUALS: &str = "%3D";
const DOUBLE_ENCODED_EQUALS: &str = "%253D";
const VALUE_ESCAPES: [(char, &str); 4] = [('%', "%25"), ('&', "%26"), ('+', "%2B"), ('=', "%3D")];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagState {
    Absent,
    Empty,
    /// A bare identifier such as `TT-123`.
    Bare,
    /// Contains a literal `=` or `%3D`: one decode pass.
    SingleEncoded,
    /// Contains `%253D`: two decode passes.
    DoubleEncoded,
    AlreadyCanonical,
}

impl TagState {
    pub fn classify(raw: Option<&str>) -> Self {
        match raw {
            None => Self::Absent,
            Some("") => Self::Empty,
            Some(tag) if is_canonical(tag) => Self::AlreadyCanonical,
            Some(tag) if contains_escape(tag, DOUBLE_ENCODED_EQUALS) => Self::DoubleEncoded,
            Some(tag) if tag.contains('=') || contains_escape(tag, ENCODED_EQUALS) => {
                Self::SingleEncoded
            }
            Some(_) => Self::Bare,
        }
    }

    fn decode_passes(self) -> usize {
        match self {
            Self::SingleEncoded => 1,
            Self::DoubleEncoded => 2,
            _ => 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TagDecodeError {
    #[error("malformed percent escape at byte {0}")]
    MalformedEscape(usize),
    #[error("decoded bytes are not valid UTF-8")]
    InvalidUtf8,
}

/// Why a tag was kept exactly as received.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Fallback {
    #[error("could not decode campaign tag: {0}")]
    Decode(#[from] TagDecodeError),
    #[error("campaign tag has key/value pairs but no utm_source")]
    MissingSource,
}

/// Canonicalizes a tag, keeping the original on any [`Fallback`].
pub fn canonicalize(raw: Option<&str>) -> Option<String> {
    match resolve(raw) {
        Ok(tag) => tag,
        Err(fallback) => {
            warn!(
                state = ?TagState::classify(raw),
                reason = %fallback,
                "keeping campaign tag as received"
            );
            raw.map(str::to_owned)
        }
    }
}

pub fn resolve(raw: Option<&str>) -> Result<Option<String>, Fallback> {
    let state = TagState::classify(raw);
    let Some(tag) = raw else {
        return Ok(None);
    };

    let resolved = match state {
        TagState::Absent => return Ok(None),
        TagState::Empty | TagState::AlreadyCanonical => tag.to_owned(),
        TagState::Bare => render(tag),
        TagState::SingleEncoded | TagState::DoubleEncoded => {
            let mut decoded = Cow::Borrowed(tag);
            for _ in 0..state.decode_passes() {
                decoded = Cow::Owned(percent_decode(&decoded)?);
            }
            extract_source(&decoded)?
        }
    };

    Ok(Some(resolved))
}

// A `=` without a utm_source key is left alone rather than prefixed.
fn extract_source(decoded: &str) -> Result<String, Fallback> {
    let query = decoded.strip_prefix('?').unwrap_or(decoded);
    form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| *key == SOURCE_KEY)
        .map(|(_, value)| value)
        .filter(|value| !value.is_empty())
        .map(|value| render(&value))
        .ok_or(Fallback::MissingSource)
}

fn render(value: &str) -> String {
    let mut tag = String::with_capacity(SOURCE_PREFIX.len() + value.len());
    tag.push_str(SOURCE_PREFIX);
    for ch in value.chars() {
        match VALUE_ESCAPES.iter().find(|(reserved, _)| *reserved == ch) {
            Some((_, escape)) => tag.push_str(escape),
            None => tag.push(ch),
        }
    }
    tag
}

fn is_canonical(tag: &str) -> bool {
    let Some(mut rest) = tag.strip_prefix(SOURCE_PREFIX) else {
        return false;
    };
    if rest.is_empty() {
        return false;
    }

    while let Some(at) = rest.find(|c: char| VALUE_ESCAPES.iter().any(|(reserved, _)| *reserved == c)) {
        let tail = &rest[at..];
        match VALUE_ESCAPES.iter().find(|(_, escape)| tail.starts_with(escape)) {
            Some((_, escape)) => rest = &tail[escape.len()..],
            None => return false,
        }
    }
    true
}

fn contains_escape(haystack: &str, escape: &str) -> bool {
    haystack
        .as_bytes()
        .windows(escape.len())
        .any(|window| window.eq_ignore_ascii_case(escape.as_bytes()))
}

/// Strict percent-decoding: a `%` must start a two-hex-digit escape.
fn percent_decode(input: &str) -> Result<String, TagDecodeError> {
    let bytes = input.as_bytes();
    let mut from = 0;
    while let Some(offset) = bytes[from..].iter().position(|&b| b == b'%') {
        let at = from + offset;
        let well_formed = bytes
            .get(at + 1..at + 3)
            .is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit));
        if !well_formed {
            return Err(TagDecodeError::MalformedEscape(at));
        }
        from = at + 3;
    }

    urlencoding::decode(input)
        .map(Cow::into_owned)
        .map_err(|_| TagDecodeError::InvalidUtf8)
}
