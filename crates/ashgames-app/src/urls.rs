// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use url::Url;

const DEFAULT_SCHEME_PREFIX: &str = "https://";
const PRETTY_PATH_CHARS: usize = 20;
const ELLIPSIS: &str = "…";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlRejection {
    Empty,
    UnsafeScheme(String),
    Malformed,
}

impl std::fmt::Display for UrlRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => f.write_str("url is empty"),
            Self::UnsafeScheme(scheme) => {
                write!(f, "url scheme {scheme:?} is not allowed; use http or https")
            }
            Self::Malformed => f.write_str("url is not a valid web address"),
        }
    }
}

impl std::error::Error for UrlRejection {}

/// Normalizes user input into an absolute http(s) URL.
///
/// Bare hosts such as `example.com` get `https://` prepended. Any other
/// explicit scheme is rejected, so `javascript:` and `data:` payloads never
/// reach storage.
pub fn sanitize_url(input: &str) -> Result<String, UrlRejection> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(UrlRejection::Empty);
    }

    let candidate = match explicit_scheme(trimmed) {
        Some((scheme, rest)) => {
            let lowered = scheme.to_ascii_lowercase();
            if lowered != "http" && lowered != "https" {
                return Err(UrlRejection::UnsafeScheme(lowered));
            }
            if !rest.starts_with("//") {
                return Err(UrlRejection::Malformed);
            }
            trimmed.to_owned()
        }
        None => format!("{DEFAULT_SCHEME_PREFIX}{trimmed}"),
    };

    let parsed = Url::parse(&candidate).map_err(|_| UrlRejection::Malformed)?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(UrlRejection::UnsafeScheme(parsed.scheme().to_owned()));
    }
    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(UrlRejection::Malformed);
    }
    Ok(parsed.to_string())
}

/// Host without a leading `www.`, followed by the path cut to 20 characters.
pub fn pretty_url(raw: &str) -> String {
    let Ok(parsed) = Url::parse(raw) else {
        return raw.to_owned();
    };
    let Some(host) = parsed.host_str() else {
        return raw.to_owned();
    };

    let host = host.strip_prefix("www.").unwrap_or(host);
    let mut pretty = match parsed.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_owned(),
    };

    let path = parsed.path();
    if path.chars().count() > PRETTY_PATH_CHARS {
        pretty.extend(path.chars().take(PRETTY_PATH_CHARS));
        pretty.push_str(ELLIPSIS);
    } else {
        pretty.push_str(path);
    }
    pretty
}

// `host:port` is not a scheme; `name:` followed by anything else is.
fn explicit_scheme(input: &str) -> Option<(&str, &str)> {
    let colon = input.find(':')?;
    let (scheme, rest) = (&input[..colon], &input[colon + 1..]);

    let mut chars = scheme.chars();
    let first = chars.next()?;
    if !first.is_ascii_alphabetic()
        || !chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
    {
        return None;
    }

    if !rest.starts_with("//") {
        let digits = rest.chars().take_while(char::is_ascii_digit).count();
        let after_port = &rest[digits..];
        if digits > 0
            && (after_port.is_empty() || after_port.starts_with(['/', '?', '#']))
        {
            return None;
        }
    }

    Some((scheme, rest))
}
