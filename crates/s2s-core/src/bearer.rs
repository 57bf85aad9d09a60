//! Bearer-token extraction from the upload URL.
//!
//! Some upload endpoints are handed out as a single URL with the credential in
//! a `bearer` query parameter. The token is moved into an `Authorization`
//! header and removed from the URL so it never appears on the request line.

use url::{form_urlencoded, Url};

use crate::error::ConfigError;

const BEARER_PARAM: &str = "bearer";

/// Upload URL with any `bearer` parameter removed, plus the token it carried.
#[derive(Clone, PartialEq, Eq)]
pub struct StrippedUrl {
    pub url: String,
    pub token: Option<String>,
}

impl std::fmt::Debug for StrippedUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StrippedUrl")
            .field("url", &self.url)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Splits the `bearer` query parameter off `upload_url`.
///
/// The first non-empty `bearer` value is the token; every `bearer` parameter is
/// removed. Other parameters keep their order and their exact bytes, so signed
/// query strings survive. URLs without a `bearer` parameter are returned
/// unchanged.
pub fn extract_bearer(upload_url: &str) -> Result<StrippedUrl, ConfigError> {
    let trimmed = upload_url.trim();
    let mut url = Url::parse(trimmed).map_err(ConfigError::InvalidUploadUrl)?;

    let mut found = false;
    let mut token = None;
    let rest = {
        let mut kept: Vec<&str> = Vec::new();
        for segment in url.query().unwrap_or("").split('&') {
            match form_urlencoded::parse(segment.as_bytes()).next() {
                Some((k, v)) if k == BEARER_PARAM => {
                    found = true;
                    if token.is_none() && !v.is_empty() {
                        token = Some(v.into_owned());
                    }
                }
                _ => kept.push(segment),
            }
        }
        kept.join("&")
    };

    if !found {
        return Ok(StrippedUrl {
            url: trimmed.to_string(),
            token: None,
        });
    }

    url.set_query((!rest.is_empty()).then_some(rest.as_str()));
    Ok(StrippedUrl {
        url: url.into(),
        token,
    })
}
