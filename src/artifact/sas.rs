//! Shared-access-token pre-flight validation
//!
//! Artifact URLs may embed a shared access signature in their query string.
//! Before any download attempt the embedded token is checked locally: a URL
//! carrying a `sig` parameter must also carry a parseable `se` expiry that
//! has not passed. URLs without a token are public and always pass.

use crate::error::{CairnError, CairnResult};
use chrono::{DateTime, NaiveDate, Utc};
use url::Url;

/// Validate the access token embedded in a URL, if any
pub fn validate(url: &Url) -> CairnResult<()> {
    let mut has_sig = false;
    let mut expiry_raw: Option<String> = None;

    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "sig" => has_sig = true,
            "se" => expiry_raw = Some(value.into_owned()),
            _ => {}
        }
    }

    if !has_sig {
        return Ok(());
    }

    let raw = expiry_raw.ok_or_else(|| CairnError::TokenInvalid {
        reason: "token has no expiry (se) parameter".to_string(),
    })?;

    let expiry = parse_expiry(&raw).ok_or_else(|| CairnError::TokenInvalid {
        reason: format!("unparseable expiry '{}'", raw),
    })?;

    // 60 second buffer so a token cannot expire mid-download
    if Utc::now() >= expiry - chrono::Duration::seconds(60) {
        return Err(CairnError::TokenExpired { expired_at: raw });
    }

    Ok(())
}

/// Parse an `se` value: full RFC 3339 timestamp or bare date (midnight UTC)
fn parse_expiry(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
    Some(date.and_hms_opt(0, 0, 0)?.and_utc())
}
