//! Media type patterns for content negotiation.
//!
//! Routes declare what they accept (request `Content-Type`) and what
//! they produce (matched against the request `Accept` header). Accepted
//! patterns may use wildcards (`text/*`, `*/*`); produced types must be
//! concrete so a matched route always implies a definite response type.

use mime::Mime;

/// A media type pattern, possibly containing wildcards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaRange {
    inner: Mime,
}

impl MediaRange {
    /// Parses a pattern such as `application/json` or `text/*`.
    ///
    /// # Errors
    ///
    /// Returns the underlying parse error for syntactically invalid
    /// media types.
    pub fn parse(pattern: &str) -> Result<Self, mime::FromStrError> {
        pattern.trim().parse::<Mime>().map(|inner| Self { inner })
    }

    /// Returns true if this pattern covers the concrete media type.
    ///
    /// Parameters (`charset` and friends) are ignored on both sides.
    #[must_use]
    pub fn matches(&self, concrete: &Mime) -> bool {
        let type_ok = self.inner.type_() == mime::STAR || self.inner.type_() == concrete.type_();
        let subtype_ok =
            self.inner.subtype() == mime::STAR || self.inner.subtype() == concrete.subtype();
        type_ok && subtype_ok
    }

    /// Returns true if neither the type nor the subtype is a wildcard.
    #[must_use]
    pub fn is_concrete(&self) -> bool {
        self.inner.type_() != mime::STAR && self.inner.subtype() != mime::STAR
    }

    /// The pattern's `type/subtype` essence.
    #[must_use]
    pub fn essence(&self) -> &str {
        self.inner.essence_str()
    }
}

impl std::fmt::Display for MediaRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.inner.fmt(f)
    }
}

/// Checks a request `Content-Type` against a route's accepted patterns.
///
/// An empty pattern list accepts everything, and so does a request that
/// declares no content type. An unparseable declared type is accepted by
/// nothing.
pub(crate) fn content_type_accepted(accepts: &[MediaRange], content_type: Option<&str>) -> bool {
    if accepts.is_empty() {
        return true;
    }
    let Some(declared) = content_type else {
        return true;
    };
    let Ok(concrete) = declared.parse::<Mime>() else {
        return false;
    };
    accepts.iter().any(|range| range.matches(&concrete))
}

/// Checks a request `Accept` header against a route's produced types.
///
/// An empty produces list satisfies any client. An absent `Accept`
/// header, or one with no parseable entries, accepts anything.
pub(crate) fn accept_intersects(produces: &[MediaRange], accept: Option<&str>) -> bool {
    if produces.is_empty() {
        return true;
    }
    let Some(header) = accept else {
        return true;
    };

    let ranges: Vec<MediaRange> = header
        .split(',')
        .filter_map(|entry| MediaRange::parse(entry).ok())
        .collect();
    if ranges.is_empty() {
        return true;
    }

    produces.iter().any(|produced| {
        let Ok(concrete) = produced.essence().parse::<Mime>() else {
            return false;
        };
        ranges.iter().any(|range| range.matches(&concrete))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(s: &str) -> MediaRange {
        MediaRange::parse(s).unwrap()
    }

    #[test]
    fn test_concrete_match() {
        assert!(range("application/json").matches(&mime::APPLICATION_JSON));
        assert!(!range("application/json").matches(&mime::TEXT_PLAIN));
    }

    #[test]
    fn test_subtype_wildcard() {
        let r = range("text/*");
        assert!(r.matches(&mime::TEXT_PLAIN));
        assert!(r.matches(&mime::TEXT_HTML));
        assert!(!r.matches(&mime::APPLICATION_JSON));
    }

    #[test]
    fn test_full_wildcard() {
        let r = range("*/*");
        assert!(r.matches(&mime::APPLICATION_JSON));
        assert!(r.matches(&mime::TEXT_PLAIN));
    }

    #[test]
    fn test_parameters_are_ignored() {
        let declared: Mime = "application/json; charset=utf-8".parse().unwrap();
        assert!(range("application/json").matches(&declared));
    }

    #[test]
    fn test_is_concrete() {
        assert!(range("application/json").is_concrete());
        assert!(!range("text/*").is_concrete());
        assert!(!range("*/*").is_concrete());
    }

    #[test]
    fn test_content_type_accepted() {
        let accepts = vec![range("application/json"), range("text/*")];

        assert!(content_type_accepted(&accepts, Some("application/json")));
        assert!(content_type_accepted(&accepts, Some("text/csv")));
        assert!(!content_type_accepted(&accepts, Some("image/png")));
        assert!(content_type_accepted(&accepts, None));
        assert!(content_type_accepted(&[], Some("image/png")));
        assert!(!content_type_accepted(&accepts, Some("not a type")));
    }

    #[test]
    fn test_accept_intersects() {
        let produces = vec![range("application/json")];

        assert!(accept_intersects(&produces, Some("application/json")));
        assert!(accept_intersects(&produces, Some("text/html, application/*")));
        assert!(accept_intersects(&produces, Some("*/*")));
        assert!(!accept_intersects(&produces, Some("text/html")));
        assert!(accept_intersects(&produces, None));
        assert!(accept_intersects(&[], Some("text/html")));
    }

    #[test]
    fn test_unparseable_accept_header_passes() {
        let produces = vec![range("application/json")];
        assert!(accept_intersects(&produces, Some(";;;")));
    }
}
