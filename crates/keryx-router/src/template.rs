//! URL template parsing and matching.
//!
//! A template is a `/`-separated pattern where each segment is either a
//! literal or a single placeholder:
//!
//! - `{name}` captures exactly one non-empty path segment
//! - `{name<regex>}` additionally requires the decoded value to match
//!   the anchored constraint
//! - `{name*}` captures the rest of the path verbatim, slashes included,
//!   and must be the final segment
//!
//! Templates are compiled once at registration. Matching is anchored:
//! the whole path must be consumed, and a trailing slash is significant
//! (`/a` and `/a/` are different paths).

use regex::Regex;
use thiserror::Error;

use crate::params::PathParams;

/// Error raised while compiling a URL template.
///
/// These are registration-time failures; a template that parses can
/// never fail at request time.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// The template did not start with `/`.
    #[error("template must start with '/': '{0}'")]
    MissingLeadingSlash(String),

    /// A segment mixed braces with literal text or left a brace unclosed.
    #[error("unbalanced braces in segment '{segment}'")]
    UnbalancedBraces {
        /// The offending segment.
        segment: String,
    },

    /// A placeholder name was empty or contained invalid characters.
    #[error("invalid placeholder name '{name}'")]
    InvalidName {
        /// The offending name.
        name: String,
    },

    /// The same placeholder name appeared twice.
    #[error("duplicate placeholder name '{name}'")]
    DuplicateName {
        /// The repeated name.
        name: String,
    },

    /// A greedy placeholder appeared before the final segment.
    #[error("greedy placeholder '{name}' must be the last segment")]
    GreedyNotLast {
        /// The greedy placeholder's name.
        name: String,
    },

    /// An inline constraint failed to compile.
    #[error("invalid constraint for placeholder '{name}'")]
    InvalidConstraint {
        /// The placeholder whose constraint is broken.
        name: String,
        /// The regex compiler's diagnosis.
        #[source]
        source: regex::Error,
    },
}

/// One compiled template segment.
#[derive(Debug, Clone)]
pub(crate) enum TemplateSegment {
    /// Matches the decoded request segment exactly.
    Literal(String),
    /// Captures one non-empty decoded segment, optionally constrained.
    Placeholder {
        name: String,
        constraint: Option<Regex>,
    },
    /// Captures the raw remainder of the path.
    Greedy { name: String },
}

/// A compiled, immutable URL template.
#[derive(Debug, Clone)]
pub struct UrlTemplate {
    raw: String,
    segments: Vec<TemplateSegment>,
    placeholder_count: usize,
}

impl UrlTemplate {
    /// Compiles a template string.
    ///
    /// # Errors
    ///
    /// Returns a [`TemplateError`] for malformed input: missing leading
    /// slash, stray braces, invalid or duplicate placeholder names, a
    /// non-final greedy placeholder, or an uncompilable constraint.
    pub fn parse(template: &str) -> Result<Self, TemplateError> {
        let Some(rest) = template.strip_prefix('/') else {
            return Err(TemplateError::MissingLeadingSlash(template.to_string()));
        };

        let mut segments: Vec<TemplateSegment> = Vec::new();
        let raw_segments: Vec<&str> = rest.split('/').collect();
        let last_index = raw_segments.len() - 1;

        for (index, raw) in raw_segments.iter().enumerate() {
            let segment = Self::parse_segment(raw)?;

            if let TemplateSegment::Placeholder { name, .. } | TemplateSegment::Greedy { name } =
                &segment
            {
                let duplicate = segments.iter().any(|s| match s {
                    TemplateSegment::Literal(_) => false,
                    TemplateSegment::Placeholder { name: n, .. }
                    | TemplateSegment::Greedy { name: n } => n == name,
                });
                if duplicate {
                    return Err(TemplateError::DuplicateName { name: name.clone() });
                }
                if matches!(segment, TemplateSegment::Greedy { .. }) && index != last_index {
                    return Err(TemplateError::GreedyNotLast { name: name.clone() });
                }
            }

            segments.push(segment);
        }

        let placeholder_count = segments
            .iter()
            .filter(|s| !matches!(s, TemplateSegment::Literal(_)))
            .count();

        Ok(Self {
            raw: template.to_string(),
            segments,
            placeholder_count,
        })
    }

    fn parse_segment(raw: &str) -> Result<TemplateSegment, TemplateError> {
        if !raw.contains(['{', '}']) {
            return Ok(TemplateSegment::Literal(raw.to_string()));
        }

        let inner = raw
            .strip_prefix('{')
            .and_then(|s| s.strip_suffix('}'))
            .ok_or_else(|| TemplateError::UnbalancedBraces {
                segment: raw.to_string(),
            })?;

        if let Some(name) = inner.strip_suffix('*') {
            if !inner.contains('<') {
                Self::check_name(name)?;
                return Ok(TemplateSegment::Greedy {
                    name: name.to_string(),
                });
            }
        }

        if let Some((name, tail)) = inner.split_once('<') {
            Self::check_name(name)?;
            let pattern = tail
                .strip_suffix('>')
                .ok_or_else(|| TemplateError::UnbalancedBraces {
                    segment: raw.to_string(),
                })?;
            let constraint = Regex::new(&format!("^(?:{pattern})$")).map_err(|source| {
                TemplateError::InvalidConstraint {
                    name: name.to_string(),
                    source,
                }
            })?;
            return Ok(TemplateSegment::Placeholder {
                name: name.to_string(),
                constraint: Some(constraint),
            });
        }

        Self::check_name(inner)?;
        Ok(TemplateSegment::Placeholder {
            name: inner.to_string(),
            constraint: None,
        })
    }

    fn check_name(name: &str) -> Result<(), TemplateError> {
        let valid = !name.is_empty()
            && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
        if valid {
            Ok(())
        } else {
            Err(TemplateError::InvalidName {
                name: name.to_string(),
            })
        }
    }

    /// Matches a concrete request path against the template.
    ///
    /// Returns the captured placeholder values on success, `None` on any
    /// mismatch. Non-greedy captures are percent-decoded; a greedy
    /// capture is the raw remainder of the path, verbatim.
    #[must_use]
    pub fn capture(&self, path: &str) -> Option<PathParams> {
        let normalized = path.strip_prefix('/').unwrap_or(path);
        let raw: Vec<&str> = normalized.split('/').collect();

        let greedy_tail = matches!(self.segments.last(), Some(TemplateSegment::Greedy { .. }));
        if greedy_tail {
            if raw.len() < self.segments.len() {
                return None;
            }
        } else if raw.len() != self.segments.len() {
            return None;
        }

        let mut params = PathParams::new();
        for (index, segment) in self.segments.iter().enumerate() {
            match segment {
                TemplateSegment::Literal(expected) => {
                    let decoded = urlencoding::decode(raw[index]).ok()?;
                    if decoded != *expected {
                        return None;
                    }
                }
                TemplateSegment::Placeholder { name, constraint } => {
                    let decoded = urlencoding::decode(raw[index]).ok()?;
                    if decoded.is_empty() {
                        return None;
                    }
                    if let Some(re) = constraint {
                        if !re.is_match(&decoded) {
                            return None;
                        }
                    }
                    params.push(name.clone(), decoded.into_owned());
                }
                TemplateSegment::Greedy { name } => {
                    params.push(name.clone(), raw[index..].join("/"));
                }
            }
        }

        Some(params)
    }

    /// Rebuilds a concrete path by substituting placeholder values.
    ///
    /// `lookup` supplies the value for each placeholder name. Non-greedy
    /// values are percent-encoded; a greedy value is substituted
    /// verbatim so embedded slashes survive. Returns the name of the
    /// first placeholder `lookup` could not supply.
    pub fn expand<'v, F>(&self, mut lookup: F) -> Result<String, String>
    where
        F: FnMut(&str) -> Option<&'v str>,
    {
        let mut rendered: Vec<String> = Vec::with_capacity(self.segments.len());
        for segment in &self.segments {
            match segment {
                TemplateSegment::Literal(lit) => rendered.push(lit.clone()),
                TemplateSegment::Placeholder { name, .. } => {
                    let value = lookup(name).ok_or_else(|| name.clone())?;
                    rendered.push(urlencoding::encode(value).into_owned());
                }
                TemplateSegment::Greedy { name } => {
                    let value = lookup(name).ok_or_else(|| name.clone())?;
                    rendered.push(value.to_string());
                }
            }
        }
        Ok(format!("/{}", rendered.join("/")))
    }

    /// The template text as written at registration.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Number of placeholders, greedy included.
    #[must_use]
    pub const fn placeholder_count(&self) -> usize {
        self.placeholder_count
    }

    /// Placeholder names in template order.
    pub fn placeholder_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            TemplateSegment::Literal(_) => None,
            TemplateSegment::Placeholder { name, .. } | TemplateSegment::Greedy { name } => {
                Some(name.as_str())
            }
        })
    }

    /// Returns true if the template declares this placeholder.
    #[must_use]
    pub fn has_placeholder(&self, name: &str) -> bool {
        self.placeholder_names().any(|n| n == name)
    }
}

impl PartialEq for UrlTemplate {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl Eq for UrlTemplate {}

impl std::fmt::Display for UrlTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_template_matches_exact_path() {
        let t = UrlTemplate::parse("/users/all").unwrap();
        assert!(t.capture("/users/all").is_some());
        assert!(t.capture("/users").is_none());
        assert!(t.capture("/users/all/extra").is_none());
    }

    #[test]
    fn test_trailing_slash_is_significant() {
        let t = UrlTemplate::parse("/users").unwrap();
        assert!(t.capture("/users").is_some());
        assert!(t.capture("/users/").is_none());

        let slashed = UrlTemplate::parse("/users/").unwrap();
        assert!(slashed.capture("/users/").is_some());
        assert!(slashed.capture("/users").is_none());
    }

    #[test]
    fn test_root_template() {
        let t = UrlTemplate::parse("/").unwrap();
        assert!(t.capture("/").is_some());
        assert!(t.capture("/x").is_none());
    }

    #[test]
    fn test_placeholder_captures_decoded_segment() {
        let t = UrlTemplate::parse("/users/{id}").unwrap();
        let params = t.capture("/users/u%2042").unwrap();
        assert_eq!(params.get("id"), Some("u 42"));
    }

    #[test]
    fn test_placeholder_rejects_empty_segment() {
        let t = UrlTemplate::parse("/users/{id}").unwrap();
        assert!(t.capture("/users/").is_none());
    }

    #[test]
    fn test_placeholder_does_not_span_segments() {
        let t = UrlTemplate::parse("/users/{id}").unwrap();
        assert!(t.capture("/users/1/posts").is_none());
    }

    #[test]
    fn test_constraint_limits_matches() {
        let t = UrlTemplate::parse("/orders/{id<[0-9]+>}").unwrap();
        assert_eq!(t.capture("/orders/42").unwrap().get("id"), Some("42"));
        assert!(t.capture("/orders/abc").is_none());
    }

    #[test]
    fn test_constraint_is_anchored() {
        let t = UrlTemplate::parse("/orders/{id<[0-9]+>}").unwrap();
        assert!(t.capture("/orders/42x").is_none());
        assert!(t.capture("/orders/x42").is_none());
    }

    #[test]
    fn test_constraint_may_contain_braces() {
        let t = UrlTemplate::parse("/years/{y<[0-9]{4}>}").unwrap();
        assert_eq!(t.capture("/years/2024").unwrap().get("y"), Some("2024"));
        assert!(t.capture("/years/24").is_none());
    }

    #[test]
    fn test_greedy_captures_remainder_verbatim() {
        let t = UrlTemplate::parse("/files/{path*}").unwrap();
        let params = t.capture("/files/docs/a%20b/readme.md").unwrap();
        assert_eq!(params.get("path"), Some("docs/a%20b/readme.md"));
    }

    #[test]
    fn test_greedy_matches_empty_remainder() {
        let t = UrlTemplate::parse("/files/{path*}").unwrap();
        assert_eq!(t.capture("/files/").unwrap().get("path"), Some(""));
        assert!(t.capture("/files").is_none());
    }

    #[test]
    fn test_mixed_literal_and_placeholders() {
        let t = UrlTemplate::parse("/api/{version}/users/{id}").unwrap();
        let params = t.capture("/api/v2/users/7").unwrap();
        assert_eq!(params.get("version"), Some("v2"));
        assert_eq!(params.get("id"), Some("7"));
        assert_eq!(params.iter().count(), 2);
    }

    #[test]
    fn test_invalid_percent_encoding_never_matches() {
        let t = UrlTemplate::parse("/users/{id}").unwrap();
        assert!(t.capture("/users/%ff%fe").is_none());
    }

    #[test]
    fn test_parse_rejects_missing_leading_slash() {
        assert!(matches!(
            UrlTemplate::parse("users/{id}"),
            Err(TemplateError::MissingLeadingSlash(_))
        ));
    }

    #[test]
    fn test_parse_rejects_unbalanced_braces() {
        assert!(matches!(
            UrlTemplate::parse("/users/{id"),
            Err(TemplateError::UnbalancedBraces { .. })
        ));
        assert!(matches!(
            UrlTemplate::parse("/users/id}"),
            Err(TemplateError::UnbalancedBraces { .. })
        ));
        assert!(matches!(
            UrlTemplate::parse("/users/x{id}"),
            Err(TemplateError::UnbalancedBraces { .. })
        ));
    }

    #[test]
    fn test_parse_rejects_invalid_names() {
        assert!(matches!(
            UrlTemplate::parse("/users/{}"),
            Err(TemplateError::InvalidName { .. })
        ));
        assert!(matches!(
            UrlTemplate::parse("/users/{user-id}"),
            Err(TemplateError::InvalidName { .. })
        ));
    }

    #[test]
    fn test_parse_rejects_duplicate_names() {
        assert!(matches!(
            UrlTemplate::parse("/a/{id}/b/{id}"),
            Err(TemplateError::DuplicateName { .. })
        ));
    }

    #[test]
    fn test_parse_rejects_greedy_before_last_segment() {
        assert!(matches!(
            UrlTemplate::parse("/files/{path*}/meta"),
            Err(TemplateError::GreedyNotLast { .. })
        ));
    }

    #[test]
    fn test_parse_rejects_bad_constraint() {
        assert!(matches!(
            UrlTemplate::parse("/orders/{id<[>}"),
            Err(TemplateError::InvalidConstraint { .. })
        ));
    }

    #[test]
    fn test_placeholder_count_and_names() {
        let t = UrlTemplate::parse("/api/{version}/files/{path*}").unwrap();
        assert_eq!(t.placeholder_count(), 2);
        let names: Vec<_> = t.placeholder_names().collect();
        assert_eq!(names, vec!["version", "path"]);
        assert!(t.has_placeholder("version"));
        assert!(!t.has_placeholder("id"));
    }

    #[test]
    fn test_expand_encodes_values() {
        let t = UrlTemplate::parse("/users/{id}").unwrap();
        let path = t
            .expand(|name| (name == "id").then_some("u 42"))
            .unwrap();
        assert_eq!(path, "/users/u%2042");
    }

    #[test]
    fn test_expand_leaves_greedy_verbatim() {
        let t = UrlTemplate::parse("/files/{path*}").unwrap();
        let path = t
            .expand(|name| (name == "path").then_some("docs/a b/readme.md"))
            .unwrap();
        assert_eq!(path, "/files/docs/a b/readme.md");
    }

    #[test]
    fn test_expand_reports_missing_placeholder() {
        let t = UrlTemplate::parse("/users/{id}").unwrap();
        let err = t.expand(|_| None).unwrap_err();
        assert_eq!(err, "id");
    }

    #[test]
    fn test_expand_then_capture_round_trips() {
        let t = UrlTemplate::parse("/api/{version}/users/{id}").unwrap();
        let path = t
            .expand(|name| match name {
                "version" => Some("v 1"),
                "id" => Some("7"),
                _ => None,
            })
            .unwrap();

        let params = t.capture(&path).unwrap();
        assert_eq!(params.get("version"), Some("v 1"));
        assert_eq!(params.get("id"), Some("7"));
    }
}
