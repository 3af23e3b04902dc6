//! Upstream target URL construction.
//!
//! Target = base + joined segments + raw query. No normalisation, decoding
//! or traversal protection is applied: segments are forwarded as-is.

use axum::http::Uri;

use crate::proxy::error::ForwardError;

/// Normalised upstream base. Always ends in `/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamBase(String);

impl UpstreamBase {
    /// Normalise a validated base URL (see `config::validation`).
    pub fn new(base_url: &str) -> Self {
        let trimmed = base_url.trim_end_matches('/');
        Self(format!("{}/", trimmed))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Render the target string for `segments` and the raw `query`.
    ///
    /// `query` excludes the leading `?`; `Some("")` still renders a bare `?`
    /// so the inbound URL is reproduced exactly.
    pub fn render(&self, segments: &[String], query: Option<&str>) -> String {
        let mut target = String::with_capacity(self.0.len() + 64);
        target.push_str(&self.0);
        target.push_str(&segments.join("/"));
        if let Some(query) = query {
            target.push('?');
            target.push_str(query);
        }
        target
    }

    /// Build the outbound URI.
    pub fn target(&self, segments: &[String], query: Option<&str>) -> Result<Uri, ForwardError> {
        let target = self.render(segments, query);
        target
            .parse::<Uri>()
            .map_err(|source| ForwardError::InvalidTarget { target, source })
    }
}

/// Split a raw path suffix into segments. An empty suffix has no segments.
pub fn split_segments(suffix: &str) -> Vec<String> {
    if suffix.is_empty() {
        Vec::new()
    } else {
        suffix.split('/').map(str::to_string).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segs(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn base_is_normalised() {
        assert_eq!(UpstreamBase::new("http://h:3018").as_str(), "http://h:3018/");
        assert_eq!(UpstreamBase::new("http://h:3018/").as_str(), "http://h:3018/");
        assert_eq!(UpstreamBase::new("http://h:3018/api//").as_str(), "http://h:3018/api/");
    }

    #[test]
    fn renders_path_and_query_verbatim() {
        let base = UpstreamBase::new("http://h:3018/");
        assert_eq!(
            base.render(&segs(&["exercicios", "unique", "7"]), Some("q=1&x=%20y")),
            "http://h:3018/exercicios/unique/7?q=1&x=%20y"
        );
        assert_eq!(base.render(&[], None), "http://h:3018/");
        assert_eq!(base.render(&segs(&["a"]), Some("")), "http://h:3018/a?");
    }

    #[test]
    fn keeps_dot_segments_and_trailing_slash() {
        let base = UpstreamBase::new("http://h:1");
        let segments = split_segments("a/../b/");
        assert_eq!(segments, segs(&["a", "..", "b", ""]));
        assert_eq!(base.render(&segments, None), "http://h:1/a/../b/");
    }

    #[test]
    fn target_parses_into_uri() {
        let base = UpstreamBase::new("http://127.0.0.1:3018/");
        let uri = base.target(&segs(&["alunos", "perfil"]), Some("id=3")).unwrap();
        assert_eq!(uri.host(), Some("127.0.0.1"));
        assert_eq!(uri.port_u16(), Some(3018));
        assert_eq!(uri.path(), "/alunos/perfil");
        assert_eq!(uri.query(), Some("id=3"));
    }

    #[test]
    fn unparseable_target_is_an_error() {
        let base = UpstreamBase::new("http://h:1/");
        let err = base.target(&segs(&["has space"]), None).unwrap_err();
        assert!(matches!(err, ForwardError::InvalidTarget { .. }));
    }

    #[test]
    fn empty_suffix_has_no_segments() {
        assert!(split_segments("").is_empty());
        assert_eq!(split_segments("x"), segs(&["x"]));
    }
}
