//! Key paths and merge operations over nested YAML values
//!
//! Every store addresses its values with dotted key paths such as
//! `deployment.plugins.alerts`. This module parses those paths into
//! segments; the [`yaml`] submodule walks, writes and deep-merges nested
//! `serde_yaml::Value` trees with them.
//!
//! ## Path grammar
//!
//! - Dot notation: `path.config`
//! - Bracket notation: `labels["app.kubernetes.io/name"]` or `labels['x']`
//! - Sequence indices: `args[0]`
//! - Escaped dots: `foo\.bar` (literal dot inside one key)

pub mod yaml;

/// A segment in a key path
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PathSegment {
    /// A named key for accessing mapping members
    Key(String),
    /// A numeric index for accessing sequence elements
    Index(usize),
}

impl PathSegment {
    /// The segment rendered back into dotted-key form.
    pub fn as_key(&self) -> String {
        match self {
            PathSegment::Key(key) => key.clone(),
            PathSegment::Index(idx) => idx.to_string(),
        }
    }
}

/// Parse a key path into segments.
///
/// # Examples
///
/// ```
/// use microbs::merge::{parse_path, PathSegment};
///
/// let segments = parse_path("args[0].name");
/// assert_eq!(segments.len(), 3);
/// assert_eq!(segments[1], PathSegment::Index(0));
/// ```
pub fn parse_path(path: &str) -> Vec<PathSegment> {
    if path.trim().is_empty() {
        return Vec::new();
    }

    let mut segments = Vec::new();
    let mut current = String::new();
    let mut chars = path.chars().peekable();
    let mut escaped = false;

    while let Some(ch) = chars.next() {
        if escaped {
            current.push(ch);
            escaped = false;
            continue;
        }

        match ch {
            '\\' => escaped = true,
            '.' => {
                if !current.is_empty() {
                    segments.push(PathSegment::Key(std::mem::take(&mut current)));
                }
            }
            '[' => {
                if !current.is_empty() {
                    segments.push(PathSegment::Key(std::mem::take(&mut current)));
                }

                match chars.peek().copied() {
                    Some(quote @ ('"' | '\'')) => {
                        chars.next();
                        let mut key = String::new();
                        let mut bracket_escaped = false;
                        while let Some(ch) = chars.next() {
                            if bracket_escaped {
                                key.push(ch);
                                bracket_escaped = false;
                            } else if ch == '\\' {
                                bracket_escaped = true;
                            } else if ch == quote && chars.peek() == Some(&']') {
                                chars.next();
                                break;
                            } else {
                                key.push(ch);
                            }
                        }
                        segments.push(PathSegment::Key(key));
                    }
                    _ => {
                        let mut content = String::new();
                        for next in chars.by_ref() {
                            if next == ']' {
                                break;
                            }
                            content.push(next);
                        }
                        let content = content.trim();
                        if let Ok(idx) = content.parse::<usize>() {
                            segments.push(PathSegment::Index(idx));
                        } else if !content.is_empty() {
                            segments.push(PathSegment::Key(content.to_string()));
                        }
                    }
                }
            }
            _ => current.push(ch),
        }
    }

    if !current.is_empty() {
        segments.push(PathSegment::Key(current));
    }

    segments
}

/// Join segments back into the dotted form used as a flattened key.
///
/// Bracketed and escaped keys lose their quoting: `a["b.c"]` becomes
/// `a.b.c`, matching what flattening a document with that key produces.
pub fn join_path(segments: &[PathSegment]) -> String {
    segments
        .iter()
        .map(PathSegment::as_key)
        .collect::<Vec<_>>()
        .join(".")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_path_simple_dot_notation() {
        let segments = parse_path("deployment.plugins.alerts");
        assert_eq!(
            segments,
            vec![
                PathSegment::Key("deployment".to_string()),
                PathSegment::Key("plugins".to_string()),
                PathSegment::Key("alerts".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_path_sequence_index() {
        let segments = parse_path("args[1]");
        assert_eq!(
            segments,
            vec![PathSegment::Key("args".to_string()), PathSegment::Index(1)]
        );
    }

    #[test]
    fn test_parse_path_quoted_key() {
        let segments = parse_path(r#"labels["app.kubernetes.io/name"]"#);
        assert_eq!(segments.len(), 2);
        assert_eq!(
            segments[1],
            PathSegment::Key("app.kubernetes.io/name".to_string())
        );
    }

    #[test]
    fn test_parse_path_single_quoted_key_with_escape() {
        let segments = parse_path(r"labels['it\'s']");
        assert_eq!(segments[1], PathSegment::Key("it's".to_string()));
    }

    #[test]
    fn test_parse_path_escaped_dot() {
        let segments = parse_path(r"foo\.bar.baz");
        assert_eq!(
            segments,
            vec![
                PathSegment::Key("foo.bar".to_string()),
                PathSegment::Key("baz".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_path_empty() {
        assert!(parse_path("").is_empty());
        assert!(parse_path("   ").is_empty());
    }

    #[test]
    fn test_parse_path_skips_empty_segments() {
        assert_eq!(parse_path("a..b"), parse_path("a.b"));
    }

    #[test]
    fn test_join_path() {
        assert_eq!(join_path(&parse_path("a.b[2]")), "a.b.2");
        assert_eq!(join_path(&parse_path(r#"a["b.c"]"#)), "a.b.c");
        assert_eq!(join_path(&[]), "");
    }
}
