//! Path normalization, registration keys, and `:name` template matching.

use http::Method;

use crate::error::InsertError;

/// Joins a method and a path into one registration key. A space can never
/// appear in a path taken from a parsed `http::Uri`, so the key is
/// unambiguous.
pub(crate) const KEY_SEPARATOR: char = ' ';

/// Normalizes a route or request path: ensures a leading `/` and strips a
/// single trailing `/` (the root path stays `/`).
///
/// Applied identically at registration time and at request time; the two
/// sides must agree or routes silently never match.
pub(crate) fn normalize(path: &str) -> String {
    let mut path = if path.starts_with('/') {
        path.to_owned()
    } else {
        format!("/{path}")
    };
    if path.len() > 1 && path.ends_with('/') {
        path.pop();
    }
    path
}

/// Builds the registration key for a normalized path: `METHOD path` when
/// method-scoped, the bare path when method-agnostic.
pub(crate) fn route_key(method: Option<&Method>, path: &str) -> String {
    match method {
        Some(method) => format!("{method}{KEY_SEPARATOR}{path}"),
        None => path.to_owned(),
    }
}

/// Returns `true` if the normalized path contains at least one `:name`
/// segment (colon directly after a slash, non-empty name).
pub(crate) fn is_template(path: &str) -> bool {
    path.split('/').any(|segment| is_param(segment).is_some())
}

fn is_param(segment: &str) -> Option<&str> {
    segment.strip_prefix(':').filter(|name| !name.is_empty())
}

#[derive(Debug)]
enum Segment {
    Literal(String),
    Param(String),
}

/// A registered route whose path contains `:name` segments, pre-split for
/// per-request matching. Kept in registration order by the router.
#[derive(Debug)]
pub(crate) struct Template {
    /// The registration key this template was filed under, used to resolve
    /// its handlers once it matches.
    pub(crate) name: String,
    method: Option<Method>,
    segments: Vec<Segment>,
}

impl Template {
    /// Splits a normalized path into a template, validating that parameter
    /// names are unique within it.
    pub(crate) fn parse(
        name: String,
        method: Option<Method>,
        path: &str,
    ) -> Result<Self, InsertError> {
        let mut segments = Vec::new();
        let mut seen = Vec::new();
        for segment in path[1..].split('/') {
            match is_param(segment) {
                Some(param) => {
                    if seen.contains(&param) {
                        return Err(InsertError::DuplicateParam {
                            route: path.to_owned(),
                            name: param.to_owned(),
                        });
                    }
                    seen.push(param);
                    segments.push(Segment::Param(param.to_owned()));
                }
                None => segments.push(Segment::Literal(segment.to_owned())),
            }
        }
        Ok(Self {
            name,
            method,
            segments,
        })
    }

    /// Matches a normalized request path against this template.
    ///
    /// The request must pass the method gate (if the template is
    /// method-scoped) and have exactly as many segments as the template;
    /// literal segments compare by equality and `:name` segments always
    /// match, capturing the corresponding request segment. Returns the
    /// captures on a match.
    pub(crate) fn matches(&self, method: &Method, path: &str) -> Option<Vec<(String, String)>> {
        if self.method.as_ref().is_some_and(|m| m != method) {
            return None;
        }
        let request: Vec<&str> = path[1..].split('/').collect();
        if request.len() != self.segments.len() {
            return None;
        }
        let mut captures = Vec::new();
        for (segment, part) in self.segments.iter().zip(&request) {
            match segment {
                Segment::Literal(literal) if literal == part => {}
                Segment::Literal(_) => return None,
                Segment::Param(name) => captures.push((name.clone(), (*part).to_owned())),
            }
        }
        Some(captures)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_paths() {
        // input, normalized
        let cases = [
            ("/", "/"),
            ("", "/"),
            ("home", "/home"),
            ("/home", "/home"),
            ("/home/", "/home"),
            ("home/", "/home"),
            ("/a/b/", "/a/b"),
        ];
        for (input, expected) in cases {
            assert_eq!(normalize(input), expected, "{input}");
            // idempotent
            assert_eq!(normalize(expected), expected, "{expected}");
        }
        // only one trailing slash is stripped per pass
        assert_eq!(normalize("/a/b//"), "/a/b/");
    }

    #[test]
    fn keys() {
        assert_eq!(route_key(None, "/home"), "/home");
        assert_eq!(route_key(Some(&Method::GET), "/home"), "GET /home");
    }

    #[test]
    fn template_detection() {
        assert!(is_template("/user/:id"));
        assert!(is_template("/:id"));
        assert!(!is_template("/user"));
        assert!(!is_template("/"));
        // a lone colon has no name and is a literal segment
        assert!(!is_template("/user/:"));
        // colon must come directly after a slash
        assert!(!is_template("/user/x:y"));
    }

    #[test]
    fn template_matching() {
        let t = Template::parse("/user/:id".into(), None, "/user/:id").unwrap();
        assert_eq!(
            t.matches(&Method::GET, "/user/42"),
            Some(vec![("id".to_owned(), "42".to_owned())])
        );
        // segment count must be exact in both directions
        assert_eq!(t.matches(&Method::GET, "/user"), None);
        assert_eq!(t.matches(&Method::GET, "/user/42/extra"), None);
        assert_eq!(t.matches(&Method::GET, "/item/42"), None);
    }

    #[test]
    fn template_method_gate() {
        let t =
            Template::parse("POST /user/:id".into(), Some(Method::POST), "/user/:id").unwrap();
        assert!(t.matches(&Method::POST, "/user/42").is_some());
        assert!(t.matches(&Method::GET, "/user/42").is_none());

        let any = Template::parse("/user/:id".into(), None, "/user/:id").unwrap();
        assert!(any.matches(&Method::DELETE, "/user/42").is_some());
    }

    #[test]
    fn duplicate_params_rejected() {
        let err = Template::parse("/a/:id/:id".into(), None, "/a/:id/:id").unwrap_err();
        assert_eq!(
            err,
            InsertError::DuplicateParam {
                route: "/a/:id/:id".to_owned(),
                name: "id".to_owned(),
            }
        );
    }
}
