//! Radix tree node implementation.
//!
//! Each node owns one pattern segment. Static children are kept sorted so
//! lookups can binary search; a node has at most one capture child and at
//! most one catch-all child.

use crate::method_router::MethodRouter;
use crate::params::Params;
use crate::pattern::{self, Segment};
use crate::RouteError;

/// A node in the radix tree.
#[derive(Debug, Clone)]
pub struct Node {
    /// The segment this node represents.
    pub segment: Segment,

    /// Methods registered for the pattern ending at this node.
    pub methods: Option<MethodRouter>,

    /// Static children, sorted by literal.
    pub static_children: Vec<Node>,

    /// Capture child (`{id}` / `:id`).
    pub capture_child: Option<Box<Node>>,

    /// Catch-all child (`*path`), always a leaf.
    pub catch_all_child: Option<Box<Node>>,
}

impl Node {
    /// Creates a node for `segment` with no children.
    #[must_use]
    pub fn new(segment: Segment) -> Self {
        Self {
            segment,
            methods: None,
            static_children: Vec::new(),
            capture_child: None,
            catch_all_child: None,
        }
    }

    /// Creates a root node for the tree.
    #[must_use]
    pub fn root() -> Self {
        Self::new(Segment::Static(String::new()))
    }

    /// Inserts a route pattern into the tree.
    ///
    /// # Errors
    ///
    /// Returns a [`RouteError`] if the pattern is malformed or if it names a
    /// capture differently from an already registered pattern at the same
    /// position.
    pub fn insert(&mut self, path: &str, methods: MethodRouter) -> Result<(), RouteError> {
        let segments = pattern::parse(path)?;
        self.insert_segments(path, &segments, methods)
    }

    fn insert_segments(
        &mut self,
        path: &str,
        segments: &[Segment],
        methods: MethodRouter,
    ) -> Result<(), RouteError> {
        let Some((segment, remaining)) = segments.split_first() else {
            match &mut self.methods {
                Some(existing) => existing.merge(methods),
                None => self.methods = Some(methods),
            }
            return Ok(());
        };

        match segment {
            Segment::Static(literal) => {
                let index = match self
                    .static_children
                    .binary_search_by(|c| static_literal(c).cmp(literal.as_str()))
                {
                    Ok(index) => index,
                    Err(index) => {
                        self.static_children
                            .insert(index, Node::new(segment.clone()));
                        index
                    }
                };
                self.static_children[index].insert_segments(path, remaining, methods)
            }
            Segment::Capture(name) => {
                let child = self
                    .capture_child
                    .get_or_insert_with(|| Box::new(Node::new(segment.clone())));
                check_same_name(&child.segment, name, path)?;
                child.insert_segments(path, remaining, methods)
            }
            Segment::CatchAll(name) => {
                let child = self
                    .catch_all_child
                    .get_or_insert_with(|| Box::new(Node::new(segment.clone())));
                check_same_name(&child.segment, name, path)?;
                child.insert_segments(path, remaining, methods)
            }
        }
    }

    /// Matches a request path against the tree.
    ///
    /// Returns the method router and captured parameters if found.
    #[must_use]
    pub fn match_path(&self, path: &str) -> Option<(&MethodRouter, Params)> {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let mut params = Params::new();
        let methods = self.match_segments(&segments, &mut params)?;
        Some((methods, params))
    }

    fn match_segments<'a>(&'a self, segments: &[&str], params: &mut Params) -> Option<&'a MethodRouter> {
        let Some((segment, remaining)) = segments.split_first() else {
            return self.methods.as_ref();
        };

        if let Some(child) = self.find_static_child(segment) {
            if let Some(found) = child.match_segments(remaining, params) {
                return Some(found);
            }
        }

        if let Some(child) = &self.capture_child {
            if let Segment::Capture(name) = &child.segment {
                let mark = params.len();
                params.push(name.clone(), (*segment).to_string());
                if let Some(found) = child.match_segments(remaining, params) {
                    return Some(found);
                }
                params.truncate(mark);
            }
        }

        if let Some(child) = &self.catch_all_child {
            if let (Segment::CatchAll(name), Some(methods)) = (&child.segment, &child.methods) {
                params.push(name.clone(), segments.join("/"));
                return Some(methods);
            }
        }

        None
    }

    fn find_static_child(&self, segment: &str) -> Option<&Node> {
        self.static_children
            .binary_search_by(|c| static_literal(c).cmp(segment))
            .ok()
            .map(|i| &self.static_children[i])
    }
}

fn static_literal(node: &Node) -> &str {
    match &node.segment {
        Segment::Static(literal) => literal,
        Segment::Capture(name) | Segment::CatchAll(name) => name,
    }
}

fn check_same_name(existing: &Segment, name: &str, path: &str) -> Result<(), RouteError> {
    match existing.capture_name() {
        Some(current) if current != name => Err(RouteError::ConflictingCapture {
            pattern: path.to_string(),
            existing: current.to_string(),
            new: name.to_string(),
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Method;

    #[test]
    fn test_insert_and_match_static() {
        let mut root = Node::root();
        root.insert("/api/v1/ping", MethodRouter::new().get("ping")).unwrap();

        let (methods, params) = root.match_path("/api/v1/ping").unwrap();
        assert_eq!(methods.route_for(&Method::GET), Some("ping"));
        assert!(params.is_empty());
    }

    #[test]
    fn test_insert_and_match_capture() {
        let mut root = Node::root();
        root.insert("/users/:id", MethodRouter::new().get("users.get")).unwrap();

        let (_, params) = root.match_path("/users/42").unwrap();
        assert_eq!(params.get("id"), Some("42"));
    }

    #[test]
    fn test_catch_all_joins_rest() {
        let mut root = Node::root();
        root.insert("/file/*path", MethodRouter::new().get("static")).unwrap();

        let (_, params) = root.match_path("/file/css/site.css").unwrap();
        assert_eq!(params.get("path"), Some("css/site.css"));
    }

    #[test]
    fn test_static_children_stay_sorted() {
        let mut root = Node::root();
        for path in ["/c", "/a", "/b"] {
            root.insert(path, MethodRouter::new().get(path)).unwrap();
        }
        let literals: Vec<&str> = root.static_children.iter().map(static_literal).collect();
        assert_eq!(literals, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_failed_capture_branch_is_rolled_back() {
        let mut root = Node::root();
        root.insert("/users/{id}/posts", MethodRouter::new().get("posts")).unwrap();
        root.insert("/users/*rest", MethodRouter::new().get("fallback")).unwrap();

        let (methods, params) = root.match_path("/users/7/comments").unwrap();
        assert_eq!(methods.route_for(&Method::GET), Some("fallback"));
        assert_eq!(params.get("id"), None);
        assert_eq!(params.get("rest"), Some("7/comments"));
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn test_conflicting_capture_names() {
        let mut root = Node::root();
        root.insert("/users/{id}", MethodRouter::new().get("a")).unwrap();
        let err = root
            .insert("/users/{name}/profile", MethodRouter::new().get("b"))
            .unwrap_err();
        assert!(matches!(err, RouteError::ConflictingCapture { .. }));
    }

    #[test]
    fn test_same_pattern_merges_methods() {
        let mut root = Node::root();
        root.insert("/users", MethodRouter::new().post("users.create")).unwrap();
        root.insert("/users", MethodRouter::new().get("users.list")).unwrap();

        let (methods, _) = root.match_path("/users").unwrap();
        assert_eq!(methods.route_for(&Method::GET), Some("users.list"));
        assert_eq!(methods.route_for(&Method::POST), Some("users.create"));
    }

    #[test]
    fn test_no_match() {
        let mut root = Node::root();
        root.insert("/users", MethodRouter::new().get("users.list")).unwrap();
        assert!(root.match_path("/posts").is_none());
        assert!(root.match_path("/users/1").is_none());
    }
}
