//! barehttp-router: Zero-dependency trie router
//!
//! Route table shared by every barehttp service. Lookups are keyed by
//! HTTP method first, then walked segment by segment.
//!
//! ## Matching rules
//! - Static segments compare case-insensitively: `/Exec` matches `/exec`
//! - Empty segments are significant: `/exec/` does not match `/exec`
//! - A final `*name` (or bare `*`) segment captures the rest of the path
//!
//! ## Priority
//! 1. Exact static match (highest)
//! 2. Wildcard match (lowest)
//!
//! ## Example
//! ```
//! use barehttp_router::Router;
//!
//! let mut router = Router::new();
//! router.insert("GET", "/", 0);
//! router.insert("GET", "/exec", 1);
//! router.insert("GET", "/*path", 2);
//!
//! assert_eq!(router.find("GET", "/EXEC").unwrap().handler_id, 1);
//!
//! let m = router.find("GET", "/css/site.css").unwrap();
//! assert_eq!(m.handler_id, 2);
//! assert_eq!(m.params, vec![("path".to_string(), "css/site.css".to_string())]);
//! ```

use std::collections::HashMap;

/// Route match result
#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    /// The matched handler ID
    pub handler_id: u32,
    /// Captured wildcard values as (name, value) pairs
    pub params: Vec<(String, String)>,
}

/// Trie node for path segment matching
#[derive(Debug, Default)]
struct Node {
    /// Static children, keyed by lowercased segment
    children: HashMap<String, Node>,
    /// Wildcard child (*path)
    wildcard_child: Option<Box<WildcardNode>>,
    /// Handler ID if this is a terminal node
    handler_id: Option<u32>,
}

#[derive(Debug)]
struct WildcardNode {
    name: String,
    handler_id: u32,
}

/// Zero-dependency trie router
///
/// Routes are organized by HTTP method, then matched segment by segment.
#[derive(Debug, Default)]
pub struct Router {
    /// Method -> Trie root
    trees: HashMap<String, Node>,
}

/// Split a path into its segments after the leading slash.
///
/// `/` yields one empty segment so the root is a real node.
fn segments(path: &str) -> Vec<&str> {
    path.strip_prefix('/').unwrap_or(path).split('/').collect()
}

impl Router {
    /// Create a new router
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a route
    ///
    /// # Arguments
    /// * `method` - HTTP method (GET, POST, etc.)
    /// * `path` - URL path, optionally ending in a `*name` wildcard
    /// * `handler_id` - Unique identifier for the handler
    pub fn insert(&mut self, method: &str, path: &str, handler_id: u32) {
        let tree = self.trees.entry(method.to_uppercase()).or_default();
        Self::insert_node(tree, &segments(path), handler_id);
    }

    fn insert_node(node: &mut Node, segments: &[&str], handler_id: u32) {
        let Some((segment, rest)) = segments.split_first() else {
            node.handler_id = Some(handler_id);
            return;
        };

        if let Some(name) = segment.strip_prefix('*') {
            let wildcard_name = if name.is_empty() { "*" } else { name };
            node.wildcard_child = Some(Box::new(WildcardNode {
                name: wildcard_name.to_string(),
                handler_id,
            }));
        } else {
            let child = node.children.entry(segment.to_lowercase()).or_default();
            Self::insert_node(child, rest, handler_id);
        }
    }

    /// Find a matching route
    ///
    /// Returns `Some(Match)` with the handler id and any wildcard capture,
    /// or `None` if nothing matches.
    pub fn find(&self, method: &str, path: &str) -> Option<Match> {
        let tree = self.trees.get(&method.to_uppercase())?;
        let mut params = Vec::new();
        Self::find_node(tree, &segments(path), &mut params)
    }

    fn find_node(
        node: &Node,
        segments: &[&str],
        params: &mut Vec<(String, String)>,
    ) -> Option<Match> {
        let Some((segment, rest)) = segments.split_first() else {
            return node.handler_id.map(|id| Match {
                handler_id: id,
                params: params.clone(),
            });
        };

        // Priority 1: exact static match
        if let Some(child) = node.children.get(&segment.to_lowercase()) {
            if let Some(m) = Self::find_node(child, rest, params) {
                return Some(m);
            }
        }

        // Priority 2: wildcard, captures everything that is left
        if let Some(ref wildcard) = node.wildcard_child {
            params.push((wildcard.name.clone(), segments.join("/")));
            return Some(Match {
                handler_id: wildcard.handler_id,
                params: params.clone(),
            });
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_routes() {
        let mut router = Router::new();
        router.insert("GET", "/", 0);
        router.insert("GET", "/exec", 1);
        router.insert("GET", "/drawer.svg", 2);

        assert_eq!(router.find("GET", "/").unwrap().handler_id, 0);
        assert_eq!(router.find("GET", "/exec").unwrap().handler_id, 1);
        assert_eq!(router.find("GET", "/drawer.svg").unwrap().handler_id, 2);
        assert!(router.find("GET", "/unknown").is_none());
        assert!(router.find("POST", "/exec").is_none());
    }

    #[test]
    fn test_case_insensitive_path() {
        let mut router = Router::new();
        router.insert("GET", "/shell", 1);

        assert_eq!(router.find("GET", "/SHELL").unwrap().handler_id, 1);
        assert_eq!(router.find("GET", "/Shell").unwrap().handler_id, 1);
    }

    #[test]
    fn test_case_insensitive_method() {
        let mut router = Router::new();
        router.insert("get", "/sort", 1);

        assert_eq!(router.find("GET", "/sort").unwrap().handler_id, 1);
        assert_eq!(router.find("Get", "/sort").unwrap().handler_id, 1);
        assert!(router.find("PUT", "/sort").is_none());
    }

    #[test]
    fn test_exact_segments() {
        let mut router = Router::new();
        router.insert("GET", "/exec", 1);

        assert!(router.find("GET", "/exec/").is_none());
        assert!(router.find("GET", "//exec").is_none());
        assert!(router.find("GET", "/exec/more").is_none());
    }

    #[test]
    fn test_root_is_not_a_prefix() {
        let mut router = Router::new();
        router.insert("GET", "/", 0);

        assert!(router.find("GET", "/index.html").is_none());
    }

    #[test]
    fn test_named_wildcard() {
        let mut router = Router::new();
        router.insert("GET", "/*path", 9);

        let m = router.find("GET", "/img/logo.png").unwrap();
        assert_eq!(m.handler_id, 9);
        assert_eq!(m.params, vec![("path".to_string(), "img/logo.png".to_string())]);
    }

    #[test]
    fn test_bare_wildcard() {
        let mut router = Router::new();
        router.insert("GET", "/static/*", 1);

        let m = router.find("GET", "/static/js/app.js").unwrap();
        assert_eq!(m.params, vec![("*".to_string(), "js/app.js".to_string())]);
    }

    #[test]
    fn test_priority_exact_over_wildcard() {
        let mut router = Router::new();
        router.insert("GET", "/", 0);
        router.insert("GET", "/sort", 1);
        router.insert("GET", "/*path", 2);

        assert_eq!(router.find("GET", "/").unwrap().handler_id, 0);
        assert_eq!(router.find("GET", "/sort").unwrap().handler_id, 1);
        assert_eq!(router.find("GET", "/sort/x").unwrap().handler_id, 2);
        assert_eq!(router.find("GET", "/style.css").unwrap().handler_id, 2);
    }

    #[test]
    fn test_wildcard_keeps_traversal_segments() {
        let mut router = Router::new();
        router.insert("GET", "/*path", 1);

        let m = router.find("GET", "/../etc/passwd").unwrap();
        assert_eq!(m.params, vec![("path".to_string(), "../etc/passwd".to_string())]);
    }
}
