//! Path matching over the route tree.
//!
//! # Responsibilities
//! - Split a pathname into segments
//! - Depth-first search from the root for the first node chain that
//!   consumes the whole URL
//! - Report where lazy children must be loaded before matching can continue
//!
//! # Design Decisions
//! - `/a/b/c` splits into `["", "a", "b", "c", ""]`: the root consumes the
//!   leading empty segment, index nodes consume the trailing one
//! - Empty-path nodes consume the next segment only when it is empty,
//!   otherwise they pass through without consuming
//! - A node never matches once every segment is consumed
//! - The trailing empty segment may be left over (`/todos/123` ends on `:id`)
//! - First child subtree that exhausts the URL wins; no scoring

use crate::navigation::error::NavigationError;
use crate::navigation::location::{normalize_pathname, Location};
use crate::routing::node::NodeKey;
use crate::routing::pattern::Params;
use crate::routing::route::{create_route, Route};
use crate::routing::tree::RouteTree;

/// A node matched during the search, before it is turned into a `Route`.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchedNode {
    pub node: NodeKey,
    pub segment: String,
    pub params: Params,
}

/// Raw outcome of the depth-first search.
#[derive(Debug, Clone, PartialEq)]
pub enum PathMatch {
    /// The chain consumes the full URL.
    Complete(Vec<MatchedNode>),
    /// Matching stopped at `leaf`, whose children have not been loaded yet.
    Pending { matched: Vec<MatchedNode>, leaf: NodeKey },
}

/// Routes resolved for a location.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Complete(Vec<Route>),
    Pending { partial_path: Vec<Route>, leaf: NodeKey },
}

/// Split a pathname into match segments.
pub fn split_segments(pathname: &str) -> Vec<String> {
    normalize_pathname(pathname)
        .split('/')
        .map(str::to_string)
        .collect()
}

/// Find the node chain matching `url`, starting at the tree's root.
pub fn find_path_from_root(tree: &RouteTree, url: &str) -> Result<PathMatch, NavigationError> {
    let owned = split_segments(url);
    let segments: Vec<&str> = owned.iter().map(String::as_str).collect();

    match visit(tree, tree.root(), &segments) {
        Step::Found(matched) => Ok(PathMatch::Complete(matched)),
        Step::Pending(matched, leaf) => Ok(PathMatch::Pending { matched, leaf }),
        Step::Miss => Err(NavigationError::NoMatch {
            url: url.to_string(),
        }),
    }
}

/// Match a location and derive its routes.
pub fn resolve(tree: &RouteTree, location: &Location) -> Result<Resolution, NavigationError> {
    let to_routes = |matched: Vec<MatchedNode>| -> Result<Vec<Route>, NavigationError> {
        matched
            .into_iter()
            .map(|m| {
                let node = tree.get(m.node).ok_or_else(|| {
                    NavigationError::InvalidNavigation(format!(
                        "matched node {} vanished during resolution",
                        m.node
                    ))
                })?;
                Ok(create_route(&node, m.segment, m.params, location.query.clone()))
            })
            .collect()
    };

    match find_path_from_root(tree, &location.pathname)? {
        PathMatch::Complete(matched) => Ok(Resolution::Complete(to_routes(matched)?)),
        PathMatch::Pending { matched, leaf } => Ok(Resolution::Pending {
            partial_path: to_routes(matched)?,
            leaf,
        }),
    }
}

enum Step {
    Found(Vec<MatchedNode>),
    Pending(Vec<MatchedNode>, NodeKey),
    Miss,
}

fn is_exhausted(rest: &[&str]) -> bool {
    rest.is_empty() || rest == [""]
}

fn visit(tree: &RouteTree, key: NodeKey, segments: &[&str]) -> Step {
    if segments.is_empty() {
        return Step::Miss;
    }
    let Some(node) = tree.get(key) else {
        return Step::Miss;
    };

    let (consumed, params) = match &node.pattern {
        None => (usize::from(segments[0].is_empty()), Params::new()),
        Some(pattern) => match pattern.match_segments(segments) {
            Some(params) => (pattern.len(), params),
            None => return Step::Miss,
        },
    };

    let here = MatchedNode {
        node: key,
        segment: segments[..consumed].join("/"),
        params,
    };
    let rest = &segments[consumed..];

    for child in node.children() {
        match visit(tree, *child, rest) {
            Step::Found(mut path) => {
                path.insert(0, here);
                return Step::Found(path);
            }
            Step::Pending(mut path, leaf) => {
                path.insert(0, here);
                return Step::Pending(path, leaf);
            }
            Step::Miss => continue,
        }
    }

    if is_exhausted(rest) {
        Step::Found(vec![here])
    } else if node.has_pending_children() {
        Step::Pending(vec![here], key)
    } else {
        Step::Miss
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::node::{ChildrenLoader, RouteConfig};

    fn paths(tree: &RouteTree, result: PathMatch) -> Vec<String> {
        match result {
            PathMatch::Complete(matched) => matched
                .into_iter()
                .map(|m| tree.get(m.node).unwrap().path)
                .collect(),
            PathMatch::Pending { .. } => panic!("unexpected pending match"),
        }
    }

    fn config(path: &str, children: Vec<RouteConfig>) -> RouteConfig {
        RouteConfig::new(path).with_children(children)
    }

    #[test]
    fn test_split_segments() {
        assert_eq!(split_segments("/"), vec!["", ""]);
        assert_eq!(split_segments("/a/b/c"), vec!["", "a", "b", "c", ""]);
        assert_eq!(split_segments("a//b/"), vec!["", "a", "b", ""]);
    }

    #[test]
    fn test_partial_matching() {
        let tree = RouteTree::new();
        tree.replace_children(
            tree.root(),
            vec![config(
                "a",
                vec![config("b", vec![]), config("c", vec![config("d", vec![])])],
            )],
        )
        .unwrap();

        let r1 = find_path_from_root(&tree, "/a/b").unwrap();
        assert_eq!(paths(&tree, r1), vec!["", "a", "b"]);

        let r2 = find_path_from_root(&tree, "/a/c/d").unwrap();
        assert_eq!(paths(&tree, r2), vec!["", "a", "c", "d"]);

        // Partial chain that does not consume the URL.
        let err = find_path_from_root(&tree, "/a/b/x").unwrap_err();
        assert_eq!(err.to_string(), "No match for /a/b/x");
    }

    #[test]
    fn test_mix_of_partial_and_full_matching() {
        let tree = RouteTree::new();
        tree.replace_children(
            tree.root(),
            vec![
                config("", vec![]),
                config(
                    "a",
                    vec![config(
                        "b",
                        vec![config("c", vec![config("", vec![config("", vec![])])])],
                    )],
                ),
            ],
        )
        .unwrap();

        let r1 = find_path_from_root(&tree, "/a/b/c").unwrap();
        assert_eq!(paths(&tree, r1), vec!["", "a", "b", "c", ""]);

        let r2 = find_path_from_root(&tree, "/").unwrap();
        assert_eq!(paths(&tree, r2), vec!["", ""]);
    }

    #[test]
    fn test_pass_through_layout_node() {
        let tree = RouteTree::new();
        tree.replace_children(
            tree.root(),
            vec![config("", vec![config("settings", vec![])])],
        )
        .unwrap();

        let result = find_path_from_root(&tree, "/settings").unwrap();
        assert_eq!(paths(&tree, result), vec!["", "", "settings"]);
    }

    #[test]
    fn test_params_and_segments() {
        let tree = RouteTree::new();
        tree.replace_children(
            tree.root(),
            vec![config("todos", vec![config("", vec![]), config(":id", vec![])])],
        )
        .unwrap();

        let PathMatch::Complete(matched) = find_path_from_root(&tree, "/todos/123").unwrap() else {
            panic!("expected complete match");
        };
        assert_eq!(matched.len(), 3);
        assert_eq!(matched[1].segment, "todos");
        assert_eq!(matched[2].segment, "123");
        assert_eq!(matched[2].params.get("id").map(String::as_str), Some("123"));

        let result = find_path_from_root(&tree, "/todos").unwrap();
        assert_eq!(paths(&tree, result), vec!["", "todos", ""]);
    }

    #[test]
    fn test_pending_on_lazy_children() {
        let tree = RouteTree::new();
        let loader = ChildrenLoader::new(|| async { Ok(vec![RouteConfig::new("b")]) });
        tree.replace_children(tree.root(), vec![RouteConfig::new("a").with_loader(loader)])
            .unwrap();
        let a = tree.find_by_paths(&["a"]).unwrap();

        // URL ends at the lazy node: no load needed.
        assert!(matches!(
            find_path_from_root(&tree, "/a").unwrap(),
            PathMatch::Complete(_)
        ));

        match find_path_from_root(&tree, "/a/b").unwrap() {
            PathMatch::Pending { matched, leaf } => {
                assert_eq!(leaf, a);
                assert_eq!(matched.len(), 2);
            }
            other => panic!("expected pending, got {other:?}"),
        }
    }

    #[test]
    fn test_resolve_attaches_query_and_data() {
        let tree = RouteTree::new();
        tree.replace_children(
            tree.root(),
            vec![RouteConfig::new("a").with_data(serde_json::json!({ "title": "A" }))],
        )
        .unwrap();

        let mut location = Location::new("/a");
        location.query.insert("x".into(), "1".into());
        let Resolution::Complete(routes) = resolve(&tree, &location).unwrap() else {
            panic!("expected complete resolution");
        };
        assert_eq!(routes.len(), 2);
        assert_eq!(routes[1].data["title"], "A");
        assert_eq!(routes[1].query.get("x").map(String::as_str), Some("1"));
    }
}
