//! Outgoing edges of a node and how the run loop follows them.

use std::collections::HashMap;
use std::sync::Arc;

use super::Next;

/// Picks a branch key from the state a node just produced.
pub type RouteFn<S> = Arc<dyn Fn(&S) -> String + Send + Sync>;

pub(crate) enum Edge<S> {
    /// Always the same successor (possibly END).
    Fixed(String),
    /// Successor chosen by `route`; a key missing from `targets` is taken as a node id.
    Branch {
        route: RouteFn<S>,
        targets: Option<HashMap<String, String>>,
    },
}

impl<S> Clone for Edge<S> {
    fn clone(&self) -> Self {
        match self {
            Edge::Fixed(to) => Edge::Fixed(to.clone()),
            Edge::Branch { route, targets } => Edge::Branch {
                route: route.clone(),
                targets: targets.clone(),
            },
        }
    }
}

/// Node to run after one that returned `next`, or `None` to stop.
///
/// A branch overrides whatever the node asked for. The result may be END,
/// which the caller treats as a stop.
pub(crate) fn successor<S>(edge: Option<&Edge<S>>, state: &S, next: Next) -> Option<String> {
    if let Some(Edge::Branch { route, targets }) = edge {
        let key = route(state);
        let mapped = targets.as_ref().and_then(|t| t.get(&key)).cloned();
        return Some(mapped.unwrap_or(key));
    }
    match (next, edge) {
        (Next::End, _) => None,
        (Next::Node(id), _) => Some(id),
        (Next::Continue, Some(Edge::Fixed(to))) => Some(to.clone()),
        (Next::Continue, _) => None,
    }
}
