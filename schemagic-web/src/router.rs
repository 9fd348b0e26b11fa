//! Simple router: exact path match.

use std::collections::HashMap;

#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub struct RouteId(pub u32);

/// Maps (method, path) -> RouteId. Paths are stored without leading/trailing slashes.
pub struct Router {
    table: HashMap<(String, String), RouteId>,
}

impl Router {
    pub fn new() -> Self {
        Self {
            table: HashMap::new(),
        }
    }

    /// Returns false if (method, path) is already taken.
    pub fn add(&mut self, method: &str, path: &str, id: RouteId) -> bool {
        let key = (method.to_uppercase(), normalize(path));
        if self.table.contains_key(&key) {
            return false;
        }
        self.table.insert(key, id);
        true
    }

    pub fn match_route(&self, method: &str, path: &str) -> Option<RouteId> {
        self.table
            .get(&(method.to_uppercase(), normalize(path)))
            .copied()
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn normalize(path: &str) -> String {
    path.trim_matches('/').to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_ignoring_slashes_and_method_case() {
        let mut router = Router::new();
        assert!(router.add("post", "/math/sum", RouteId(0)));
        assert_eq!(router.match_route("POST", "math/sum/"), Some(RouteId(0)));
        assert_eq!(router.match_route("GET", "math/sum"), None);
        assert!(!router.add("POST", "math/sum", RouteId(1)));
    }
}
