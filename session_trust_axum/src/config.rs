//! Routing configuration for the edge gate.

use crate::edge_gate::RouteClass;

const DEFAULT_ROOT_PATH: &str = "/";
const DEFAULT_PUBLIC_ONLY_PATHS: [&str; 2] = ["/login", "/signup"];

/// Where the edge gate sends logged-in users, and which paths only make
/// sense for anonymous visitors.
///
/// `from_env` reads `AUTH_REDIRECT_ROOT` (default `/`) and
/// `AUTH_PUBLIC_ONLY_PATHS`, a comma-separated list (default
/// `/login,/signup`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateConfig {
    root_path: String,
    public_only_paths: Vec<String>,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            root_path: DEFAULT_ROOT_PATH.to_string(),
            public_only_paths: DEFAULT_PUBLIC_ONLY_PATHS
                .iter()
                .map(|p| p.to_string())
                .collect(),
        }
    }
}

impl GateConfig {
    pub fn new<I, P>(root_path: impl Into<String>, public_only_paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        Self {
            root_path: root_path.into(),
            public_only_paths: public_only_paths
                .into_iter()
                .map(|p| {
                    let path: String = p.into();
                    normalize(&path).to_string()
                })
                .filter(|p| !p.is_empty())
                .collect(),
        }
    }

    pub fn from_env() -> Self {
        let root =
            dotenvy::var("AUTH_REDIRECT_ROOT").unwrap_or_else(|_| DEFAULT_ROOT_PATH.to_string());
        match dotenvy::var("AUTH_PUBLIC_ONLY_PATHS") {
            Ok(paths) => Self::new(root, parse_path_list(&paths)),
            Err(_) => Self::new(root, DEFAULT_PUBLIC_ONLY_PATHS),
        }
    }

    pub fn root_path(&self) -> &str {
        &self.root_path
    }

    pub fn public_only_paths(&self) -> &[String] {
        &self.public_only_paths
    }

    /// Classify a request path. A trailing slash is ignored.
    pub fn classify(&self, path: &str) -> RouteClass {
        let path = normalize(path);
        if self.public_only_paths.iter().any(|p| p == path) {
            RouteClass::PublicOnly
        } else {
            RouteClass::Other
        }
    }
}

fn normalize(path: &str) -> &str {
    let trimmed = path.trim();
    if trimmed.len() > 1 {
        trimmed.trim_end_matches('/')
    } else {
        trimmed
    }
}

fn parse_path_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}
