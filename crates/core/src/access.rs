//! Route access policy.
//!
//! Classifies a request path against the public allow-lists and decides,
//! given whether the caller has a session, whether the request proceeds or
//! is redirected. The HTTP gate in the API crate is a thin wrapper around
//! [`AccessPolicy::decide`].
//!
//! | authenticated | public page | dashboard | protected | public API |
//! |---------------|-------------|-----------|-----------|------------|
//! | yes           | -> dashboard| allow     | allow     | allow      |
//! | no            | allow       | -> sign-in| -> sign-in| allow      |

/// Default landing path for signed-in users.
pub const DEFAULT_DASHBOARD_PATH: &str = "/home";

/// Default sign-in page.
pub const DEFAULT_SIGN_IN_PATH: &str = "/sign-in";

/// Pages reachable without a session.
pub const DEFAULT_PUBLIC_PAGES: &[&str] = &["/", "/home", "/sign-in", "/sign-up", "/signin"];

/// API paths reachable without a session.
pub const DEFAULT_PUBLIC_API_PATHS: &[&str] = &["/api/videos"];

/// File extensions served as static assets; these never pass through the gate.
const STATIC_EXTENSIONS: &[&str] = &[
    "html", "htm", "css", "js", "jpg", "jpeg", "webp", "png", "gif", "svg", "ttf", "woff",
    "woff2", "ico", "csv", "doc", "docx", "xls", "xlsx", "zip", "webmanifest", "map", "txt",
];

/// Framework-internal prefix that is always treated as static.
const STATIC_PREFIX: &str = "/_next/";

/// Prefix identifying API requests.
const API_PREFIX: &str = "/api";

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// What kind of target a request path is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    /// Static asset; bypasses the policy.
    StaticAsset,
    /// Listed in the public API allow-list.
    PublicApi,
    /// The dashboard landing path.
    Dashboard,
    /// Listed in the public page allow-list (other than the dashboard).
    PublicPage,
    /// Everything else.
    Protected,
}

/// Outcome of applying the policy to a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    Allow,
    RedirectToDashboard,
    RedirectToSignIn,
}

/// The allow-lists and redirect targets.
#[derive(Debug, Clone)]
pub struct AccessPolicy {
    pub public_pages: Vec<String>,
    pub public_api_paths: Vec<String>,
    pub dashboard_path: String,
    pub sign_in_path: String,
}

impl Default for AccessPolicy {
    fn default() -> Self {
        Self {
            public_pages: DEFAULT_PUBLIC_PAGES.iter().map(|p| p.to_string()).collect(),
            public_api_paths: DEFAULT_PUBLIC_API_PATHS
                .iter()
                .map(|p| p.to_string())
                .collect(),
            dashboard_path: DEFAULT_DASHBOARD_PATH.to_string(),
            sign_in_path: DEFAULT_SIGN_IN_PATH.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Policy
// ---------------------------------------------------------------------------

impl AccessPolicy {
    /// Build a policy with custom redirect targets and the default allow-lists.
    ///
    /// The sign-in page is added to the public pages if missing, otherwise
    /// unauthenticated users would be redirected in a loop.
    pub fn with_targets(dashboard_path: &str, sign_in_path: &str) -> Self {
        let mut policy = Self {
            dashboard_path: dashboard_path.to_string(),
            sign_in_path: sign_in_path.to_string(),
            ..Self::default()
        };
        if !policy.public_pages.iter().any(|p| p == sign_in_path) {
            policy.public_pages.push(sign_in_path.to_string());
        }
        policy
    }

    /// Classify a request path.
    pub fn classify(&self, path: &str) -> RouteClass {
        if is_static_asset(path) {
            return RouteClass::StaticAsset;
        }
        if self.public_api_paths.iter().any(|p| p == path) {
            return RouteClass::PublicApi;
        }
        if path == self.dashboard_path {
            return RouteClass::Dashboard;
        }
        if !is_api_path(path) && self.public_pages.iter().any(|p| p == path) {
            return RouteClass::PublicPage;
        }
        RouteClass::Protected
    }

    /// Apply the decision table to `path` for a caller with or without a session.
    pub fn decide(&self, path: &str, authenticated: bool) -> AccessDecision {
        match (self.classify(path), authenticated) {
            (RouteClass::StaticAsset | RouteClass::PublicApi, _) => AccessDecision::Allow,
            (RouteClass::PublicPage, true) => AccessDecision::RedirectToDashboard,
            (RouteClass::PublicPage, false) => AccessDecision::Allow,
            (RouteClass::Dashboard | RouteClass::Protected, true) => AccessDecision::Allow,
            (RouteClass::Dashboard | RouteClass::Protected, false) => {
                AccessDecision::RedirectToSignIn
            }
        }
    }

    /// Path a redirect decision points at, or `None` for [`AccessDecision::Allow`].
    pub fn redirect_target(&self, decision: AccessDecision) -> Option<&str> {
        match decision {
            AccessDecision::Allow => None,
            AccessDecision::RedirectToDashboard => Some(&self.dashboard_path),
            AccessDecision::RedirectToSignIn => Some(&self.sign_in_path),
        }
    }
}

/// Whether a path belongs to the API surface.
pub fn is_api_path(path: &str) -> bool {
    path == API_PREFIX || path.starts_with("/api/")
}

/// Static files and framework internals skip the gate. API paths never do,
/// even if they end in a static-looking extension.
pub fn is_static_asset(path: &str) -> bool {
    if is_api_path(path) {
        return false;
    }
    if path.starts_with(STATIC_PREFIX) {
        return true;
    }
    let last_segment = path.rsplit('/').next().unwrap_or("");
    match last_segment.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => {
            let ext = ext.to_ascii_lowercase();
            STATIC_EXTENSIONS.contains(&ext.as_str())
        }
        _ => false,
    }
}
