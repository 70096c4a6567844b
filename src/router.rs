// Route table and navigation guard.
//
// Paths map to terminal screens. Before a screen is entered the guard
// looks at every matched route from the root down; if any of them needs
// authentication and there is no token, navigation is redirected to the
// login screen instead.

use crate::session::TokenStore;
use std::collections::BTreeMap;
use tracing::debug;

pub const HOME_PATH: &str = "/";
pub const LOGIN_PATH: &str = "/login";
pub const REGISTER_PATH: &str = "/register";
pub const ADMIN_PATH: &str = "/admin";

/// Screen rendered for a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    ArticleList,
    ArticleDetail,
    Login,
    Register,
    /// Frame around every admin screen; never a navigation target itself.
    AdminLayout,
    AdminDashboard,
    AdminPosts,
    AdminPostEditor,
    AdminCategories,
    AdminTags,
}

/// One entry of the static route table. Child paths are relative to
/// their parent; an empty child path matches the parent path itself.
#[derive(Debug, PartialEq, Eq)]
pub struct RouteDescriptor {
    pub path: &'static str,
    pub name: &'static str,
    pub view: View,
    pub requires_auth: bool,
    pub children: &'static [RouteDescriptor],
}

pub static ROUTES: &[RouteDescriptor] = &[
    RouteDescriptor {
        path: "/",
        name: "ArticleList",
        view: View::ArticleList,
        requires_auth: false,
        children: &[],
    },
    RouteDescriptor {
        path: "/posts/:id",
        name: "ArticleDetail",
        view: View::ArticleDetail,
        requires_auth: false,
        children: &[],
    },
    RouteDescriptor {
        path: "/login",
        name: "Login",
        view: View::Login,
        requires_auth: false,
        children: &[],
    },
    RouteDescriptor {
        path: "/register",
        name: "Register",
        view: View::Register,
        requires_auth: false,
        children: &[],
    },
    RouteDescriptor {
        path: "/admin",
        name: "Admin",
        view: View::AdminLayout,
        requires_auth: true,
        children: &[
            RouteDescriptor {
                path: "",
                name: "AdminDashboard",
                view: View::AdminDashboard,
                requires_auth: false,
                children: &[],
            },
            RouteDescriptor {
                path: "posts",
                name: "AdminPosts",
                view: View::AdminPosts,
                requires_auth: false,
                children: &[],
            },
            RouteDescriptor {
                path: "posts/new",
                name: "AdminPostCreate",
                view: View::AdminPostEditor,
                requires_auth: false,
                children: &[],
            },
            RouteDescriptor {
                path: "posts/:id/edit",
                name: "AdminPostEdit",
                view: View::AdminPostEditor,
                requires_auth: false,
                children: &[],
            },
            RouteDescriptor {
                path: "categories",
                name: "AdminCategories",
                view: View::AdminCategories,
                requires_auth: false,
                children: &[],
            },
            RouteDescriptor {
                path: "tags",
                name: "AdminTags",
                view: View::AdminTags,
                requires_auth: false,
                children: &[],
            },
        ],
    },
];

/// A resolved path: the chain of matched routes (root first) and the
/// values bound to `:param` segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    pub path: String,
    pub matched: Vec<&'static RouteDescriptor>,
    pub params: BTreeMap<String, String>,
}

impl RouteMatch {
    /// The innermost matched route.
    pub fn route(&self) -> &'static RouteDescriptor {
        // resolve never yields an empty chain
        self.matched[self.matched.len() - 1]
    }

    pub fn view(&self) -> View {
        self.route().view
    }

    pub fn name(&self) -> &'static str {
        self.route().name
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// True if any route in the chain requires authentication.
    pub fn requires_auth(&self) -> bool {
        self.matched.iter().any(|r| r.requires_auth)
    }
}

/// Outcome of the guard for one navigation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Allowed,
    Redirected { to: &'static str },
}

/// Decide whether `target` may be entered. Only the presence of a token
/// is checked, never its validity.
pub fn guard(target: &RouteMatch, tokens: &TokenStore) -> GuardDecision {
    if target.requires_auth() && !tokens.is_authenticated() {
        GuardDecision::Redirected { to: LOGIN_PATH }
    } else {
        GuardDecision::Allowed
    }
}

/// Result of asking the router to go somewhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Allowed(RouteMatch),
    /// Sent to `to` instead; `from` is the path originally requested so
    /// the login screen can continue there.
    Redirected { to: RouteMatch, from: String },
    NotFound(String),
}

/// Route table plus the token store the guard reads.
#[derive(Debug, Clone)]
pub struct Router {
    routes: &'static [RouteDescriptor],
    tokens: TokenStore,
}

impl Router {
    pub fn new(tokens: TokenStore) -> Self {
        Self::with_routes(ROUTES, tokens)
    }

    pub fn with_routes(routes: &'static [RouteDescriptor], tokens: TokenStore) -> Self {
        Router { routes, tokens }
    }

    /// Match `path` against the table. Query strings and fragments are
    /// ignored, as are repeated or trailing slashes.
    pub fn resolve(&self, path: &str) -> Option<RouteMatch> {
        let clean = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = clean.split('/').filter(|s| !s.is_empty()).collect();
        self.routes.iter().find_map(|route| {
            let mut params = BTreeMap::new();
            match_route(route, &segments, &mut params).map(|matched| RouteMatch {
                path: path.to_string(),
                matched,
                params,
            })
        })
    }

    /// Resolve `path` and run the guard on it.
    pub fn navigate(&self, path: &str) -> Navigation {
        let Some(target) = self.resolve(path) else {
            debug!(%path, "no route matches");
            return Navigation::NotFound(path.to_string());
        };
        match guard(&target, &self.tokens) {
            GuardDecision::Allowed => {
                debug!(%path, route = target.name(), "navigation allowed");
                Navigation::Allowed(target)
            }
            GuardDecision::Redirected { to } => {
                debug!(%path, %to, "navigation redirected");
                match self.resolve(to) {
                    Some(login) => Navigation::Redirected {
                        to: login,
                        from: path.to_string(),
                    },
                    None => Navigation::NotFound(to.to_string()),
                }
            }
        }
    }
}

fn match_route(
    route: &'static RouteDescriptor,
    segments: &[&str],
    params: &mut BTreeMap<String, String>,
) -> Option<Vec<&'static RouteDescriptor>> {
    let pattern: Vec<&str> = route.path.split('/').filter(|s| !s.is_empty()).collect();
    if segments.len() < pattern.len() {
        return None;
    }

    let mut bound = params.clone();
    for (expected, actual) in pattern.iter().zip(segments) {
        match expected.strip_prefix(':') {
            Some(name) => {
                bound.insert(name.to_string(), (*actual).to_string());
            }
            None if expected == actual => {}
            None => return None,
        }
    }

    let rest = &segments[pattern.len()..];
    for child in route.children {
        let mut child_params = bound.clone();
        if let Some(chain) = match_route(child, rest, &mut child_params) {
            *params = child_params;
            let mut matched = vec![route];
            matched.extend(chain);
            return Some(matched);
        }
    }

    if rest.is_empty() {
        *params = bound;
        Some(vec![route])
    } else {
        None
    }
}
