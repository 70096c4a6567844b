// Terminal UI: an interactive loop that navigates between screens using
// `dialoguer` prompts.
//
// Each screen renders, asks the user what to do, and returns the next
// path. The router decides whether that path may be entered; protected
// admin screens bounce to the login screen while logged out.

use crate::api::admin::Taxonomy;
use crate::http::HttpClient;
use crate::router::{Navigation, RouteMatch, Router, View, HOME_PATH};
use crate::session::TokenStore;
use anyhow::Result;
use dialoguer::Select;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::time::Duration;
use tracing::{debug, warn};

mod admin;
mod blog;

/// Posts per page on listing screens.
pub const PAGE_SIZE: u32 = 10;

/// Where the loop goes after a screen returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Next {
    Go(String),
    Exit,
}

impl Next {
    fn go(path: impl Into<String>) -> Self {
        Next::Go(path.into())
    }
}

/// State shared by all screens.
pub struct App {
    client: HttpClient,
    router: Router,
    /// Spinners are drawn here; the terminal notifier prints through the
    /// same handle.
    progress: MultiProgress,
    /// Path to continue to after a successful login.
    after_login: Option<String>,
}

impl App {
    pub fn new(client: HttpClient, progress: MultiProgress) -> Self {
        let router = Router::new(client.tokens().clone());
        App {
            client,
            router,
            progress,
            after_login: None,
        }
    }

    fn tokens(&self) -> &TokenStore {
        self.client.tokens()
    }

    /// Run until the user picks "Exit".
    pub fn run(&mut self, start: &str) -> Result<()> {
        let mut location = start.to_string();
        loop {
            let Some(target) = self.enter(&location) else {
                location = HOME_PATH.to_string();
                continue;
            };
            debug!(path = %target.path, view = ?target.view(), "rendering");
            match self.render(&target)? {
                Next::Go(path) => location = path,
                Next::Exit => break,
            }
        }
        Ok(())
    }

    /// Ask the router for `location`. A redirect to the login screen
    /// remembers `location` so login can continue there; an unknown path
    /// yields `None`.
    fn enter(&mut self, location: &str) -> Option<RouteMatch> {
        match self.router.navigate(location) {
            Navigation::Allowed(target) => Some(target),
            Navigation::Redirected { to, from } => {
                println!("Please log in to continue.");
                self.after_login = Some(from);
                Some(to)
            }
            Navigation::NotFound(path) => {
                println!("Page not found: {path}");
                None
            }
        }
    }

    fn render(&mut self, target: &RouteMatch) -> Result<Next> {
        match target.view() {
            View::ArticleList => blog::article_list(self, target),
            View::ArticleDetail => blog::article_detail(self, target),
            View::Login => blog::login(self),
            View::Register => blog::register(self),
            View::AdminLayout | View::AdminDashboard => admin::dashboard(self),
            View::AdminPosts => admin::posts(self, target),
            View::AdminPostEditor => admin::post_editor(self, target),
            View::AdminCategories => admin::terms(self, target, Taxonomy::Categories),
            View::AdminTags => admin::terms(self, target, Taxonomy::Tags),
        }
    }

    /// Store the token from a successful login and pick where to go next:
    /// the page that bounced to login, or the article list.
    fn complete_login(&mut self, token: String) -> Next {
        self.save_session(Some(token));
        Next::go(
            self.after_login
                .take()
                .unwrap_or_else(|| HOME_PATH.to_string()),
        )
    }

    /// Forget the session and return to the article list.
    fn logout(&mut self) -> Next {
        self.save_session(None);
        self.after_login = None;
        println!("Logged out.");
        Next::go(HOME_PATH)
    }

    /// The session in memory always changes. If it cannot be written to
    /// disk the user is told and the run carries on.
    fn save_session(&self, token: Option<String>) {
        if let Err(e) = self.tokens().set(token) {
            warn!(error = %e, "could not persist session");
            eprintln!("Could not save session: {e}");
        }
    }

    /// Show a spinner while `work` runs.
    fn spinner<T>(&self, message: &str, work: impl FnOnce() -> T) -> T {
        let pb = self.progress.add(ProgressBar::new_spinner());
        if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
            pb.set_style(style);
        }
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        let out = work();
        pb.finish_and_clear();
        self.progress.remove(&pb);
        out
    }
}

/// Start the interactive menu on the article list. Blocks until the user
/// exits.
pub fn main_menu(client: HttpClient, progress: MultiProgress) -> Result<()> {
    App::new(client, progress).run(HOME_PATH)
}

/// Keyboard-navigable list; returns the chosen label.
fn choose<'a>(prompt: &str, options: &[&'a str]) -> Result<&'a str> {
    let idx = Select::new()
        .with_prompt(prompt)
        .items(options)
        .default(0)
        .interact()?;
    Ok(options[idx])
}

/// Value of `key` in the query string of `path`, if any.
fn query_param<'a>(path: &'a str, key: &str) -> Option<&'a str> {
    let (_, query) = path.split_once('?')?;
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(k, _)| *k == key)
        .map(|(_, v)| v)
}

/// `?page=N` of a listing path, defaulting to the first page.
fn page_of(path: &str) -> u32 {
    query_param(path, "page")
        .and_then(|p| p.parse().ok())
        .filter(|p| *p > 0)
        .unwrap_or(1)
}

/// Strip the query string, keeping the route part of `path`.
fn route_part(path: &str) -> &str {
    path.split_once('?').map_or(path, |(route, _)| route)
}
