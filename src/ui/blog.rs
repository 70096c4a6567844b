// Public screens: article list, article detail, login and registration.

use super::{choose, page_of, App, Next, PAGE_SIZE};
use crate::api;
use crate::models::{Credentials, ListParams, Post};
use crate::router::{ADMIN_PATH, HOME_PATH, LOGIN_PATH, REGISTER_PATH};
use anyhow::Result;
use dialoguer::{Input, Password};
use tracing::info;

pub(super) fn article_list(app: &mut App, target: &crate::router::RouteMatch) -> Result<Next> {
    let page = page_of(&target.path);
    let params = ListParams::new(page, PAGE_SIZE);
    let list = match app.spinner("Loading posts...", || api::list_posts(&app.client, &params)) {
        Ok(res) => res.into_data(),
        // already reported by the client
        Err(_) => {
            return match choose("Could not load posts", &["Retry", "Exit"])? {
                "Retry" => Ok(Next::go(target.path.clone())),
                _ => Ok(Next::Exit),
            }
        }
    };

    let pages = list.page_count(PAGE_SIZE).max(1);
    println!();
    println!("GoPress | page {page} of {pages} | {} posts", list.total_count);
    if list.posts.is_empty() {
        println!("  (nothing here yet)");
    }
    for post in &list.posts {
        print_summary(post);
    }
    println!();

    let mut options = Vec::new();
    if !list.posts.is_empty() {
        options.push("Read a post");
    }
    if u64::from(page) < pages {
        options.push("Next page");
    }
    if page > 1 {
        options.push("Previous page");
    }
    options.push("Admin panel");
    if app.tokens().is_authenticated() {
        options.push("Log out");
    } else {
        options.extend(["Log in", "Register"]);
    }
    options.push("Exit");

    Ok(match choose("What next?", &options)? {
        "Read a post" => match pick_post(&list.posts)? {
            Some(id) => Next::go(format!("/posts/{id}")),
            None => Next::go(target.path.clone()),
        },
        "Next page" => Next::go(format!("{HOME_PATH}?page={}", page + 1)),
        "Previous page" => Next::go(format!("{HOME_PATH}?page={}", page - 1)),
        "Admin panel" => Next::go(ADMIN_PATH),
        "Log out" => app.logout(),
        "Log in" => Next::go(LOGIN_PATH),
        "Register" => Next::go(REGISTER_PATH),
        _ => Next::Exit,
    })
}

pub(super) fn article_detail(app: &mut App, target: &crate::router::RouteMatch) -> Result<Next> {
    let Some(id) = target.param("id").and_then(|id| id.parse::<u64>().ok()) else {
        println!("Invalid post id.");
        return Ok(Next::go(HOME_PATH));
    };

    if let Ok(res) = app.spinner("Loading post...", || api::get_post(&app.client, id)) {
        print_post(res.data());
    }

    Ok(match choose("What next?", &["Back to posts", "Exit"])? {
        "Back to posts" => Next::go(HOME_PATH),
        _ => Next::Exit,
    })
}

/// Collect credentials, log in and store the token.
pub(super) fn login(app: &mut App) -> Result<Next> {
    println!("\nLog in");
    let credentials = prompt_credentials(false)?;

    match app.spinner("Logging in...", || api::login(&app.client, &credentials)) {
        Ok(res) => {
            info!(username = %credentials.username, "logged in");
            println!("Welcome {}!", credentials.username);
            Ok(app.complete_login(res.into_data().token))
        }
        Err(_) => Ok(match choose("Login failed", &["Try again", "Register", "Back to posts"])? {
            "Try again" => Next::go(LOGIN_PATH),
            "Register" => Next::go(REGISTER_PATH),
            _ => {
                app.after_login = None;
                Next::go(HOME_PATH)
            }
        }),
    }
}

pub(super) fn register(app: &mut App) -> Result<Next> {
    println!("\nCreate an account");
    let credentials = prompt_credentials(true)?;

    match app.spinner("Registering...", || api::register(&app.client, &credentials)) {
        Ok(_) => {
            info!(username = %credentials.username, "registered");
            println!("Registered successfully, please log in.");
            Ok(Next::go(LOGIN_PATH))
        }
        Err(_) => Ok(match choose("Registration failed", &["Try again", "Back to posts"])? {
            "Try again" => Next::go(REGISTER_PATH),
            _ => Next::go(HOME_PATH),
        }),
    }
}

fn prompt_credentials(confirm: bool) -> Result<Credentials> {
    let username: String = Input::new().with_prompt("Username").interact_text()?;
    // `Password` hides input in terminal for passwords.
    let mut prompt = Password::new();
    prompt.with_prompt("Password");
    if confirm {
        prompt.with_confirmation("Repeat password", "Passwords do not match");
    }
    let password = prompt.interact()?;
    Ok(Credentials { username, password })
}

/// Let the user pick one of `posts`; `None` means cancel.
pub(super) fn pick_post(posts: &[Post]) -> Result<Option<u64>> {
    let mut labels: Vec<String> = posts.iter().map(|p| format!("#{} {}", p.id, p.title)).collect();
    labels.push("Cancel".into());
    let idx = dialoguer::Select::new()
        .with_prompt("Which post?")
        .items(&labels)
        .default(0)
        .interact()?;
    Ok(posts.get(idx).map(|p| p.id))
}

fn print_summary(post: &Post) {
    println!(
        "  #{:<4} {}  ({})",
        post.id,
        post.title,
        post.author().unwrap_or("unknown author")
    );
    if !post.summary.is_empty() {
        println!("        {}", post.summary);
    }
}

fn print_post(post: &Post) {
    println!();
    println!("{}", post.title);
    let mut meta = vec![format!("by {}", post.author().unwrap_or("unknown author"))];
    if let Some(category) = &post.category {
        meta.push(format!("in {}", category.name));
    }
    if let Some(created) = &post.created_at {
        meta.push(created.clone());
    }
    println!("{}", meta.join(" | "));
    if !post.tags.is_empty() {
        let tags: Vec<&str> = post.tags.iter().map(|t| t.name.as_str()).collect();
        println!("tags: {}", tags.join(", "));
    }
    println!();
    println!("{}", post.content);
    println!();
}
