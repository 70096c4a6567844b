// Admin panel screens. Reaching any of these requires a token; the
// router takes care of that before they are rendered.

use super::blog::pick_post;
use super::{choose, page_of, route_part, App, Next, PAGE_SIZE};
use crate::api::{self, admin, admin::Taxonomy};
use crate::models::{Category, ListParams, PostDraft, PostStatus};
use crate::router::{RouteMatch, ADMIN_PATH, HOME_PATH};
use anyhow::Result;
use dialoguer::{Confirm, Editor, Input, MultiSelect, Select};
use tracing::info;

const POSTS_PATH: &str = "/admin/posts";

pub(super) fn dashboard(app: &mut App) -> Result<Next> {
    let who = match app.spinner("Checking session...", || api::me(&app.client)) {
        Ok(res) => res.into_data().username,
        // fall back to what the token says about itself
        Err(_) => app
            .tokens()
            .claims()
            .map(|c| c.username)
            .unwrap_or_else(|| "unknown user".into()),
    };
    println!("\nAdmin panel | signed in as {who}");

    Ok(
        match choose(
            "Manage",
            &["Posts", "Categories", "Tags", "Back to blog", "Log out", "Exit"],
        )? {
            "Posts" => Next::go(POSTS_PATH),
            "Categories" => Next::go("/admin/categories"),
            "Tags" => Next::go("/admin/tags"),
            "Back to blog" => Next::go(HOME_PATH),
            "Log out" => app.logout(),
            _ => Next::Exit,
        },
    )
}

pub(super) fn posts(app: &mut App, target: &RouteMatch) -> Result<Next> {
    let page = page_of(&target.path);
    let params = ListParams::new(page, PAGE_SIZE);
    let Ok(res) = app.spinner("Loading posts...", || admin::list_posts(&app.client, &params)) else {
        return Ok(Next::go(ADMIN_PATH));
    };
    let list = res.into_data();
    let pages = list.page_count(PAGE_SIZE).max(1);

    println!("\nPosts | page {page} of {pages} | {} total", list.total_count);
    for post in &list.posts {
        let status = post
            .status()
            .map_or_else(|| format!("status {}", post.status), |s| s.to_string());
        println!("  #{:<4} [{status}] {}", post.id, post.title);
    }

    let mut options = vec!["New post"];
    if !list.posts.is_empty() {
        options.extend(["Edit a post", "Delete a post"]);
    }
    if u64::from(page) < pages {
        options.push("Next page");
    }
    if page > 1 {
        options.push("Previous page");
    }
    options.push("Back to dashboard");

    Ok(match choose("What next?", &options)? {
        "New post" => Next::go(format!("{POSTS_PATH}/new")),
        "Edit a post" => match pick_post(&list.posts)? {
            Some(id) => Next::go(format!("{POSTS_PATH}/{id}/edit")),
            None => Next::go(target.path.clone()),
        },
        "Delete a post" => {
            if let Some(id) = pick_post(&list.posts)? {
                let sure = Confirm::new()
                    .with_prompt(format!("Delete post #{id}?"))
                    .default(false)
                    .interact()?;
                let deleted = sure
                    && app
                        .spinner("Deleting...", || admin::delete_post(&app.client, id))
                        .is_ok();
                if deleted {
                    info!(id, "post deleted");
                    println!("Post #{id} deleted.");
                }
            }
            Next::go(target.path.clone())
        }
        "Next page" => Next::go(format!("{POSTS_PATH}?page={}", page + 1)),
        "Previous page" => Next::go(format!("{POSTS_PATH}?page={}", page - 1)),
        _ => Next::go(ADMIN_PATH),
    })
}

/// Create a post, or edit one when the route carries an `:id`.
pub(super) fn post_editor(app: &mut App, target: &RouteMatch) -> Result<Next> {
    let id = match target.param("id") {
        Some(raw) => match raw.parse::<u64>() {
            Ok(id) => Some(id),
            Err(_) => {
                println!("Invalid post id.");
                return Ok(Next::go(POSTS_PATH));
            }
        },
        None => None,
    };

    let mut draft = match id {
        Some(id) => match app.spinner("Loading post...", || admin::get_post(&app.client, id)) {
            Ok(res) => PostDraft::from(res.data()),
            Err(_) => return Ok(Next::go(POSTS_PATH)),
        },
        None => PostDraft {
            title: String::new(),
            content: String::new(),
            summary: String::new(),
            status: PostStatus::Published.code(),
            category_id: 0,
            tag_ids: Vec::new(),
        },
    };

    let categories = app.spinner("Loading categories...", || {
        admin::list_categories(&app.client)
    });
    let Ok(categories) = categories else {
        return Ok(Next::go(POSTS_PATH));
    };
    let categories = categories.into_data();
    if categories.is_empty() {
        println!("Create a category first.");
        return Ok(Next::go("/admin/categories"));
    }
    let Ok(tags) = app.spinner("Loading tags...", || admin::list_tags(&app.client)) else {
        return Ok(Next::go(POSTS_PATH));
    };
    let tags = tags.into_data();

    println!("\n{}", if id.is_some() { "Edit post" } else { "New post" });
    draft.title = text("Title", &draft.title)?;
    draft.summary = text_optional("Summary", &draft.summary)?;
    if let Some(content) = Editor::new().edit(&draft.content)? {
        draft.content = content.trim_end().to_string();
    }
    if draft.content.is_empty() {
        draft.content = text("Content", "")?;
    }

    let statuses = [PostStatus::Published, PostStatus::Draft];
    let current = statuses
        .iter()
        .position(|s| s.code() == draft.status)
        .unwrap_or(0);
    let idx = Select::new()
        .with_prompt("Status")
        .items(&statuses[..])
        .default(current)
        .interact()?;
    draft.status = statuses[idx].code();

    let idx = Select::new()
        .with_prompt("Category")
        .items(&names(&categories))
        .default(categories.iter().position(|c| c.id == draft.category_id).unwrap_or(0))
        .interact()?;
    draft.category_id = categories[idx].id;

    if !tags.is_empty() {
        let checked: Vec<bool> = tags.iter().map(|t| draft.tag_ids.contains(&t.id)).collect();
        let picked = MultiSelect::new()
            .with_prompt("Tags (space to toggle)")
            .items(&names(&tags))
            .defaults(&checked)
            .interact()?;
        draft.tag_ids = picked.into_iter().map(|i| tags[i].id).collect();
    }

    let saved = app.spinner("Saving...", || match id {
        Some(id) => admin::update_post(&app.client, id, &draft),
        None => admin::create_post(&app.client, &draft),
    });
    match saved {
        Ok(res) => {
            let post = res.into_data();
            info!(id = post.id, "post saved");
            println!("Saved post #{}.", post.id);
            Ok(Next::go(POSTS_PATH))
        }
        Err(_) => Ok(match choose("Saving failed", &["Edit again", "Back to posts"])? {
            "Edit again" => Next::go(target.path.clone()),
            _ => Next::go(POSTS_PATH),
        }),
    }
}

/// List, add, rename and delete categories or tags.
pub(super) fn terms(app: &mut App, target: &RouteMatch, kind: Taxonomy) -> Result<Next> {
    let here = route_part(&target.path).to_string();
    let Ok(res) = app.spinner("Loading...", || admin::list_terms(&app.client, kind)) else {
        return Ok(Next::go(ADMIN_PATH));
    };
    let terms = res.into_data();

    let label = kind.label();
    println!("\n{}", match kind {
        Taxonomy::Categories => "Categories",
        Taxonomy::Tags => "Tags",
    });
    if terms.is_empty() {
        println!("  (none)");
    }
    for term in &terms {
        println!("  #{:<4} {}", term.id, term.name);
    }

    let add = format!("Add {label}");
    let rename = format!("Rename {label}");
    let delete = format!("Delete {label}");
    let mut options = vec![add.as_str()];
    if !terms.is_empty() {
        options.extend([rename.as_str(), delete.as_str()]);
    }
    options.push("Back to dashboard");

    let choice = choose("What next?", &options)?;
    if choice == add {
        let name = text("Name", "")?;
        if app.spinner("Saving...", || admin::create_term(&app.client, kind, &name)).is_ok() {
            info!(kind = label, %name, "created");
        }
    } else if choice == rename {
        if let Some(term) = pick_term(&terms)? {
            let name = text("New name", &term.name)?;
            let renamed = app.spinner("Saving...", || {
                admin::update_term(&app.client, kind, term.id, &name)
            });
            if renamed.is_ok() {
                info!(kind = label, id = term.id, %name, "renamed");
            }
        }
    } else if choice == delete {
        if let Some(term) = pick_term(&terms)? {
            let sure = Confirm::new()
                .with_prompt(format!("Delete {label} \"{}\"?", term.name))
                .default(false)
                .interact()?;
            let deleted = sure
                && app
                    .spinner("Deleting...", || admin::delete_term(&app.client, kind, term.id))
                    .is_ok();
            if deleted {
                info!(kind = label, id = term.id, "deleted");
            }
        }
    } else {
        return Ok(Next::go(ADMIN_PATH));
    }
    Ok(Next::go(here))
}

fn pick_term(terms: &[Category]) -> Result<Option<&Category>> {
    let mut labels = names(terms);
    labels.push("Cancel".into());
    let idx = Select::new().with_prompt("Which one?").items(&labels).default(0).interact()?;
    Ok(terms.get(idx))
}

fn names(terms: &[Category]) -> Vec<String> {
    terms.iter().map(|t| t.name.clone()).collect()
}

/// Required single-line input, pre-filled with `current` when editing.
fn text(prompt: &str, current: &str) -> Result<String> {
    let mut input = Input::<String>::new();
    input.with_prompt(prompt);
    if !current.is_empty() {
        input.default(current.to_string());
    }
    Ok(input.interact_text()?)
}

fn text_optional(prompt: &str, current: &str) -> Result<String> {
    let mut input = Input::<String>::new();
    input.with_prompt(prompt).allow_empty(true);
    if !current.is_empty() {
        input.default(current.to_string());
    }
    Ok(input.interact_text()?)
}
