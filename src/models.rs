// Data shapes exchanged with the GoPress back-end.
//
// Database models are serialized by the server with their Go field names
// (`ID`, `Title`, `CreatedAt`, ...); request payloads and DTOs use
// snake_case or camelCase keys. The serde attributes below mirror that.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Credentials for `/login` and `/signup`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// `data` of a successful login.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LoginData {
    pub token: String,
}

/// `data` of `/me`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub user_id: u64,
    pub username: String,
}

/// Query parameters for post listings. Extra keys are sent verbatim.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ListParams {
    pub page: u32,
    #[serde(rename = "pageSize")]
    pub page_size: u32,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl ListParams {
    pub fn new(page: u32, page_size: u32) -> Self {
        ListParams {
            page,
            page_size,
            extra: BTreeMap::new(),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

impl Default for ListParams {
    /// The server's own defaults: first page, ten per page.
    fn default() -> Self {
        Self::new(1, 10)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "PascalCase")]
pub struct User {
    #[serde(rename = "ID")]
    pub id: u64,
    pub username: String,
    #[serde(default)]
    pub nickname: String,
    #[serde(default)]
    pub email: String,
    /// 0 = admin, 1 = regular user.
    #[serde(default)]
    pub role: i32,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "PascalCase")]
pub struct Category {
    #[serde(rename = "ID")]
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Tags have the same shape as categories.
pub type Tag = Category;

/// Publication state of a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostStatus {
    Draft,
    Published,
}

impl PostStatus {
    pub fn code(self) -> i32 {
        match self {
            PostStatus::Draft => 0,
            PostStatus::Published => 1,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(PostStatus::Draft),
            1 => Some(PostStatus::Published),
            _ => None,
        }
    }
}

impl std::fmt::Display for PostStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            PostStatus::Draft => "draft",
            PostStatus::Published => "published",
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "PascalCase")]
pub struct Post {
    #[serde(rename = "ID")]
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub status: i32,
    #[serde(rename = "UserID", default)]
    pub user_id: u64,
    #[serde(default)]
    pub user: Option<User>,
    #[serde(rename = "CategoryID", default)]
    pub category_id: u64,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl Post {
    pub fn status(&self) -> Option<PostStatus> {
        PostStatus::from_code(self.status)
    }

    pub fn author(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.username.as_str())
    }
}

/// One page of posts plus the total count across all pages.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct PostList {
    #[serde(rename = "post", default)]
    pub posts: Vec<Post>,
    #[serde(default)]
    pub total_count: u64,
}

impl PostList {
    /// Number of pages at `page_size` posts per page.
    pub fn page_count(&self, page_size: u32) -> u64 {
        if page_size == 0 {
            return 0;
        }
        self.total_count.div_ceil(u64::from(page_size))
    }
}

/// Body for creating or updating a post through the admin API.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PostDraft {
    pub title: String,
    pub content: String,
    pub summary: String,
    pub status: i32,
    pub category_id: u64,
    pub tag_ids: Vec<u64>,
}

impl From<&Post> for PostDraft {
    fn from(post: &Post) -> Self {
        PostDraft {
            title: post.title.clone(),
            content: post.content.clone(),
            summary: post.summary.clone(),
            status: post.status,
            category_id: post.category_id,
            tag_ids: post.tags.iter().map(|t| t.id).collect(),
        }
    }
}

/// Body for creating or renaming a category or tag.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct NameRequest {
    pub name: String,
}
