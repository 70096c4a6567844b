// Administrative endpoints under `/admin`. The server rejects these with
// a 401 envelope when no valid token is attached.

use crate::error::Result;
use crate::http::{ApiRequest, ApiResponse, HttpClient};
use crate::models::{Category, ListParams, NameRequest, Post, PostDraft, PostList, Tag};
use serde_json::Value;

/// The two name-only collections managed from the admin panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Taxonomy {
    Categories,
    Tags,
}

impl Taxonomy {
    fn path(self) -> &'static str {
        match self {
            Taxonomy::Categories => "/admin/categories",
            Taxonomy::Tags => "/admin/tags",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Taxonomy::Categories => "category",
            Taxonomy::Tags => "tag",
        }
    }
}

pub fn list_terms(client: &HttpClient, kind: Taxonomy) -> Result<ApiResponse<Vec<Category>>> {
    client.send(ApiRequest::get(kind.path()))
}

pub fn create_term(
    client: &HttpClient,
    kind: Taxonomy,
    name: &str,
) -> Result<ApiResponse<Category>> {
    let body = NameRequest { name: name.to_string() };
    client.send(ApiRequest::post(kind.path()).json(&body)?)
}

pub fn update_term(
    client: &HttpClient,
    kind: Taxonomy,
    id: u64,
    name: &str,
) -> Result<ApiResponse<Category>> {
    let body = NameRequest { name: name.to_string() };
    client.send(ApiRequest::put(format!("{}/{id}", kind.path())).json(&body)?)
}

pub fn delete_term(client: &HttpClient, kind: Taxonomy, id: u64) -> Result<ApiResponse<Value>> {
    client.send(ApiRequest::delete(format!("{}/{id}", kind.path())))
}

pub fn list_categories(client: &HttpClient) -> Result<ApiResponse<Vec<Category>>> {
    list_terms(client, Taxonomy::Categories)
}

pub fn list_tags(client: &HttpClient) -> Result<ApiResponse<Vec<Tag>>> {
    list_terms(client, Taxonomy::Tags)
}

pub fn list_posts(client: &HttpClient, params: &ListParams) -> Result<ApiResponse<PostList>> {
    client.send(ApiRequest::get("/admin/posts").query(params)?)
}

pub fn get_post(client: &HttpClient, id: u64) -> Result<ApiResponse<Post>> {
    client.send(ApiRequest::get(format!("/admin/posts/{id}")))
}

pub fn create_post(client: &HttpClient, draft: &PostDraft) -> Result<ApiResponse<Post>> {
    client.send(ApiRequest::post("/admin/posts").json(draft)?)
}

pub fn update_post(client: &HttpClient, id: u64, draft: &PostDraft) -> Result<ApiResponse<Post>> {
    client.send(ApiRequest::put(format!("/admin/posts/{id}")).json(draft)?)
}

pub fn delete_post(client: &HttpClient, id: u64) -> Result<ApiResponse<Value>> {
    client.send(ApiRequest::delete(format!("/admin/posts/{id}")))
}
