// API functions: one call each, fixed method and path.
//
// None of these handle errors themselves; failures are reported by the
// HTTP wrapper and passed straight back to the caller.

pub mod admin;

use crate::error::Result;
use crate::http::{ApiRequest, ApiResponse, HttpClient};
use crate::models::{Credentials, ListParams, LoginData, Post, PostList, Profile};
use serde_json::Value;

/// `POST /login`. The token is in `data.token`; storing it is up to the
/// caller.
pub fn login(client: &HttpClient, credentials: &Credentials) -> Result<ApiResponse<LoginData>> {
    client.send(ApiRequest::post("/login").json(credentials)?)
}

/// `POST /signup`.
pub fn register(client: &HttpClient, credentials: &Credentials) -> Result<ApiResponse<Value>> {
    client.send(ApiRequest::post("/signup").json(credentials)?)
}

/// `GET /me`, the identity behind the current token.
pub fn me(client: &HttpClient) -> Result<ApiResponse<Profile>> {
    client.send(ApiRequest::get("/me"))
}

/// `GET /posts` with paging parameters.
pub fn list_posts(client: &HttpClient, params: &ListParams) -> Result<ApiResponse<PostList>> {
    client.send(ApiRequest::get("/posts").query(params)?)
}

/// `GET /posts/{id}`.
pub fn get_post(client: &HttpClient, id: u64) -> Result<ApiResponse<Post>> {
    client.send(ApiRequest::get(format!("/posts/{id}")))
}
