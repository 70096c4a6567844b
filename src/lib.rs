// Library root
// -----------
// Terminal front-end for the GoPress blog API. The binary (`main.rs`)
// wires these modules together and runs the interactive UI.
//
// Module responsibilities:
// - `config`: base URL, timeout and state directory from the environment.
// - `storage`: durable key/value store backing client-side state.
// - `session`: the shared session token (read by router and HTTP client).
// - `notify`: where request failures are shown to the user.
// - `http`: HTTP client wrapper, bearer token in, envelope out.
// - `api`: one function per back-end endpoint.
// - `models`: request and response payloads.
// - `router`: route table and the authentication guard.
// - `ui`: terminal screens driven by the router.
pub mod api;
pub mod config;
pub mod error;
pub mod http;
pub mod models;
pub mod notify;
pub mod router;
pub mod session;
pub mod storage;
pub mod ui;

pub use config::Config;
pub use error::{ApiError, Result};
pub use http::{ApiRequest, ApiResponse, Envelope, HttpClient};
pub use router::{Navigation, Router};
pub use session::TokenStore;
