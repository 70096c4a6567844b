// HTTP client wrapper for the GoPress API.
//
// Every call goes through two hooks:
// - before sending, the bearer token (if any) is attached;
// - after receiving, the `{code, message, data}` envelope is checked and
//   failures are reported to the notifier before being returned.
//
// The client is blocking: the CLI only ever has one request in flight.

use crate::config::Config;
use crate::error::{ApiError, Result, CODE_SUCCESS};
use crate::notify::{Notice, Notifier};
use crate::session::TokenStore;
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::AUTHORIZATION;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, warn};

/// Message used when a failed envelope carries no message of its own.
const FALLBACK_MESSAGE: &str = "Error";

/// The wrapper every GoPress response is delivered in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T = Value> {
    pub code: i64,
    pub message: String,
    pub data: T,
}

#[derive(Deserialize)]
struct RawEnvelope {
    code: i64,
    #[serde(default)]
    message: String,
    #[serde(default)]
    data: Value,
}

/// A successful call: HTTP status plus the complete envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse<T = Value> {
    pub status: u16,
    pub envelope: Envelope<T>,
}

impl<T> ApiResponse<T> {
    pub fn data(&self) -> &T {
        &self.envelope.data
    }

    pub fn into_data(self) -> T {
        self.envelope.data
    }

    pub fn message(&self) -> &str {
        &self.envelope.message
    }
}

/// Method, path, query and body of one API call.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        ApiRequest {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Query parameters, passed through as given.
    ///
    /// `params` must serialize to a flat object. Strings, numbers and
    /// booleans become `key=value` pairs and `null` fields are left out;
    /// nested arrays or objects are rejected here rather than at send.
    pub fn query<Q: Serialize + ?Sized>(mut self, params: &Q) -> Result<Self> {
        let Value::Object(fields) = serde_json::to_value(params)? else {
            return Err(ApiError::Config(format!(
                "query for {} must be a set of key/value pairs",
                self.path
            )));
        };
        for (key, value) in fields {
            let value = match value {
                Value::Null => continue,
                Value::String(s) => s,
                Value::Bool(_) | Value::Number(_) => value.to_string(),
                Value::Array(_) | Value::Object(_) => {
                    return Err(ApiError::Config(format!(
                        "query parameter {key:?} for {} is not a plain value",
                        self.path
                    )))
                }
            };
            self.query.push((key, value));
        }
        Ok(self)
    }

    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }
}

/// Configured client shared by all API functions.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    tokens: TokenStore,
    notifier: Arc<dyn Notifier>,
    notice_duration: Duration,
}

impl HttpClient {
    pub fn new(
        config: &Config,
        tokens: TokenStore,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ApiError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(HttpClient {
            client,
            base_url: config.base_url.clone(),
            tokens,
            notifier,
            notice_duration: config.notice_duration,
        })
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    /// Perform `request` and decode `data` as `T`.
    pub fn send<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<ApiResponse<T>> {
        let outcome = self.transport(&request);
        let response = self.on_response(&request, outcome)?;
        let ApiResponse { status, envelope } = response;
        let data = serde_json::from_value(envelope.data)
            .map_err(|e| self.report(ApiError::Decode(e)))?;
        Ok(ApiResponse {
            status,
            envelope: Envelope {
                code: envelope.code,
                message: envelope.message,
                data,
            },
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Request hook: attach the bearer token when logged in.
    fn on_request(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.tokens.get() {
            Some(token) => builder.header(AUTHORIZATION, format!("Bearer {token}")),
            None => builder,
        }
    }

    fn transport(&self, request: &ApiRequest) -> Result<(u16, Vec<u8>)> {
        debug!(
            method = %request.method,
            path = %request.path,
            authenticated = self.tokens.is_authenticated(),
            "sending request"
        );
        let mut builder = self
            .client
            .request(request.method.clone(), self.url(&request.path));
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let res = self.on_request(builder).send()?;
        let status = res.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
            });
        }
        let body = res.bytes()?;
        Ok((status.as_u16(), body.to_vec()))
    }

    /// Response hook: report failures, unwrap the envelope.
    fn on_response(
        &self,
        request: &ApiRequest,
        outcome: Result<(u16, Vec<u8>)>,
    ) -> Result<ApiResponse> {
        let (status, body) = match outcome {
            Ok(parts) => parts,
            Err(e) => {
                error!(path = %request.path, error = %e, "request failed");
                return Err(self.report(e));
            }
        };
        interpret(status, &body).map_err(|e| {
            if e.is_unauthorized() {
                // TODO: decide whether a 401 should clear the session and
                // send the user back to the login screen. Until then the
                // token is left as it is.
                warn!(path = %request.path, "request rejected as unauthorized");
            } else {
                warn!(path = %request.path, error = %e, "request rejected");
            }
            self.report(e)
        })
    }

    fn report(&self, err: ApiError) -> ApiError {
        self.notifier.notify(Notice {
            message: err.to_string(),
            duration: self.notice_duration,
        });
        err
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.base_url)
            .field("tokens", &self.tokens)
            .finish()
    }
}

/// Turn a 2xx body into either a response or a business error.
fn interpret(status: u16, body: &[u8]) -> Result<ApiResponse> {
    let raw: RawEnvelope = serde_json::from_slice(body)?;
    if raw.code != CODE_SUCCESS {
        let message = if raw.message.is_empty() {
            FALLBACK_MESSAGE.to_string()
        } else {
            raw.message
        };
        return Err(ApiError::Business {
            code: raw.code,
            message,
        });
    }
    Ok(ApiResponse {
        status,
        envelope: Envelope {
            code: raw.code,
            message: raw.message,
            data: raw.data,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_keeps_the_whole_envelope() {
        let body = json!({"code": 200, "message": "success", "data": {"id": 1}}).to_string();
        let res = interpret(200, body.as_bytes()).unwrap();
        assert_eq!(res.status, 200);
        assert_eq!(res.envelope.code, 200);
        assert_eq!(res.message(), "success");
        assert_eq!(res.data(), &json!({"id": 1}));
    }

    #[test]
    fn missing_data_is_null() {
        let res = interpret(200, br#"{"code":200,"message":"success"}"#).unwrap();
        assert_eq!(res.into_data(), Value::Null);
    }

    #[test]
    fn non_200_code_is_a_business_error() {
        let body = br#"{"code":401,"message":"unauthorized","data":null}"#;
        let err = interpret(200, body).unwrap_err();
        assert!(err.is_unauthorized());
        assert_eq!(err.to_string(), "unauthorized");
    }

    #[test]
    fn empty_message_falls_back() {
        let err = interpret(200, br#"{"code":500,"message":""}"#).unwrap_err();
        assert!(matches!(err, ApiError::Business { code: 500, ref message } if message == "Error"));
    }

    #[test]
    fn non_envelope_body_is_a_decode_error() {
        assert!(matches!(interpret(200, b"<html>"), Err(ApiError::Decode(_))));
        assert!(matches!(interpret(200, br#"{"data":1}"#), Err(ApiError::Decode(_))));
    }

    #[test]
    fn request_builders() {
        let req = ApiRequest::get("/posts")
            .query(&json!({"page": 1, "pageSize": 10}))
            .unwrap();
        assert_eq!(req.method, Method::GET);
        assert_eq!(
            req.query,
            vec![
                ("page".to_string(), "1".to_string()),
                ("pageSize".to_string(), "10".to_string()),
            ]
        );
        assert_eq!(req.body, None);

        let req = ApiRequest::post("/login").json(&json!({"username": "a"})).unwrap();
        assert_eq!(req.method, Method::POST);
        assert!(req.body.is_some());
        assert!(req.query.is_empty());
    }

    #[test]
    fn query_skips_null_and_stringifies_scalars() {
        let req = ApiRequest::get("/posts")
            .query(&json!({"q": "rust", "draft": false, "category": null}))
            .unwrap();
        let mut pairs = req.query;
        pairs.sort();
        assert_eq!(
            pairs,
            vec![
                ("draft".to_string(), "false".to_string()),
                ("q".to_string(), "rust".to_string()),
            ]
        );
    }

    #[test]
    fn nested_query_values_are_rejected_when_built() {
        let err = ApiRequest::get("/posts")
            .query(&crate::models::ListParams::new(1, 10).with("tags", json!([1, 2])))
            .unwrap_err();
        assert!(matches!(err, ApiError::Config(ref m) if m.contains("tags")), "{err}");

        let err = ApiRequest::get("/posts").query(&[1, 2]).unwrap_err();
        assert!(matches!(err, ApiError::Config(_)));
    }
}
