// Session token store.
//
// A single optional bearer token shared by the router guard and the HTTP
// client. Every write goes to memory and to the durable store so the
// session survives a restart of the CLI.

use crate::error::Result;
use crate::storage::KeyValueStore;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use serde::Deserialize;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, warn};

/// Storage key holding the raw token string.
pub const TOKEN_KEY: &str = "token";

/// Cheap-to-clone handle; all clones observe the same token.
#[derive(Clone)]
pub struct TokenStore {
    inner: Arc<Inner>,
}

struct Inner {
    token: RwLock<Option<String>>,
    backend: Arc<dyn KeyValueStore>,
}

/// Identity fields the back-end puts in its JWT payload. Only used for
/// display; the signature is never checked on the client.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SessionClaims {
    pub user_id: u64,
    pub username: String,
}

impl TokenStore {
    /// Open the store, picking up whatever token was persisted last.
    ///
    /// A persisted token that cannot be read counts as logged out; the
    /// broken entry is removed if possible.
    pub fn load(backend: Arc<dyn KeyValueStore>) -> Self {
        let token = match backend.get(TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                warn!(error = %e, "saved session is unreadable, starting logged out");
                if let Err(e) = backend.remove(TOKEN_KEY) {
                    warn!(error = %e, "could not remove unreadable session");
                }
                None
            }
        };
        debug!(present = token.is_some(), "loaded session token");
        TokenStore {
            inner: Arc::new(Inner {
                token: RwLock::new(token),
                backend,
            }),
        }
    }

    pub fn get(&self) -> Option<String> {
        self.inner
            .token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner
            .token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Replace the token. `None` (or an empty string) logs out and
    /// removes the persisted key.
    ///
    /// The in-memory value is updated even if persisting fails, so the
    /// current run keeps working; the storage error is still returned.
    pub fn set(&self, token: Option<String>) -> Result<()> {
        let token = token.filter(|t| !t.is_empty());
        *self
            .inner
            .token
            .write()
            .unwrap_or_else(PoisonError::into_inner) = token.clone();

        match token {
            Some(t) => self.inner.backend.set(TOKEN_KEY, &t)?,
            None => self.inner.backend.remove(TOKEN_KEY)?,
        }
        debug!(present = self.is_authenticated(), "session token updated");
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        self.set(None)
    }

    /// Decode the JWT payload of the current token, if it looks like one.
    pub fn claims(&self) -> Option<SessionClaims> {
        self.get().as_deref().and_then(decode_claims)
    }
}

impl std::fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenStore")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

fn decode_claims(token: &str) -> Option<SessionClaims> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    serde_json::from_slice(&bytes).ok()
}
