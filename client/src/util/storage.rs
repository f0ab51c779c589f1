//! Persistence of the signed-in identity across the two browser storage scopes.
//!
//! SYSTEM CONTEXT
//! ==============
//! "Remember me" logins live in `localStorage`; everything else lives in
//! `sessionStorage` and disappears with the tab. Both scopes use the same keys
//! and go through one [`KeyValueStore`] abstraction so the auth logic can be
//! tested against [`MemoryStore`].

#[cfg(test)]
#[path = "storage_test.rs"]
mod storage_test;

use std::cell::RefCell;
use std::collections::HashMap;

use crate::state::auth::Identity;

pub const TOKEN_KEY: &str = "authToken";
pub const USERNAME_KEY: &str = "username";
pub const SUPERUSER_KEY: &str = "isSuperuser";

/// Which browser storage scope an identity is written to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Durability {
    /// `localStorage`: survives browser restarts.
    Durable,
    /// `sessionStorage`: cleared when the tab closes.
    Session,
}

impl Durability {
    #[must_use]
    pub fn from_remember(remember: bool) -> Self {
        if remember { Self::Durable } else { Self::Session }
    }
}

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// `localStorage`/`sessionStorage` in the browser; inert during server
/// rendering.
#[derive(Clone, Copy, Debug)]
pub struct BrowserStore {
    scope: Durability,
}

impl BrowserStore {
    #[must_use]
    pub fn new(scope: Durability) -> Self {
        Self { scope }
    }

    #[cfg(feature = "hydrate")]
    fn storage(self) -> Option<web_sys::Storage> {
        let window = web_sys::window()?;
        let storage = match self.scope {
            Durability::Durable => window.local_storage(),
            Durability::Session => window.session_storage(),
        };
        storage.ok().flatten()
    }
}

impl KeyValueStore for BrowserStore {
    fn get(&self, key: &str) -> Option<String> {
        #[cfg(feature = "hydrate")]
        {
            self.storage()?.get_item(key).ok().flatten()
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (self.scope, key);
            None
        }
    }

    fn set(&self, key: &str, value: &str) {
        #[cfg(feature = "hydrate")]
        {
            if let Some(storage) = self.storage() {
                if storage.set_item(key, value).is_err() {
                    log::warn!("storage write failed for {key}");
                }
            }
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (key, value);
        }
    }

    fn remove(&self, key: &str) {
        #[cfg(feature = "hydrate")]
        {
            if let Some(storage) = self.storage() {
                let _ = storage.remove_item(key);
            }
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = key;
        }
    }
}

/// In-memory store with the same semantics as browser storage.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries.borrow_mut().insert(key.to_owned(), value.to_owned());
    }

    fn remove(&self, key: &str) {
        self.entries.borrow_mut().remove(key);
    }
}

/// Both storage scopes, read and written as a unit.
#[derive(Debug)]
pub struct IdentityStore<S = BrowserStore> {
    durable: S,
    session: S,
}

impl IdentityStore<BrowserStore> {
    #[must_use]
    pub fn browser() -> Self {
        Self::new(BrowserStore::new(Durability::Durable), BrowserStore::new(Durability::Session))
    }
}

impl<S: KeyValueStore> IdentityStore<S> {
    pub fn new(durable: S, session: S) -> Self {
        Self { durable, session }
    }

    pub fn scope(&self, durability: Durability) -> &S {
        match durability {
            Durability::Durable => &self.durable,
            Durability::Session => &self.session,
        }
    }

    /// The persisted identity, durable scope first. A scope only counts when
    /// it holds a non-empty token.
    pub fn load(&self) -> Option<Identity> {
        [Durability::Durable, Durability::Session]
            .into_iter()
            .find_map(|d| read_identity(self.scope(d)))
    }

    /// Persist `identity` in exactly one scope; the other is cleared so a
    /// stale login can never shadow the new one.
    pub fn save(&self, identity: &Identity, durability: Durability) {
        self.clear();
        let store = self.scope(durability);
        store.set(TOKEN_KEY, &identity.token);
        store.set(USERNAME_KEY, &identity.username);
        store.set(SUPERUSER_KEY, if identity.is_superuser { "true" } else { "false" });
    }

    pub fn clear(&self) {
        for store in [&self.durable, &self.session] {
            for key in [TOKEN_KEY, USERNAME_KEY, SUPERUSER_KEY] {
                store.remove(key);
            }
        }
    }

    pub fn token(&self) -> Option<String> {
        self.load().map(|identity| identity.token)
    }
}

fn read_identity(store: &impl KeyValueStore) -> Option<Identity> {
    let token = store.get(TOKEN_KEY).filter(|t| !t.is_empty())?;
    Some(Identity {
        token,
        username: store.get(USERNAME_KEY).unwrap_or_default(),
        is_superuser: store.get(SUPERUSER_KEY).is_some_and(|v| v == "true"),
    })
}
