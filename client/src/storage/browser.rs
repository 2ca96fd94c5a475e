//! Browser-backed tiers: `document.cookie` and `window.localStorage`.

use time::Duration;
use wasm_bindgen::JsCast;

use super::CredentialTier;
use super::cookie::{cookie_value, removal_cookie_string, set_cookie_string};

fn html_document() -> Option<web_sys::HtmlDocument> {
    web_sys::window()?
        .document()?
        .dyn_into::<web_sys::HtmlDocument>()
        .ok()
}

fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

/// Edge-visible tier. The browser enforces `Max-Age` natively.
#[derive(Clone, Copy, Debug)]
pub struct CookieTier {
    secure: bool,
}

impl CookieTier {
    #[must_use]
    pub fn new(secure: bool) -> Self {
        Self { secure }
    }
}

impl CredentialTier for CookieTier {
    fn read(&self, key: &str) -> Option<String> {
        let raw = html_document()?.cookie().ok()?;
        cookie_value(&raw, key)
    }

    fn write(&self, key: &str, value: &str, ttl: Option<Duration>) {
        let Some(doc) = html_document() else {
            log::warn!("cookie write skipped: no document");
            return;
        };
        if doc
            .set_cookie(&set_cookie_string(key, value, ttl, self.secure))
            .is_err()
        {
            log::warn!("cookie write rejected for {key}");
        }
    }

    fn remove(&self, key: &str) {
        if let Some(doc) = html_document() {
            let _ = doc.set_cookie(&removal_cookie_string(key));
        }
    }
}

/// Page-only tier. `localStorage` has no expiry; its copy of the token can
/// outlive the cookie, which is why gating reads only the cookie.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalStorageTier;

impl CredentialTier for LocalStorageTier {
    fn read(&self, key: &str) -> Option<String> {
        local_storage()?.get_item(key).ok().flatten()
    }

    fn write(&self, key: &str, value: &str, _ttl: Option<Duration>) {
        let Some(storage) = local_storage() else {
            log::warn!("localStorage unavailable; {key} not persisted");
            return;
        };
        let _ = storage.set_item(key, value);
    }

    fn remove(&self, key: &str) {
        if let Some(storage) = local_storage() {
            let _ = storage.remove_item(key);
        }
    }
}
