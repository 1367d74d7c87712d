//! # Canonical Store Identity
//!
//! Defines [`StoreIdentity`], the canonical comparison key for the store
//! holding a license. Client themes report their identity in whatever shape
//! the storefront hands them — a bare hostname, a full URL, or a nested
//! subdomain of the hosted-storefront suffix. All of these must compare
//! equal when they denote the same store.
//!
//! ## Normalization Rules
//!
//! 1. Blank input normalizes to the empty identity ("unbound").
//! 2. URI scheme (`http://`, `https://`), any path, and a trailing `:port`
//!    are stripped; the remaining host is lowercased.
//! 3. If the host contains the hosted-storefront suffix
//!    (`.myshopify.com`), the identity collapses to the single label
//!    immediately preceding the suffix plus the suffix itself, so
//!    `checkout.foo.myshopify.com` and `foo.myshopify.com` are the same
//!    store.
//!
//! Normalization is total and idempotent — it never fails, and applying it
//! twice yields the same identity.

use serde::{Deserialize, Serialize};

/// The hosted-storefront domain suffix that identifies platform stores.
///
/// Any host containing this marker is collapsed to its canonical
/// `<label>.myshopify.com` form; custom domains pass through as bare hosts.
pub const STOREFRONT_SUFFIX: &str = ".myshopify.com";

/// Canonical identity of the store holding (or claiming) a license.
///
/// Construct via [`StoreIdentity::normalize`]; the inner string is always in
/// canonical form. The empty identity is valid and means "unbound".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoreIdentity(String);

impl StoreIdentity {
    /// The empty (unbound) identity.
    pub fn unbound() -> Self {
        Self(String::new())
    }

    /// Normalize a raw identity string into its canonical comparison form.
    ///
    /// Total function: every input produces a canonical identity, and blank
    /// input produces the empty identity rather than an error.
    pub fn normalize(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Self::unbound();
        }

        let mut host = trimmed;
        for scheme in ["https://", "http://"] {
            if let Some(rest) = host.strip_prefix(scheme) {
                host = rest;
                break;
            }
        }
        if let Some(slash) = host.find('/') {
            host = &host[..slash];
        }
        if let Some(colon) = host.find(':') {
            host = &host[..colon];
        }

        let host = host.to_ascii_lowercase();

        if let Some(pos) = host.find(STOREFRONT_SUFFIX) {
            let prefix = &host[..pos];
            // The label immediately preceding the suffix; nested subdomains
            // (checkout.foo.myshopify.com) collapse to the store label.
            let label = prefix.rsplit('.').next().unwrap_or_default();
            if !label.is_empty() {
                return Self(format!("{label}{STOREFRONT_SUFFIX}"));
            }
        }

        Self(host)
    }

    /// The canonical identity as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is the empty (unbound) identity.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for StoreIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn bare_host_passes_through() {
        let id = StoreIdentity::normalize("foo.myshopify.com");
        assert_eq!(id.as_str(), "foo.myshopify.com");
    }

    #[test]
    fn nested_subdomain_collapses_to_store_label() {
        let id = StoreIdentity::normalize("checkout.foo.myshopify.com");
        assert_eq!(id.as_str(), "foo.myshopify.com");
    }

    #[test]
    fn deeply_nested_subdomain_collapses() {
        let id = StoreIdentity::normalize("a.b.foo.myshopify.com");
        assert_eq!(id.as_str(), "foo.myshopify.com");
    }

    #[test]
    fn scheme_and_port_stripped() {
        let id = StoreIdentity::normalize("https://foo.myshopify.com:443");
        assert_eq!(id.as_str(), "foo.myshopify.com");
    }

    #[test]
    fn http_scheme_stripped() {
        let id = StoreIdentity::normalize("http://foo.myshopify.com");
        assert_eq!(id.as_str(), "foo.myshopify.com");
    }

    #[test]
    fn path_stripped() {
        let id = StoreIdentity::normalize("https://foo.myshopify.com/admin/themes");
        assert_eq!(id.as_str(), "foo.myshopify.com");
    }

    #[test]
    fn custom_domain_keeps_bare_host() {
        let id = StoreIdentity::normalize("https://shop.example.com:8443/checkout");
        assert_eq!(id.as_str(), "shop.example.com");
    }

    #[test]
    fn host_is_lowercased() {
        let id = StoreIdentity::normalize("FOO.MyShopify.com");
        assert_eq!(id.as_str(), "foo.myshopify.com");
    }

    #[test]
    fn blank_input_is_unbound() {
        assert!(StoreIdentity::normalize("").is_empty());
        assert!(StoreIdentity::normalize("   ").is_empty());
        assert_eq!(StoreIdentity::normalize(""), StoreIdentity::unbound());
    }

    #[test]
    fn collapse_equivalence() {
        assert_eq!(
            StoreIdentity::normalize("a.b.myshopify.com"),
            StoreIdentity::normalize("b.myshopify.com"),
        );
    }

    #[test]
    fn serde_is_transparent() {
        let id = StoreIdentity::normalize("foo.myshopify.com");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"foo.myshopify.com\"");
        let parsed: StoreIdentity = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }

    proptest! {
        #[test]
        fn normalization_is_idempotent(raw in "\\PC{0,64}") {
            let once = StoreIdentity::normalize(&raw);
            let twice = StoreIdentity::normalize(once.as_str());
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn storefront_hosts_collapse_to_single_label(
            sub in "[a-z]{1,8}",
            label in "[a-z][a-z0-9-]{0,12}",
        ) {
            let nested = format!("{sub}.{label}.myshopify.com");
            let canonical = StoreIdentity::normalize(&nested);
            prop_assert_eq!(
                canonical.as_str(),
                format!("{label}{}", STOREFRONT_SUFFIX)
            );
        }
    }
}
