//! # Purchase Event Model
//!
//! The order webhook payload as produced by the commerce platform, plus
//! the matcher that decides how many licenses a line item is worth.
//!
//! Fields use `#[serde(default)]` throughout — webhook payloads evolve and
//! arrive with fields missing, and `serde(deny_unknown_fields)` is
//! intentionally NOT used.

use std::sync::OnceLock;

use regex::Regex;
use serde::Deserialize;

use themekey_core::Contact;

/// A purchase event (order webhook payload). Consumed, never produced.
#[derive(Debug, Clone, Deserialize)]
pub struct PurchaseEvent {
    /// Numeric order identifier assigned by the platform.
    #[serde(default)]
    pub id: Option<i64>,
    /// Human-facing order number; preferred over `id` for references.
    #[serde(default)]
    pub order_number: Option<String>,
    /// The buyer, when the platform shares it.
    #[serde(default)]
    pub customer: Option<Customer>,
    /// Purchased items.
    #[serde(default)]
    pub line_items: Vec<LineItem>,
    /// Order total, as a decimal string.
    #[serde(default)]
    pub total_price: Option<String>,
    /// ISO currency code.
    #[serde(default)]
    pub currency: Option<String>,
}

/// Buyer details from the order webhook.
#[derive(Debug, Clone, Deserialize)]
pub struct Customer {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

/// One purchased item.
#[derive(Debug, Clone, Deserialize)]
pub struct LineItem {
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

impl PurchaseEvent {
    /// The reference used on issued records: the order number when present,
    /// otherwise the numeric id.
    pub fn order_ref(&self) -> String {
        if let Some(number) = self.order_number.as_deref() {
            if !number.is_empty() {
                return number.to_string();
            }
        }
        self.id.map(|id| id.to_string()).unwrap_or_default()
    }

    /// Buyer contact, when the webhook carried an email.
    pub fn buyer(&self) -> Option<Contact> {
        let customer = self.customer.as_ref()?;
        let email = customer.email.as_deref()?.trim();
        if email.is_empty() {
            return None;
        }
        let name = format!(
            "{} {}",
            customer.first_name.as_deref().unwrap_or_default(),
            customer.last_name.as_deref().unwrap_or_default(),
        )
        .trim()
        .to_string();
        Some(Contact::new(email, name))
    }
}

// ─── Line-Item Matching ──────────────────────────────────────────────

/// Pattern like `"3 licenses"` / `"3 licencias"` in a line-item title,
/// marking a bundle product that carries multiple licenses per unit.
fn bundle_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)(\d+)\s*licen(?:se|cia)s?").expect("bundle pattern is valid")
    })
}

/// Decides which line items are theme purchases and how many licenses
/// each is worth.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductMatch {
    /// Exact SKU of the theme product.
    pub sku: String,
    /// Title substring that also identifies the theme product.
    pub title_marker: String,
}

impl Default for ProductMatch {
    fn default() -> Self {
        Self {
            sku: "ThemeKey".to_string(),
            title_marker: "ThemeKey Theme".to_string(),
        }
    }
}

impl ProductMatch {
    /// Whether `item` is a theme purchase.
    pub fn matches(&self, item: &LineItem) -> bool {
        if item.sku.as_deref() == Some(self.sku.as_str()) {
            return true;
        }
        item.title
            .as_deref()
            .is_some_and(|title| title.contains(&self.title_marker))
    }

    /// Number of licenses `item` is worth: 0 for non-theme items,
    /// otherwise `quantity`, multiplied by the bundle count when the title
    /// advertises one (`"… — 3 licenses"`).
    pub fn licenses_for(&self, item: &LineItem) -> u32 {
        if !self.matches(item) {
            return 0;
        }
        let per_unit = item
            .title
            .as_deref()
            .and_then(|title| bundle_pattern().captures(title))
            .and_then(|caps| caps[1].parse::<u32>().ok())
            .unwrap_or(1);
        item.quantity.saturating_mul(per_unit)
    }

    /// Total licenses owed for an order.
    pub fn total_licenses(&self, event: &PurchaseEvent) -> u32 {
        event
            .line_items
            .iter()
            .map(|item| self.licenses_for(item))
            .sum()
    }
}
