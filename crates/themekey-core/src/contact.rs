//! Buyer contact details attached to a license at issuance.

use serde::{Deserialize, Serialize};

/// The buyer a license batch was issued to. Set at creation, immutable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    /// Delivery address for the license email.
    pub email: String,
    /// Display name; may be empty when the order carried no name.
    #[serde(default)]
    pub name: String,
}

impl Contact {
    /// Create a contact, trimming surrounding whitespace.
    pub fn new(email: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            email: email.into().trim().to_string(),
            name: name.into().trim().to_string(),
        }
    }

    /// Name to address the buyer by in outbound mail.
    pub fn salutation(&self) -> &str {
        if self.name.is_empty() {
            "customer"
        } else {
            &self.name
        }
    }

    /// Whether the contact carries a deliverable address.
    pub fn has_email(&self) -> bool {
        !self.email.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_trims_fields() {
        let contact = Contact::new("  buyer@example.com ", " Ada Lovelace ");
        assert_eq!(contact.email, "buyer@example.com");
        assert_eq!(contact.name, "Ada Lovelace");
    }

    #[test]
    fn salutation_falls_back_when_unnamed() {
        assert_eq!(Contact::new("a@b.c", "").salutation(), "customer");
        assert_eq!(Contact::new("a@b.c", "Ada").salutation(), "Ada");
    }

    #[test]
    fn has_email() {
        assert!(Contact::new("a@b.c", "").has_email());
        assert!(!Contact::new("", "Ada").has_email());
    }
}
