//! # License Email Rendering
//!
//! Pure rendering of the consolidated license email: one message per
//! order, every key in its own block, activation instructions once.

use themekey_core::{Contact, LicenseKey};

/// A rendered email: subject plus HTML body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailContent {
    pub subject: String,
    pub html: String,
}

/// Render the consolidated license email for one order.
///
/// Key order follows issuance order, so the blocks line up with the
/// `i/N` sequence labels on the records.
pub fn license_email(order_ref: &str, contact: &Contact, keys: &[LicenseKey]) -> EmailContent {
    let subject = format!(
        "Your {} ThemeKey license{} — order #{}",
        keys.len(),
        if keys.len() == 1 { "" } else { "s" },
        order_ref
    );

    let key_blocks: String = keys
        .iter()
        .enumerate()
        .map(|(i, key)| {
            format!(
                r#"      <div class="license-box">
        <h3>License {}:</h3>
        <div class="license-code">{}</div>
      </div>
"#,
                i + 1,
                key
            )
        })
        .collect();

    let html = format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>ThemeKey licenses</title>
  <style>
    body {{ font-family: Arial, sans-serif; background-color: #f4f6f8; color: #333; margin: 0; }}
    .container {{ max-width: 600px; margin: 0 auto; background-color: #ffffff; padding: 24px; }}
    .license-box {{ margin: 12px auto; padding: 12px; background-color: #eef3fa; border-radius: 8px; text-align: center; }}
    .license-code {{ font-size: 18px; font-weight: 700; letter-spacing: 2px; color: #0d47a1; }}
    .footer {{ font-size: 13px; color: #888; text-align: center; padding-top: 16px; }}
  </style>
</head>
<body>
  <div class="container">
    <h1>ThemeKey</h1>
    <h2>Your {count} license{plural} {are_ready}!</h2>
    <p>Thank you for your purchase, {name}.</p>
    <p><strong>Order:</strong> #{order_ref}<br>
       <strong>Licenses included:</strong> {count}</p>
    <div class="licenses">
{key_blocks}    </div>
    <h3>Activation instructions</h3>
    <ol>
      <li>Open the theme editor of your store.</li>
      <li>Find the <strong>License</strong> section in the theme settings.</li>
      <li>Paste <strong>one</strong> of the keys above and save.</li>
    </ol>
    <ul>
      <li>Each license is for one store; keep unused keys for future stores.</li>
      <li>A key can only be active on one store at a time.</li>
    </ul>
    <div class="footer">
      <p>This is an automated message. Replies are not monitored.</p>
    </div>
  </div>
</body>
</html>
"#,
        count = keys.len(),
        plural = if keys.len() == 1 { "" } else { "s" },
        are_ready = if keys.len() == 1 { "is ready" } else { "are ready" },
        name = contact.salutation(),
        order_ref = order_ref,
        key_blocks = key_blocks,
    );

    EmailContent { subject, html }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(raw: &[&str]) -> Vec<LicenseKey> {
        raw.iter().map(|s| LicenseKey::parse(s).unwrap()).collect()
    }

    #[test]
    fn email_lists_every_key_once() {
        let keys = keys(&[
            "LIC-0000-0000-0001",
            "LIC-0000-0000-0002",
            "LIC-0000-0000-0003",
        ]);
        let contact = Contact::new("buyer@example.com", "Ada");
        let email = license_email("1042", &contact, &keys);

        for key in &keys {
            assert_eq!(
                email.html.matches(key.as_str()).count(),
                1,
                "key {key} should appear exactly once"
            );
        }
    }

    #[test]
    fn subject_carries_count_and_order() {
        let keys = keys(&["LIC-0000-0000-0001", "LIC-0000-0000-0002"]);
        let contact = Contact::new("buyer@example.com", "Ada");
        let email = license_email("1042", &contact, &keys);
        assert_eq!(email.subject, "Your 2 ThemeKey licenses — order #1042");
    }

    #[test]
    fn single_license_uses_singular_wording() {
        let keys = keys(&["LIC-0000-0000-0001"]);
        let contact = Contact::new("buyer@example.com", "Ada");
        let email = license_email("7", &contact, &keys);
        assert_eq!(email.subject, "Your 1 ThemeKey license — order #7");
        assert!(email.html.contains("license is ready"));
    }

    #[test]
    fn buyer_is_addressed_by_name_with_fallback() {
        let keys = keys(&["LIC-0000-0000-0001"]);
        let email = license_email("7", &Contact::new("b@e.c", "Ada"), &keys);
        assert!(email.html.contains("Thank you for your purchase, Ada."));

        let email = license_email("7", &Contact::new("b@e.c", ""), &keys);
        assert!(email.html.contains("Thank you for your purchase, customer."));
    }
}
