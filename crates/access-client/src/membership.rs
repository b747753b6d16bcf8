//! Group membership entries and the email codec over them.
//!
//! An Access group's `include` list holds rules. The only rule this bridge
//! understands is the email rule, `{"email": {"email": "alice@example.com"}}`.
//! A membership entry reaches us in one of two shapes:
//!
//! - [`MembershipEntry::Raw`]: whatever was decoded from an API response.
//!   Every entry read off the wire lands here, email rule or not.
//! - [`MembershipEntry::Email`]: the typed rule built locally when a member
//!   is added.
//!
//! Both serialize to the same JSON. Code outside this module never inspects
//! the shape; it goes through [`MembershipEntry::email`] and the list helpers.

use serde::{Deserialize, Deserializer, Serialize};

/// Inner object of an email rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailAddress {
    pub email: String,
}

/// Typed Access email rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailRule {
    pub email: EmailAddress,
}

/// One entry of a group's `include` list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MembershipEntry {
    /// Entry decoded from an API response.
    Raw(serde_json::Value),
    /// Email rule built by this process.
    Email(EmailRule),
}

impl<'de> Deserialize<'de> for MembershipEntry {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        serde_json::Value::deserialize(deserializer).map(Self::Raw)
    }
}

impl MembershipEntry {
    /// Build a typed email rule for `email`.
    pub fn for_email(email: impl Into<String>) -> Self {
        Self::Email(EmailRule {
            email: EmailAddress {
                email: email.into(),
            },
        })
    }

    /// The email this entry grants, or `None` if it is not an email rule.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        match self {
            Self::Raw(value) => value.get("email")?.get("email")?.as_str(),
            Self::Email(rule) => Some(rule.email.email.as_str()),
        }
    }

    /// Whether this entry is an email rule for exactly `email`.
    #[must_use]
    pub fn is_email(&self, email: &str) -> bool {
        self.email() == Some(email)
    }
}

/// Whether any entry in `members` is an email rule for `email`.
#[must_use]
pub fn contains_email(members: &[MembershipEntry], email: &str) -> bool {
    members.iter().any(|m| m.is_email(email))
}

/// Drop every email rule for `email` from `members`.
///
/// Returns true iff the list got shorter. Entries that are not email rules
/// are always kept.
pub fn remove_email(members: &mut Vec<MembershipEntry>, email: &str) -> bool {
    let before = members.len();
    members.retain(|m| !m.is_email(email));
    members.len() < before
}

/// Emails of all email rules in `members`, sorted ascending.
#[must_use]
pub fn member_emails(members: &[MembershipEntry]) -> Vec<String> {
    let mut emails: Vec<String> = members
        .iter()
        .filter_map(MembershipEntry::email)
        .map(str::to_string)
        .collect();
    emails.sort();
    emails
}
