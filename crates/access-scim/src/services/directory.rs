//! Virtual user directory.
//!
//! Cloudflare Access stores no users. The directory is recomputed on every
//! call from the email rules of all groups, plus the users that were created
//! over SCIM but have not been put in a group yet.

use std::collections::{BTreeSet, HashSet};

use access_client::AccessGroup;

/// Users created over SCIM that no group references yet.
#[derive(Debug, Default, Clone)]
pub struct PendingUsers {
    emails: HashSet<String>,
}

impl PendingUsers {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, email: impl Into<String>) -> bool {
        self.emails.insert(email.into())
    }

    pub fn remove(&mut self, email: &str) -> bool {
        self.emails.remove(email)
    }

    #[must_use]
    pub fn contains(&self, email: &str) -> bool {
        self.emails.contains(email)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.emails.iter().map(String::as_str)
    }
}

/// Every known user email, deduplicated and sorted ascending.
#[must_use]
pub fn collect_users(groups: &[AccessGroup], pending: &PendingUsers) -> Vec<String> {
    let mut users: BTreeSet<&str> = groups
        .iter()
        .flat_map(|g| g.include.iter().filter_map(|m| m.email()))
        .collect();
    users.extend(pending.iter());
    users.into_iter().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use access_client::MembershipEntry;
    use serde_json::json;

    fn group(id: &str, include: Vec<MembershipEntry>) -> AccessGroup {
        AccessGroup {
            id: id.to_string(),
            name: id.to_string(),
            include,
            ..AccessGroup::default()
        }
    }

    #[test]
    fn test_union_of_groups_and_pending() {
        let groups = vec![
            group(
                "g1",
                vec![
                    MembershipEntry::for_email("bob@x.com"),
                    MembershipEntry::Raw(json!({ "email": { "email": "alice@x.com" } })),
                ],
            ),
            group(
                "g2",
                vec![
                    MembershipEntry::for_email("alice@x.com"),
                    MembershipEntry::Raw(json!({ "ip": { "ip": "10.0.0.0/8" } })),
                ],
            ),
        ];
        let mut pending = PendingUsers::new();
        pending.insert("carol@x.com");
        pending.insert("bob@x.com");

        assert_eq!(
            collect_users(&groups, &pending),
            vec!["alice@x.com", "bob@x.com", "carol@x.com"]
        );
    }

    #[test]
    fn test_case_is_preserved() {
        let groups = vec![group(
            "g1",
            vec![
                MembershipEntry::for_email("Alice@x.com"),
                MembershipEntry::for_email("alice@x.com"),
            ],
        )];

        assert_eq!(
            collect_users(&groups, &PendingUsers::new()),
            vec!["Alice@x.com", "alice@x.com"]
        );
    }

    #[test]
    fn test_empty_directory() {
        assert!(collect_users(&[], &PendingUsers::new()).is_empty());
    }

    #[test]
    fn test_pending_set() {
        let mut pending = PendingUsers::new();
        assert!(pending.insert("a@x.com"));
        assert!(!pending.insert("a@x.com"));
        assert!(pending.contains("a@x.com"));
        assert!(pending.remove("a@x.com"));
        assert!(!pending.remove("a@x.com"));
        assert_eq!(pending.iter().count(), 0);
    }
}
