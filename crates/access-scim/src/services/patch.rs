//! Group membership PATCH interpreter.
//!
//! Supported operations:
//!
//! - `add` on `members` with one `{"value": email}` object or an array of
//!   them. Emails already present are skipped.
//! - `remove` on `members[value eq "<email>"]` drops every rule for that
//!   email. A trailing sub-attribute (`...].display`) is ignored.
//! - `remove` on bare `members` clears the whole include list, non-email
//!   rules included.
//!
//! Operations on other attributes are ignored. Any other op is rejected.

use access_client::{contains_email, remove_email, AccessGroup, MembershipEntry};
use serde_json::Value;
use tracing::{debug, warn};

use super::path_parser::{parse_patch_path, PatchPath};
use crate::error::{ScimError, ScimResult};
use crate::models::ScimPatchOp;

/// What a sequence of operations did to a group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatchOutcome {
    /// The include list changed and must be written back.
    pub modified: bool,
    /// Emails appended, in order.
    pub added: Vec<String>,
    /// Emails removed by a value filter.
    pub removed: Vec<String>,
}

impl PatchOutcome {
    /// Emails whose membership changed.
    pub fn touched(&self) -> impl Iterator<Item = &str> {
        self.added.iter().chain(&self.removed).map(String::as_str)
    }
}

/// Apply `operations` in order to `group.include`.
///
/// On error the group may be partly modified; callers work on a copy.
pub fn apply_operations(
    group: &mut AccessGroup,
    operations: &[ScimPatchOp],
) -> ScimResult<PatchOutcome> {
    let mut outcome = PatchOutcome::default();

    for op in operations {
        match op.op.to_ascii_lowercase().as_str() {
            "add" => apply_add(group, op, &mut outcome)?,
            "remove" => apply_remove(group, op, &mut outcome)?,
            _ => {
                return Err(ScimError::BadRequest(format!(
                    "Unsupported patch op: {}",
                    op.op
                )))
            }
        }
    }

    Ok(outcome)
}

fn apply_add(group: &mut AccessGroup, op: &ScimPatchOp, outcome: &mut PatchOutcome) -> ScimResult<()> {
    let value = op
        .value
        .as_ref()
        .ok_or_else(|| ScimError::BadRequest("add operation requires a value".to_string()))?;

    let members = match op.path.as_deref() {
        Some(path) => {
            let path = parse_patch_path(path)?;
            if !is_members(&path) {
                warn!(group_id = %group.id, path = ?op.path, "Ignoring add on unsupported path");
                return Ok(());
            }
            value
        }
        // No path: the value is a partial resource.
        None => match value.get("members") {
            Some(members) => members,
            None => {
                debug!(group_id = %group.id, "Ignoring add without members");
                return Ok(());
            }
        },
    };

    let candidates = match members {
        Value::Array(items) => items.as_slice(),
        Value::Object(_) => std::slice::from_ref(members),
        _ => {
            return Err(ScimError::BadRequest(
                "members value must be an object or an array".to_string(),
            ))
        }
    };

    for email in candidates
        .iter()
        .filter_map(|c| c.get("value").and_then(Value::as_str))
        .filter(|e| !e.is_empty())
    {
        if contains_email(&group.include, email) {
            continue;
        }
        group.include.push(MembershipEntry::for_email(email));
        outcome.added.push(email.to_string());
        outcome.modified = true;
    }

    Ok(())
}

fn apply_remove(
    group: &mut AccessGroup,
    op: &ScimPatchOp,
    outcome: &mut PatchOutcome,
) -> ScimResult<()> {
    let raw_path = op
        .path
        .as_deref()
        .ok_or_else(|| ScimError::BadRequest("remove operation requires a path".to_string()))?;
    let path = parse_patch_path(raw_path)?;

    if !path.is_attribute("members") {
        warn!(group_id = %group.id, path = raw_path, "Ignoring remove on unsupported path");
        return Ok(());
    }

    if path.is_bare() {
        debug!(group_id = %group.id, "Clearing all members");
        group.include.clear();
        outcome.modified = true;
        return Ok(());
    }

    let target = path
        .value_filter
        .as_ref()
        .and_then(|f| f.equality_value("value"));

    match target {
        Some(email) => {
            if remove_email(&mut group.include, email) {
                outcome.removed.push(email.to_string());
                outcome.modified = true;
            }
        }
        None => {
            debug!(group_id = %group.id, path = raw_path, "Ignoring remove with unsupported filter");
        }
    }

    Ok(())
}

fn is_members(path: &PatchPath) -> bool {
    path.is_attribute("members") && path.is_bare()
}
