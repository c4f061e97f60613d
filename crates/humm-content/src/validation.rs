use std::fmt;

use crate::entry::ContentEntry;

/// A rule a content entry breaks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Violation {
    pub kind: ViolationKind,
    pub description: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViolationKind {
    EmptyId,
    EmptyGroup,
    MissingOwner,
    MalformedEntity,
    EmptyLinkName,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description)
    }
}

fn violation(kind: ViolationKind, description: impl Into<String>) -> Violation {
    Violation {
        kind,
        description: description.into(),
    }
}

/// Check an entry before it is committed. Returns every violation found.
pub fn validate_entry(entry: &ContentEntry) -> Vec<Violation> {
    let header = &entry.header;
    let mut violations = Vec::new();

    if header.id.trim().is_empty() {
        violations.push(violation(ViolationKind::EmptyId, "id is empty"));
    }
    if header.group_id.trim().is_empty() {
        violations.push(violation(ViolationKind::EmptyGroup, "group_id is empty"));
    }
    if header.acl.owner.id.trim().is_empty() {
        violations.push(violation(ViolationKind::MissingOwner, "acl has no owner"));
    }
    for (role, entity) in header.acl.assignments() {
        if role == humm_types::AclRole::Owner && entity.id.trim().is_empty() {
            continue;
        }
        if let Err(e) = entity.validate() {
            violations.push(violation(
                ViolationKind::MalformedEntity,
                format!("{role} entry: {e}"),
            ));
        }
    }
    for link in &entry.dynamic_links {
        if link.name.trim().is_empty() {
            violations.push(violation(
                ViolationKind::EmptyLinkName,
                format!("dynamic link with value {:?} has no name", link.value),
            ));
        }
    }
    violations
}

/// One line naming every violation.
pub(crate) fn describe(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
