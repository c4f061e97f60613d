//! Role-partitioned access-control lists.
//!
//! Every content header carries an [`AccessControlList`] naming exactly one
//! owner plus admin, writer and reader sets. The index layer walks the list
//! through [`AccessControlList::assignments`], so every role is handled by
//! the same code path.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// A role an entity can hold on a piece of content.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AclRole {
    Owner,
    Admin,
    Writer,
    Reader,
}

impl AclRole {
    /// Every role, in declaration order.
    pub const ALL: [AclRole; 4] = [
        AclRole::Owner,
        AclRole::Admin,
        AclRole::Writer,
        AclRole::Reader,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Admin => "admin",
            Self::Writer => "writer",
            Self::Reader => "reader",
        }
    }
}

impl fmt::Display for AclRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AclRole {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "owner" => Ok(Self::Owner),
            "admin" => Ok(Self::Admin),
            "writer" => Ok(Self::Writer),
            "reader" => Ok(Self::Reader),
            _ => Err(TypeError::UnknownRole(s.to_string())),
        }
    }
}

/// An opaque principal eligible for a role. Equality is exact match on both
/// fields.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityRef {
    pub id: String,
    pub entity_type: String,
}

impl EntityRef {
    pub fn new(id: impl Into<String>, entity_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            entity_type: entity_type.into(),
        }
    }

    /// An entity reference is well formed when its id is non-empty and
    /// contains no control characters.
    pub fn validate(&self) -> Result<(), TypeError> {
        if self.id.trim().is_empty() {
            return Err(TypeError::MalformedEntity("entity id is empty".into()));
        }
        if self.id.chars().any(char::is_control) {
            return Err(TypeError::MalformedEntity(format!(
                "entity id {:?} contains control characters",
                self.id
            )));
        }
        Ok(())
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.entity_type.is_empty() {
            write!(f, "{}", self.id)
        } else {
            write!(f, "{}:{}", self.entity_type, self.id)
        }
    }
}

/// Entity-keyed access-control list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessControlList {
    pub owner: EntityRef,
    #[serde(default)]
    pub admin: Vec<EntityRef>,
    #[serde(default)]
    pub writer: Vec<EntityRef>,
    #[serde(default)]
    pub reader: Vec<EntityRef>,
}

impl AccessControlList {
    /// A list with only an owner.
    pub fn owned_by(owner: EntityRef) -> Self {
        Self {
            owner,
            admin: Vec::new(),
            writer: Vec::new(),
            reader: Vec::new(),
        }
    }

    pub fn with(mut self, role: AclRole, entity: EntityRef) -> Self {
        match role {
            AclRole::Owner => self.owner = entity,
            AclRole::Admin => self.admin.push(entity),
            AclRole::Writer => self.writer.push(entity),
            AclRole::Reader => self.reader.push(entity),
        }
        self
    }

    /// Entities listed under one role, in list order.
    pub fn members(&self, role: AclRole) -> Vec<&EntityRef> {
        match role {
            AclRole::Owner => vec![&self.owner],
            AclRole::Admin => self.admin.iter().collect(),
            AclRole::Writer => self.writer.iter().collect(),
            AclRole::Reader => self.reader.iter().collect(),
        }
    }

    /// Every `(role, entity)` pair, role by role. An entity listed under
    /// several roles appears once per role.
    pub fn assignments(&self) -> impl Iterator<Item = (AclRole, &EntityRef)> + '_ {
        AclRole::ALL
            .into_iter()
            .flat_map(move |role| self.members(role).into_iter().map(move |e| (role, e)))
    }

    /// Returns `true` if `entity` is listed under `role`.
    pub fn holds(&self, role: AclRole, entity: &EntityRef) -> bool {
        self.members(role).into_iter().any(|e| e == entity)
    }

    /// Check every listed entity is well formed.
    pub fn validate(&self) -> Result<(), TypeError> {
        self.assignments().try_for_each(|(_, e)| e.validate())
    }
}

/// Parallel ACL keyed by encoded public keys. Carried through untouched; the
/// lifecycle engine never interprets it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicKeyAcl {
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub admin: Vec<String>,
    #[serde(default)]
    pub writer: Vec<String>,
    #[serde(default)]
    pub reader: Vec<String>,
}
