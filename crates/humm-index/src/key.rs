//! Index keys and the rules deciding which keys a live entry belongs under.

use std::fmt;

use humm_crypto::ContentHasher;
use humm_types::{AclRole, AgentPubKey, ContentHash, ContentHeader, EntityRef};
use serde::{Deserialize, Serialize};

use crate::error::IndexResult;

/// A free-form `(name, value)` discovery key attached to content at creation.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DynamicLink {
    pub name: String,
    pub value: String,
}

impl DynamicLink {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IndexFamily {
    Author,
    AuthorContentType,
    ContentId,
    Group,
    GroupContentType,
    AclRole,
    Custom,
}

impl IndexFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Author => "author",
            Self::AuthorContentType => "author_content_type",
            Self::ContentId => "content_id",
            Self::Group => "group",
            Self::GroupContentType => "group_content_type",
            Self::AclRole => "acl_role",
            Self::Custom => "custom",
        }
    }
}

impl fmt::Display for IndexFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A composite index key. Each key hashes to a stable anchor that links hang
/// off in the log.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IndexKey {
    Author {
        author: AgentPubKey,
    },
    AuthorContentType {
        author: AgentPubKey,
        content_type: String,
    },
    ContentId {
        group_id: String,
        id: String,
    },
    Group {
        group_id: String,
    },
    GroupContentType {
        group_id: String,
        content_type: String,
    },
    AclRole {
        group_id: String,
        content_type: String,
        role: AclRole,
        entity: EntityRef,
    },
    Custom {
        group_id: String,
        name: String,
        value: String,
    },
}

/// What the index layer needs to know about a resolved live head.
pub trait IndexedEntry {
    /// Root hash of the chain; identifies the chain across versions.
    fn root(&self) -> ContentHash;
    fn header(&self) -> &ContentHeader;
    /// Agent that created the chain root.
    fn creator(&self) -> &AgentPubKey;
    fn dynamic_links(&self) -> &[DynamicLink];
}

impl IndexKey {
    pub fn family(&self) -> IndexFamily {
        match self {
            Self::Author { .. } => IndexFamily::Author,
            Self::AuthorContentType { .. } => IndexFamily::AuthorContentType,
            Self::ContentId { .. } => IndexFamily::ContentId,
            Self::Group { .. } => IndexFamily::Group,
            Self::GroupContentType { .. } => IndexFamily::GroupContentType,
            Self::AclRole { .. } => IndexFamily::AclRole,
            Self::Custom { .. } => IndexFamily::Custom,
        }
    }

    /// Address links for this key are attached to.
    pub fn anchor(&self) -> IndexResult<ContentHash> {
        Ok(ContentHasher::ANCHOR.hash_json(self)?)
    }

    /// Every key a version should be linked under.
    ///
    /// The bare author key is only produced for the chain root; every other
    /// key follows the version's header, with `creator` always naming the
    /// agent that created the chain. ACL keys are produced once per role
    /// listing, so an entity holding two roles yields two keys.
    pub fn keys_for(
        header: &ContentHeader,
        creator: &AgentPubKey,
        dynamic_links: &[DynamicLink],
        is_root: bool,
    ) -> Vec<IndexKey> {
        let mut keys = Vec::new();
        if is_root {
            keys.push(Self::Author {
                author: creator.clone(),
            });
        }
        keys.push(Self::AuthorContentType {
            author: creator.clone(),
            content_type: header.content_type.clone(),
        });
        keys.push(Self::ContentId {
            group_id: header.group_id.clone(),
            id: header.id.clone(),
        });
        keys.push(Self::Group {
            group_id: header.group_id.clone(),
        });
        keys.push(Self::GroupContentType {
            group_id: header.group_id.clone(),
            content_type: header.content_type.clone(),
        });
        for (role, entity) in header.acl.assignments() {
            keys.push(Self::AclRole {
                group_id: header.group_id.clone(),
                content_type: header.content_type.clone(),
                role,
                entity: entity.clone(),
            });
        }
        for link in dynamic_links {
            keys.push(Self::Custom {
                group_id: header.group_id.clone(),
                name: link.name.clone(),
                value: link.value.clone(),
            });
        }
        keys
    }

    /// Every key a live head should be discoverable under, as derived from
    /// the head itself.
    pub fn expected_for<E: IndexedEntry>(entry: &E) -> Vec<IndexKey> {
        Self::keys_for(entry.header(), entry.creator(), entry.dynamic_links(), true)
    }

    /// Returns `true` if the live head `entry` currently belongs under this
    /// key.
    pub fn matches<E: IndexedEntry>(&self, entry: &E) -> bool {
        let header = entry.header();
        match self {
            Self::Author { author } => entry.creator() == author,
            Self::AuthorContentType {
                author,
                content_type,
            } => entry.creator() == author && &header.content_type == content_type,
            Self::ContentId { group_id, id } => &header.group_id == group_id && &header.id == id,
            Self::Group { group_id } => &header.group_id == group_id,
            Self::GroupContentType {
                group_id,
                content_type,
            } => &header.group_id == group_id && &header.content_type == content_type,
            Self::AclRole {
                group_id,
                content_type,
                role,
                entity,
            } => {
                &header.group_id == group_id
                    && &header.content_type == content_type
                    && header.acl.holds(*role, entity)
            }
            Self::Custom {
                group_id,
                name,
                value,
            } => {
                &header.group_id == group_id
                    && entry
                        .dynamic_links()
                        .iter()
                        .any(|l| &l.name == name && &l.value == value)
            }
        }
    }
}

impl fmt::Display for IndexKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Author { author } => write!(f, "author/{}", author.short_id()),
            Self::AuthorContentType {
                author,
                content_type,
            } => write!(f, "author/{}/{}", author.short_id(), content_type),
            Self::ContentId { group_id, id } => write!(f, "content/{group_id}/{id}"),
            Self::Group { group_id } => write!(f, "group/{group_id}"),
            Self::GroupContentType {
                group_id,
                content_type,
            } => write!(f, "group/{group_id}/{content_type}"),
            Self::AclRole {
                group_id,
                content_type,
                role,
                entity,
            } => write!(f, "acl/{group_id}/{content_type}/{role}/{entity}"),
            Self::Custom {
                group_id,
                name,
                value,
            } => write!(f, "custom/{group_id}/{name}={value}"),
        }
    }
}
