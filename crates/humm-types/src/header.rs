use serde::{Deserialize, Serialize};

use crate::acl::{AccessControlList, PublicKeyAcl};

/// Non-encrypted metadata carried by every content version.
///
/// The header is immutable per version; an update supersedes it with a new
/// header rather than mutating it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentHeader {
    /// Stable logical identifier across all versions of the content.
    pub id: String,
    /// Administrative grouping ("hive") the content belongs to.
    #[serde(alias = "hive_id")]
    pub group_id: String,
    /// Discriminator used to partition indexes.
    pub content_type: String,
    pub acl: AccessControlList,
    #[serde(default)]
    pub public_key_acl: PublicKeyAcl,
    /// Key of whoever authored this specific version.
    #[serde(default)]
    pub revision_author_signing_key: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::acl::EntityRef;

    #[test]
    fn accepts_hive_id_alias() {
        let json = r#"{
            "id": "c1",
            "hive_id": "g1",
            "content_type": "note",
            "acl": {"owner": {"id": "alice", "entity_type": "user"}}
        }"#;
        let header: ContentHeader = serde_json::from_str(json).unwrap();
        assert_eq!(header.group_id, "g1");
        assert_eq!(header.acl.owner, EntityRef::new("alice", "user"));
        assert_eq!(header.public_key_acl, PublicKeyAcl::default());
        assert!(header.revision_author_signing_key.is_empty());
    }
}
