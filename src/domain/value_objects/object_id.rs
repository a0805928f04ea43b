//! Nullable document references.
//!
//! Older chat documents mark "no last message" with the all-zero ObjectId
//! instead of `null`. Both shapes decode to `None`; `None` is always written
//! back as `null`.

use bson::oid::ObjectId;

/// Whether the id is the all-zero placeholder.
pub fn is_nil(id: &ObjectId) -> bool {
    id.bytes() == [0u8; 12]
}

/// Serde adapter for `Option<ObjectId>` reference fields.
pub mod nullable_object_id {
    use bson::oid::ObjectId;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(value: &Option<ObjectId>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(id) => id.serialize(serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<ObjectId>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<ObjectId>::deserialize(deserializer)?;
        Ok(value.filter(|id| !super::is_nil(id)))
    }
}
