//! Strongly-typed identifiers for Govflow documents
//!
//! Every document is keyed by a 12-byte [`ObjectId`] whose external form is
//! 24 hexadecimal characters. Each collection wraps it in its own newtype so
//! a workflow-template id can never be passed where a checklist-item
//! instance id is expected.

use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::OnceLock;

/// Length of the external hexadecimal form
pub const OBJECT_ID_HEX_LEN: usize = 24;

const COUNTER_MASK: u32 = 0x00FF_FFFF;

static PROCESS_UNIQUE: OnceLock<[u8; 5]> = OnceLock::new();
static COUNTER: OnceLock<AtomicU32> = OnceLock::new();

/// Rejected identifier text
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind} id '{value}': expected {OBJECT_ID_HEX_LEN} hexadecimal characters")]
pub struct IdError {
    pub kind: &'static str,
    pub value: String,
}

/// Opaque 12-byte document identifier.
///
/// Layout: 4-byte big-endian seconds timestamp, 5 bytes fixed per process,
/// 3-byte big-endian counter. Ids generated by one process therefore sort in
/// creation order.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId([u8; 12]);

impl ObjectId {
    pub fn generate() -> Self {
        let seconds = Utc::now().timestamp() as u32;
        let unique = PROCESS_UNIQUE.get_or_init(|| rand::thread_rng().gen());
        let counter = COUNTER
            .get_or_init(|| AtomicU32::new(rand::thread_rng().gen_range(0..=COUNTER_MASK)))
            .fetch_add(1, Ordering::Relaxed)
            & COUNTER_MASK;

        let mut bytes = [0u8; 12];
        bytes[0..4].copy_from_slice(&seconds.to_be_bytes());
        bytes[4..9].copy_from_slice(unique);
        bytes[9..12].copy_from_slice(&counter.to_be_bytes()[1..4]);
        Self(bytes)
    }

    pub fn from_bytes(bytes: [u8; 12]) -> Self {
        Self(bytes)
    }

    pub fn bytes(&self) -> [u8; 12] {
        self.0
    }

    /// Seconds since the Unix epoch embedded at generation time
    pub fn timestamp_secs(&self) -> u32 {
        u32::from_be_bytes([self.0[0], self.0[1], self.0[2], self.0[3]])
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse the 24-character hex form; `kind` names the collection in the error.
    pub fn parse_as(value: &str, kind: &'static str) -> Result<Self, IdError> {
        let invalid = || IdError {
            kind,
            value: value.to_string(),
        };
        if value.len() != OBJECT_ID_HEX_LEN {
            return Err(invalid());
        }
        let mut bytes = [0u8; 12];
        hex::decode_to_slice(value, &mut bytes).map_err(|_| invalid())?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({})", self.to_hex())
    }
}

impl FromStr for ObjectId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_as(s, "object")
    }
}

impl Serialize for ObjectId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ObjectId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(serde::de::Error::custom)
    }
}

macro_rules! document_id {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(ObjectId);

        impl $name {
            pub fn generate() -> Self {
                Self(ObjectId::generate())
            }

            pub fn from_object_id(id: ObjectId) -> Self {
                Self(id)
            }

            pub fn as_object_id(&self) -> &ObjectId {
                &self.0
            }

            pub fn parse(value: &str) -> Result<Self, IdError> {
                ObjectId::parse_as(value, $kind).map(Self)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl FromStr for $name {
            type Err = IdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }
    };
}

document_id!(
    /// Identifier of a governance template
    GovernanceTemplateId,
    "governance template"
);
document_id!(
    /// Identifier of a workflow template
    WorkflowTemplateId,
    "workflow template"
);
document_id!(
    /// Identifier of a checklist-item template
    ChecklistItemTemplateId,
    "checklist item template"
);
document_id!(
    /// Identifier of a project
    ProjectId,
    "project"
);
document_id!(
    /// Identifier of a workflow instance
    WorkflowInstanceId,
    "workflow instance"
);
document_id!(
    /// Identifier of a checklist-item instance
    ChecklistItemInstanceId,
    "checklist item instance"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_unique_and_ordered() {
        let a = ObjectId::generate();
        let b = ObjectId::generate();
        assert_ne!(a, b);
        assert!(b.timestamp_secs() >= a.timestamp_secs());
    }

    #[test]
    fn test_hex_form() {
        let id = ObjectId::generate();
        let text = id.to_string();
        assert_eq!(text.len(), OBJECT_ID_HEX_LEN);
        assert!(text.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(text.parse::<ObjectId>().unwrap(), id);
    }

    #[test]
    fn test_parse_accepts_upper_case() {
        let id: ObjectId = "65A1B2C3D4E5F60718293A4B".parse().unwrap();
        assert_eq!(id.to_string(), "65a1b2c3d4e5f60718293a4b");
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!("".parse::<ObjectId>().is_err());
        assert!("65a1b2c3d4e5f60718293a4".parse::<ObjectId>().is_err());
        assert!("65a1b2c3d4e5f60718293a4bb".parse::<ObjectId>().is_err());
        assert!("zza1b2c3d4e5f60718293a4b".parse::<ObjectId>().is_err());

        let err = ProjectId::parse("not-an-id").unwrap_err();
        assert_eq!(err.kind, "project");
        assert!(err.to_string().contains("not-an-id"));
    }

    #[test]
    fn test_typed_id_serializes_as_string() {
        let id = WorkflowInstanceId::generate();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id));

        let back: WorkflowInstanceId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);

        assert!(serde_json::from_str::<WorkflowInstanceId>("\"abc\"").is_err());
    }
}
