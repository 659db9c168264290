use std::fmt::Debug;
use std::future::Future;
use std::sync::LazyLock;

use nutype::nutype;
use regex::Regex;
use thiserror::Error;

use crate::{DRAFTS_SLOT_NAME, PUBLISHED_SLOT_NAME, TOKEN_SLOT_NAME};

pub mod crafts;

/// Port to process-external key/value storage addressed by slot name.
/// Every `set` replaces the whole slot content, there are no partial updates.
pub trait Storage: Clone + Send + Sync + Debug + 'static {
    /// read slot content, `None` if the slot was never written or was deleted
    fn get(
        &self,
        slot: &SlotName,
    ) -> impl Future<Output = Result<Option<String>, StorageError>> + Send;

    /// replace slot content
    fn set(
        &self,
        slot: &SlotName,
        value: String,
    ) -> impl Future<Output = Result<(), StorageError>> + Send;

    /// remove slot, removing a missing slot is not an error
    fn delete(&self, slot: &SlotName) -> impl Future<Output = Result<(), StorageError>> + Send;
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage backend failure: {0}")]
    Backend(String),

    #[error("storage quota exceeded writing slot '{slot}': limit is {limit} bytes")]
    QuotaExceeded { slot: String, limit: usize },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

// A regex for slot names: ASCII letters, digits, underscore and dash.
// Example: "drafts" or "user_42-token" are valid; "my slot" or "a/b" are not.
pub const SLOT_NAME_REGEX: &str = r"^[A-Za-z0-9_-]+$";

static SLOT_NAME_REGEX_COMPILED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(SLOT_NAME_REGEX).expect("SLOT_NAME_REGEX must be a valid regex")
});

pub fn is_eligible_slot_name(name: &str) -> bool {
    SLOT_NAME_REGEX_COMPILED.is_match(name)
}

#[nutype(
    sanitize(trim),
    validate(not_empty, len_char_max = 64, predicate = is_eligible_slot_name),
    derive(
        Clone,
        Debug,
        Display,
        FromStr,
        AsRef,
        PartialEq,
        Eq,
        PartialOrd,
        Ord,
        Hash,
        Serialize,
        Deserialize
    )
)]
pub struct SlotName(String);

static DRAFTS_SLOT: LazyLock<SlotName> = LazyLock::new(|| well_known(DRAFTS_SLOT_NAME));
static PUBLISHED_SLOT: LazyLock<SlotName> = LazyLock::new(|| well_known(PUBLISHED_SLOT_NAME));
static TOKEN_SLOT: LazyLock<SlotName> = LazyLock::new(|| well_known(TOKEN_SLOT_NAME));

fn well_known(name: &str) -> SlotName {
    SlotName::try_new(name).expect("well-known slot names must be valid")
}

impl SlotName {
    /// slot holding the drafts collection
    pub fn drafts() -> &'static SlotName {
        &DRAFTS_SLOT
    }

    /// slot holding the published collection
    pub fn published() -> &'static SlotName {
        &PUBLISHED_SLOT
    }

    /// slot holding the session marker
    pub fn token() -> &'static SlotName {
        &TOKEN_SLOT
    }
}
