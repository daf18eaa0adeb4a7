//! # jar-kernel
//!
//! State reconciliation and validated serialization for emotion-jar topic
//! collections.
//!
//! A collection holds named topics, each with exactly two emotions (a
//! producer label, a reaction category and a 0–100 strength). The kernel
//! answers two questions:
//!
//! > Which inserts and removals bring the rendered list in line with the
//! > desired one, and where does focus go?
//!
//! > Is this export text a valid document, and if not, exactly what is wrong
//! > and where?
//!
//! ## Architecture
//!
//! ```text
//! import text → Serializer → Validator → ExportDocument → topics
//!                                                           ↓
//!              rendered KeyedList ← ChangeSet ← Reconciler ← desired topics
//!                      ↓
//!                   Serializer → export text → BlobStore
//! ```
//!
//! ## Guarantees
//!
//! - Every validation error is reported, each with a path from `root`
//! - Valid documents round-trip through text unchanged
//! - Reconciliation is idempotent and never touches items present on both sides

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod types;
pub mod validate;
pub mod serializer;
pub mod reconcile;
pub mod store;
pub mod import;
pub mod board;
pub mod config;
pub mod defaults;

// Re-exports
pub use types::{
    Tag, Emotion, EmotionMetadata, Reaction, Strength, StrengthError,
    Topic, TopicId, TopicMetadata, ExportDocument, ExportMetadata,
    IdGenerator, SequentialIds, UuidGenerator, iso_timestamp,
};
pub use validate::{
    validate, check_export, validate_tag, validate_emotion, validate_topic,
    Validated, ValidationError, ROOT_PATH,
};
pub use validate::rules::{FieldRule, Format, ExportConstraints, EXPORT_CONSTRAINTS};
pub use serializer::{serialize, deserialize, Serializer, ExportError};
pub use reconcile::{
    reconcile, pick_fallback_focus, next_key, previous_key,
    Anchor, Change, ChangeSet, Keyed, KeyedList, ReconcileError, Trigger,
};
pub use store::{load_export_data, save_export_data, BlobStore, InMemoryBlobStore, LoadOutcome};
#[cfg(feature = "fs")]
pub use store::FileBlobStore;
pub use import::{import_or_default, import_from, Imported};
pub use board::Board;
pub use config::{ExportSettings, JarConfig, LogFormat};
pub use defaults::{default_topics, DEFAULT_TOPIC_NAMES};

/// Semantic version stamped on exports.
pub const EXPORT_SEM_VER: &str = "1.0.0";

/// Schema version stamped on exports.
/// Increment on breaking changes to the document shape.
pub const EXPORT_SCHEMA_VERSION: u32 = 1;

/// Suggested file name for downloaded exports.
pub const EXPORT_FILE_NAME: &str = "jars-export.json";
