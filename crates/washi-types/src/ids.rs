//! Typed identifiers for users, reports, and blocks.
//!
//! All ID types wrap UUIDv7 (time-ordered, globally unique). They display
//! as standard UUID text for logging; the `short()` form (first 8 hex
//! chars) is for human-facing output only, never used as a lookup key.
//!
//! `UserId` also has a deterministic sentinel via `UserId::local()`,
//! derived from UUIDv5, for single-user surfaces with no sign-in.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A user identifier (UUIDv7, or UUIDv5 for sentinels).
#[derive(Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(uuid::Uuid);

/// A report identifier (UUIDv7).
#[derive(Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReportId(uuid::Uuid);

/// A block identifier (UUIDv7).
///
/// Time-ordered: two blocks created in sequence compare in creation order,
/// which is what breaks ties between equal `position` values.
#[derive(Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(uuid::Uuid);

// ── Shared behavior ─────────────────────────────────────────────────────────

macro_rules! impl_typed_id {
    ($T:ident, $name:literal) => {
        impl $T {
            /// Create a new time-ordered ID (UUIDv7).
            pub fn new() -> Self {
                Self(uuid::Uuid::now_v7())
            }

            /// First 8 hex characters, for human display only, not lookup.
            pub fn short(&self) -> String {
                self.0.as_simple().to_string()[..8].to_string()
            }

            /// Full 32-character hex string (no hyphens).
            pub fn to_hex(&self) -> String {
                self.0.as_simple().to_string()
            }

            /// Parse from a hex string (32 chars, no hyphens) or standard UUID format.
            pub fn parse(s: &str) -> Result<Self, uuid::Error> {
                uuid::Uuid::parse_str(s).map(Self)
            }

            /// Check if a query string matches this ID by hex prefix.
            pub fn matches_hex_prefix(&self, prefix: &str) -> bool {
                self.to_hex().starts_with(prefix)
            }

            /// A nil / zero ID, for sentinel values only.
            pub fn nil() -> Self {
                Self(uuid::Uuid::nil())
            }

            /// Check if this is the nil ID.
            pub fn is_nil(&self) -> bool {
                self.0.is_nil()
            }
        }

        impl Default for $T {
            fn default() -> Self {
                Self::new()
            }
        }

        impl From<uuid::Uuid> for $T {
            fn from(u: uuid::Uuid) -> Self {
                Self(u)
            }
        }

        impl From<$T> for uuid::Uuid {
            fn from(id: $T) -> uuid::Uuid {
                id.0
            }
        }

        impl fmt::Display for $T {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                // Full UUID with hyphens for log readability
                write!(f, "{}", self.0)
            }
        }

        impl fmt::Debug for $T {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", $name, self.short())
            }
        }
    };
}

impl_typed_id!(UserId, "UserId");
impl_typed_id!(ReportId, "ReportId");
impl_typed_id!(BlockId, "BlockId");

// ── UserId sentinels ────────────────────────────────────────────────────────

/// Fixed namespace for deriving deterministic UserIds via UUIDv5.
const WASHI_USER_NS: uuid::Uuid = uuid::uuid!("6f1c2a8d-4b3e-4f57-9a02-8e5d1c7b0a43");

impl UserId {
    /// The well-known "local" user.
    ///
    /// Used by single-user surfaces (the CLI) that have no sign-in flow.
    /// Deterministic: same value every time (UUIDv5 derived from `b"local"`).
    pub fn local() -> Self {
        Self(uuid::Uuid::new_v5(&WASHI_USER_NS, b"local"))
    }
}

// ── Prefix resolution ───────────────────────────────────────────────────────

/// Error from ambiguous prefix resolution.
#[derive(Debug, thiserror::Error)]
pub enum PrefixError {
    #[error("no block matches prefix '{0}'")]
    NoMatch(String),
    #[error("ambiguous prefix '{prefix}': matches {candidates:?}")]
    Ambiguous {
        prefix: String,
        candidates: Vec<String>,
    },
}

/// Resolve a hex-prefix query against a set of block IDs.
///
/// Accepts the full hex form too (a full ID is its own prefix). Returns an
/// error when zero or more than one block matches.
pub fn resolve_block_prefix(
    blocks: impl Iterator<Item = BlockId>,
    query: &str,
) -> Result<BlockId, PrefixError> {
    let matches: Vec<BlockId> = blocks.filter(|id| id.matches_hex_prefix(query)).collect();

    match matches.len() {
        0 => Err(PrefixError::NoMatch(query.to_string())),
        1 => Ok(matches[0]),
        _ => Err(PrefixError::Ambiguous {
            prefix: query.to_string(),
            candidates: matches.iter().map(|id| id.short()).collect(),
        }),
    }
}

// ============================================================================
// Tests
// ============================================================================
