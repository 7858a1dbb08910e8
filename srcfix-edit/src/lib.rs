//! Edit engine for srcfix.
//!
//! Responsibilities:
//! - Compile declarative rules into pure [`FixRule`]s and run [`FixSet`]s over text.
//! - Decode file bytes tolerantly.
//! - Commit new contents atomically (temp file + rename).
//! - Generate a unified diff preview.

pub mod commit;
pub mod decode;
pub mod diff;
pub mod error;
pub mod fixset;
pub mod rule;

pub use commit::{StagedWrite, stage_write, write_atomic};
pub use decode::{Decoded, decode_lossy};
pub use diff::{FileDiff, render_patch};
pub use error::RuleError;
pub use fixset::{FixSet, RuleEntry, SetApplication};
pub use rule::{FixRule, Guard, RuleApplication, escape_replacement};

use sha2::{Digest, Sha256};

pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}
