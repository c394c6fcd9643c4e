//! BO3 Match Recording
//!
//! Walks the user through recording a best-of-three match and renders the
//! result as shareable text.
//!
//! # Overview
//!
//! 1. Class Selection - the two classes brought to the match
//! 2. Match Info - round label and opponent name
//! 3. Game 1 / Game 2 - per-game classes, turn order, result and memo
//! 4. Game 3 - only when the first two games split 1-1
//! 5. Results - formatted output and optional message suggestion
//!
//! # Design Principles
//!
//! - **Derived, not stored**: class options are recomputed from the record
//! - **Progressive**: users can move backward and revise earlier steps
//! - **Consistent**: revisions prune later games they invalidate
//! - **Ephemeral**: nothing is persisted; reset discards the record

mod format;
mod types;
mod wizard;

pub use format::*;
pub use types::*;
pub use wizard::*;
