//! Property-based tests for the BO3 Assistant
//!
//! Property tests verify invariants that should hold for every match a user
//! can enter, rather than hand-picked cases.
//!
//! ## Running Property Tests
//!
//! ```sh
//! cargo test property --release
//! ```
//!
//! ## Test Modules
//!
//! - `wizard_props`: state machine invariants
//!   - A 1-1 split always requires game 3 with each side's losing class
//!   - Two wins decide the match for that side, never both
//!   - Opponent options never include a class the opponent already won with
//!   - Reset always returns to class selection with an empty record
//!   - Back from results lands on game 3 iff it was played
//!
//! - `format_props`: output formatter invariants
//!   - Deterministic and trimmed
//!   - One line per played game plus header and result

mod format_props;
mod wizard_props;
