//! Pipeline stages for PDF-table-to-CSV extraction.
//!
//! Each submodule implements exactly one transformation step. Keeping stages
//! separate makes each independently testable and lets us swap the detection
//! engine without touching the others.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ detect ──▶ normalize ──▶ writer
//! (URL/path) (engine)  (strip C + NFC) (CSV)
//! ```
//!
//! 1. [`input`]     — canonicalise the user-supplied path or URL to a local file
//! 2. [`detect`]    — per-page table detection via the external engine; runs
//!    under `spawn_blocking` because the engine is synchronous and CPU-bound
//! 3. [`normalize`] — deterministic per-cell Unicode cleanup
//! 4. [`writer`]    — CSV serialisation with the empty-result policy

pub mod detect;
pub mod input;
pub mod normalize;
pub mod writer;
