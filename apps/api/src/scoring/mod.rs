// ATS keyword scoring.
// Pure, deterministic, no I/O: safe to call from any handler without spawn_blocking.

pub mod ats;

pub use ats::{ats_report, AtsReport};
