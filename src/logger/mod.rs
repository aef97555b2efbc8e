//! Activity logging: append-only JSONL with stderr fallback.

pub mod activity;
pub mod jsonl;
