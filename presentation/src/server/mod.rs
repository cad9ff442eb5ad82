//! HTTP surface kept for clients of the retired resume endpoints.

pub mod legacy_resume;
