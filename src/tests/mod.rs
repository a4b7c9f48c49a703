//! Crate-level test suites
//!
//! - `common`: shared fixtures (JSON payloads, mock APIs, event draining)
//! - `unit`: controller scenarios against a mocked `DocumentApi`
//! - `property`: proptest invariants for normalization, filtering and paging
