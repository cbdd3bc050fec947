// SPDX-FileCopyrightText: 2026 Listwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the listwatch notifier.
//!
//! This crate provides the error type, domain types, and the trait seams
//! (record store, token store, relay) that the reconciliation engine is
//! written against. Concrete implementations live in the sibling crates.

pub mod error;
pub mod traits;
pub mod types;

pub use error::ListwatchError;
pub use traits::{RecordStore, Relay, TokenStore};
pub use types::{NotificationRecord, OauthSession};
