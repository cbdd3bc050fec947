// SPDX-FileCopyrightText: 2026 Listwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reconciliation engine and token lifecycle for the listwatch notifier.
//!
//! [`SyncEngine::reconcile`] performs one full pass over the remote
//! listing, deciding create/update/skip per item and dispatching webhook
//! notifications. [`TokenManager`] keeps the OAuth2 session alive across
//! cycles and process restarts.

pub mod engine;
pub mod markup;
pub mod token;

pub use engine::{CycleStats, SyncEngine};
pub use token::{SessionOutcome, TokenManager};
