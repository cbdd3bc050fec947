// SPDX-FileCopyrightText: 2026 Listwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared test doubles for the listwatch workspace.
//!
//! In-memory implementations of the storage traits and a call-recording
//! relay, used by the reconciliation engine tests and the binary's
//! end-to-end tests.

pub mod memory_store;
pub mod recording_relay;

pub use memory_store::{MemoryRecordStore, MemoryTokenStore};
pub use recording_relay::RecordingRelay;
