// SPDX-FileCopyrightText: 2026 Listwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait seams between the reconciliation engine and its collaborators.

pub mod relay;
pub mod store;

pub use relay::Relay;
pub use store::{RecordStore, TokenStore};
