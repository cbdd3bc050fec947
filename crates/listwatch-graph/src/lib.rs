// SPDX-FileCopyrightText: 2026 Listwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Remote list API and OAuth2 token client for the listwatch notifier.
//!
//! [`GraphClient`] walks the bearer-authenticated listing and detail
//! endpoints; [`TokenClient`] performs the form-encoded token exchanges.
//! Base URLs come from configuration so tests run against wiremock.

pub mod client;
pub mod token;
pub mod types;

pub use client::GraphClient;
pub use token::TokenClient;
pub use types::{ItemDetail, ListItemSummary, ListPage, TokenResponse};
