// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - HTTP transport and typed API operations.

pub mod api;
pub mod transport;

pub use api::ApiClient;
pub use transport::{ApiRequest, ApiResponse, HttpTransport};
