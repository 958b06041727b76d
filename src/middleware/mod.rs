// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Request interceptors (authentication).

pub mod auth;

pub use auth::{Attempt, AuthPipeline, RefreshFailure, RevocationHook};
