// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models mirroring the backend's JSON shapes.

pub mod auth;
pub mod user;
pub mod video;

pub use auth::{
    AuthResponse, HealthResponse, LoginRequest, ProfileResponse, RefreshRequest,
    RefreshResponse, SignupRequest,
};
pub use user::{CredentialPair, EmptyTokenError, UserProfile};
pub use video::{Dashboard, StreamResponse, Video, WatchEvent};
