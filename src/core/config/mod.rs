// SPDX-License-Identifier: MIT OR Apache-2.0

// src/core/config/mod.rs

pub mod uniflux_app_context;
pub mod uniflux_context;
pub mod uniflux_query_context;

pub use self::uniflux_app_context::UnifluxAppContext;
pub use self::uniflux_context::UnifluxContext;
pub use self::uniflux_query_context::UnifluxQueryContext;
