// SPDX-License-Identifier: MIT OR Apache-2.0

// src/core/config/uniflux_query_context.rs

use crate::core::config::uniflux_app_context::UnifluxAppContext;
use std::sync::Arc;

/// Per-query naming context. Component ids for state holders are derived
/// from the query name, so it must be stable across restarts.
#[derive(Debug)]
pub struct UnifluxQueryContext {
    pub app_context: Arc<UnifluxAppContext>,
    pub name: String,
    pub partition_id: Option<String>,
}

impl UnifluxQueryContext {
    pub fn new(
        app_context: Arc<UnifluxAppContext>,
        name: String,
        partition_id: Option<String>,
    ) -> Self {
        Self {
            app_context,
            name,
            partition_id,
        }
    }

    pub fn get_name(&self) -> String {
        match &self.partition_id {
            Some(partition) => format!("{}_{partition}", self.name),
            None => self.name.clone(),
        }
    }
}
