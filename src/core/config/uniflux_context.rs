// SPDX-License-Identifier: MIT OR Apache-2.0

// src/core/config/uniflux_context.rs

use crate::core::persistence::persistence_store::PersistenceStore;
use crate::core::query::processor::stream::window::WindowProcessorFactory;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Process-wide registry shared by every application: window factories and
/// the configured persistence store.
#[derive(Debug, Default)]
pub struct UnifluxContext {
    window_factories: RwLock<HashMap<String, Box<dyn WindowProcessorFactory>>>,
    persistence_store: RwLock<Option<Arc<dyn PersistenceStore>>>,
}

impl UnifluxContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_window_factory(&self, factory: Box<dyn WindowProcessorFactory>) {
        self.window_factories
            .write()
            .unwrap()
            .insert(factory.name().to_string(), factory);
    }

    pub fn get_window_factory(&self, name: &str) -> Option<Box<dyn WindowProcessorFactory>> {
        self.window_factories
            .read()
            .unwrap()
            .get(name)
            .map(|f| f.clone_box())
    }

    pub fn list_window_factory_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .window_factories
            .read()
            .unwrap()
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }

    pub fn set_persistence_store(&self, store: Arc<dyn PersistenceStore>) {
        *self.persistence_store.write().unwrap() = Some(store);
    }

    pub fn get_persistence_store(&self) -> Option<Arc<dyn PersistenceStore>> {
        self.persistence_store.read().unwrap().clone()
    }
}
