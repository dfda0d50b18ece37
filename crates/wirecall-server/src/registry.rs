use std::collections::HashMap;
use std::sync::Arc;

use crate::handler::RpcHandler;

/// Name → handler lookup table.
///
/// Populated once at startup and read-only during dispatch; handlers are
/// shared through `Arc`, so the read path needs no locking.
#[derive(Default)]
pub struct MethodRegistry {
    handlers: HashMap<String, Arc<dyn RpcHandler>>,
}

impl MethodRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for a specific method
    pub fn register<H>(&mut self, method: impl Into<String>, handler: H)
    where
        H: RpcHandler + 'static,
    {
        self.handlers.insert(method.into(), Arc::new(handler));
    }

    /// Register one handler instance under several method names
    pub fn register_methods<H>(&mut self, methods: Vec<String>, handler: H)
    where
        H: RpcHandler + 'static,
    {
        let handler = Arc::new(handler);
        for method in methods {
            self.handlers.insert(method, handler.clone());
        }
    }

    pub fn lookup(&self, method: &str) -> Option<Arc<dyn RpcHandler>> {
        self.handlers.get(method).cloned()
    }

    /// All registered method names
    pub fn method_names(&self) -> Vec<String> {
        self.handlers.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}
