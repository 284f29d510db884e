//! Warning sink used when an option value is recovered with a default.

use std::sync::{Arc, Mutex};

/// Something that can report a warning.
pub trait Logger: Send + Sync {
    fn warn(&self, message: &str);
}

/// Forwards warnings to `tracing` (target `cliframe`).
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn warn(&self, message: &str) {
        tracing::warn!(target: "cliframe", "{message}");
    }
}

/// Keeps warnings in memory so they can be inspected later.
#[derive(Debug, Default)]
pub struct MemoryLogger {
    warnings: Mutex<Vec<String>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Warnings recorded so far, oldest first.
    pub fn warnings(&self) -> Vec<String> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<String>> {
        // A poisoned buffer still holds valid strings.
        self.warnings.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Logger for MemoryLogger {
    fn warn(&self, message: &str) {
        self.lock().push(message.to_string());
    }
}

pub(crate) fn default_logger() -> Arc<dyn Logger> {
    Arc::new(TracingLogger)
}
