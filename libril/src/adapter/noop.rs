// libril/src/adapter/noop.rs

use crate::adapter::VendorAdapter;

/// Adapter for daemons that follow the base layouts exactly.
#[derive(Debug, Default)]
pub struct NoopAdapter;

impl NoopAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl VendorAdapter for NoopAdapter {
    fn name(&self) -> &'static str {
        "generic"
    }
}
