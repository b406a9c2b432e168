// crates/mietpreis-core/src/liveness.rs
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared "is the form still mounted" flag.
///
/// Async work clones the token when it starts and checks it before writing
/// its outcome back; [`Liveness::revoke`] on teardown makes every clone
/// report dead.
#[derive(Debug, Clone)]
pub struct Liveness(Arc<AtomicBool>);

impl Default for Liveness {
    fn default() -> Self {
        Liveness(Arc::new(AtomicBool::new(true)))
    }
}

impl Liveness {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_alive(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    pub fn revoke(&self) {
        self.0.store(false, Ordering::Release);
    }
}
