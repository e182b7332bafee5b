//! Process-wide reference-counted services. The first `acquire` sets the
//! resource up and dropping the last `Lease` tears it down.

use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use tracing::debug;

pub trait LeaseHooks: Send {
    fn on_first_acquire(&mut self);
    fn on_last_release(&mut self);
}

struct Shared<H> {
    hooks: H,
    count: usize,
}

fn lock<H>(shared: &Mutex<Shared<H>>) -> MutexGuard<'_, Shared<H>> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct SharedService<H: LeaseHooks> {
    shared: Arc<Mutex<Shared<H>>>,
}

impl<H: LeaseHooks> Clone for SharedService<H> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<H: LeaseHooks> SharedService<H> {
    pub fn new(hooks: H) -> Self {
        Self {
            shared: Arc::new(Mutex::new(Shared { hooks, count: 0 })),
        }
    }

    pub fn acquire(&self) -> Lease<H> {
        let mut shared = lock(&self.shared);
        if shared.count == 0 {
            shared.hooks.on_first_acquire();
        }
        shared.count += 1;
        debug!(leases = shared.count, "lease acquired");
        Lease {
            shared: Arc::clone(&self.shared),
        }
    }

    pub fn active_leases(&self) -> usize {
        lock(&self.shared).count
    }

    pub fn with_hooks<R>(&self, f: impl FnOnce(&H) -> R) -> R {
        f(&lock(&self.shared).hooks)
    }
}

/// Held share of a `SharedService`.
#[must_use = "the lease is released as soon as it is dropped"]
pub struct Lease<H: LeaseHooks> {
    shared: Arc<Mutex<Shared<H>>>,
}

impl<H: LeaseHooks> Drop for Lease<H> {
    fn drop(&mut self) {
        let mut shared = lock(&self.shared);
        shared.count = shared.count.saturating_sub(1);
        debug!(leases = shared.count, "lease released");
        if shared.count == 0 {
            shared.hooks.on_last_release();
        }
    }
}

/// Page scroll lock shared by every open modal and drawer.
#[derive(Debug)]
pub struct ScrollLock {
    overflow: String,
    saved: Option<String>,
}

impl ScrollLock {
    pub fn new(overflow: impl Into<String>) -> Self {
        Self {
            overflow: overflow.into(),
            saved: None,
        }
    }

    /// Current body overflow style.
    pub fn overflow(&self) -> &str {
        &self.overflow
    }

    pub fn is_locked(&self) -> bool {
        self.saved.is_some()
    }
}

impl LeaseHooks for ScrollLock {
    fn on_first_acquire(&mut self) {
        self.saved = Some(std::mem::replace(&mut self.overflow, "hidden".into()));
    }

    fn on_last_release(&mut self) {
        if let Some(saved) = self.saved.take() {
            self.overflow = saved;
        }
    }
}

static SCROLL_LOCK: OnceLock<SharedService<ScrollLock>> = OnceLock::new();

/// The application-wide scroll lock.
pub fn scroll_lock() -> &'static SharedService<ScrollLock> {
    SCROLL_LOCK.get_or_init(|| SharedService::new(ScrollLock::new("auto")))
}
