use crate::cancel::CancellationToken;
use apnum_core::{ApnumError, ContextConfig, DigitBackendFactory, Result};
use apnum_storage::{DefaultBackend, DigitSequence};
use once_cell::sync::{Lazy, OnceCell};
use parking_lot::RwLock;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::cell::RefCell;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{debug, info};

static GLOBAL: Lazy<RwLock<Arc<Context>>> = Lazy::new(|| RwLock::new(Arc::new(Context::default())));

thread_local! {
    static CURRENT: RefCell<Option<Arc<Context>>> = RefCell::new(None);
}

/// Configuration, storage backend, worker pool and cancellation token of a computation.
///
/// Operations pick up [`Context::current`]: the thread-scoped context entered
/// with [`Context::enter`] if any, the process-wide default otherwise.
/// Threads spawned by a computation do not inherit the caller's scoped
/// context; they must enter it themselves.
pub struct Context {
    config: ContextConfig,
    backend: Arc<dyn DigitBackendFactory>,
    pool: OnceCell<Arc<ThreadPool>>,
    cancellation: CancellationToken,
}

impl Context {
    /// Validates `config` and resolves its backend name.
    pub fn new(config: ContextConfig) -> Result<Self> {
        config.validate()?;
        let backend = apnum_storage::lookup(&config.backend)?;
        debug!(backend = backend.name(), processors = config.number_of_processors, "created context");
        Ok(Self { config, backend, pool: OnceCell::new(), cancellation: CancellationToken::new() })
    }

    /// A new context built from this one's configuration after `update`.
    pub fn derive(&self, update: impl FnOnce(&mut ContextConfig)) -> Result<Self> {
        let mut config = self.config.clone();
        update(&mut config);
        Self::new(config)
    }

    /// The process-wide default.
    pub fn global() -> Arc<Context> {
        GLOBAL.read().clone()
    }

    /// Replaces the process-wide default, returning the previous one.
    pub fn set_global(context: Arc<Context>) -> Arc<Context> {
        std::mem::replace(&mut *GLOBAL.write(), context)
    }

    /// The context in effect on this thread.
    pub fn current() -> Arc<Context> {
        CURRENT.with(|c| c.borrow().clone()).unwrap_or_else(Self::global)
    }

    /// Makes this context current on the calling thread until the guard is dropped.
    pub fn enter(self: &Arc<Self>) -> ContextGuard {
        let previous = CURRENT.with(|c| c.borrow_mut().replace(Arc::clone(self)));
        ContextGuard { previous, _not_send: PhantomData }
    }

    pub fn config(&self) -> &ContextConfig {
        &self.config
    }

    pub fn radix(&self) -> u32 {
        self.config.default_radix
    }

    pub fn processors(&self) -> usize {
        self.config.number_of_processors
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }

    /// `Err(Interrupted)` while a cancellation is pending on this context.
    pub fn check_cancelled(&self) -> Result<()> {
        self.cancellation.check()
    }

    /// Clears a pending cancellation so the next computation can run.
    pub fn reset(&self) {
        self.cancellation.reset();
    }

    /// Worker pool sized by `number_of_processors`, built on first use.
    pub fn pool(&self) -> Result<Arc<ThreadPool>> {
        self.pool
            .get_or_try_init(|| {
                let threads = self.config.number_of_processors;
                debug!(threads, "starting worker pool");
                ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .thread_name(|i| format!("apnum-worker-{}", i))
                    .build()
                    .map(Arc::new)
                    .map_err(|e| ApnumError::invalid(format!("Cannot start worker pool: {}", e)))
            })
            .cloned()
    }

    /// Runs `op` inside the worker pool; on the calling thread when only one processor is configured.
    pub fn install<R, F>(&self, op: F) -> Result<R>
    where
        F: FnOnce() -> R + Send,
        R: Send,
    {
        if self.processors() <= 1 {
            Ok(op())
        } else {
            Ok(self.pool()?.install(op))
        }
    }

    /// Hands `digits` to the configured backend.
    pub fn store(&self, digits: Vec<u8>) -> Result<DigitSequence> {
        if digits.is_empty() {
            return Ok(DigitSequence::empty());
        }
        let store = self.backend.create(digits, &self.config)?;
        Ok(DigitSequence::from_store(store))
    }

    /// Orderly shutdown: sweeps leftover temporary files when `cleanup_at_exit` is set.
    pub fn shutdown(&self) -> usize {
        if self.config.cleanup_at_exit {
            let removed = apnum_storage::cleanup();
            info!(removed, "swept temporary digit files");
            removed
        } else {
            0
        }
    }
}

impl Default for Context {
    fn default() -> Self {
        Self {
            config: ContextConfig::default(),
            backend: Arc::new(DefaultBackend),
            pool: OnceCell::new(),
            cancellation: CancellationToken::new(),
        }
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("backend", &self.backend.name())
            .field("config", &self.config)
            .field("cancelled", &self.cancellation.is_cancelled())
            .finish()
    }
}

/// Restores the previously current context when dropped. Not `Send`: a
/// guard belongs to the thread that entered the context.
#[must_use = "the context is left as soon as the guard is dropped"]
pub struct ContextGuard {
    previous: Option<Arc<Context>>,
    _not_send: PhantomData<*const ()>,
}

impl Drop for ContextGuard {
    fn drop(&mut self) {
        let previous = self.previous.take();
        CURRENT.with(|c| *c.borrow_mut() = previous);
    }
}
