//! Runtime abstraction layer for async operations
//!
//! Background work (the plate boundary fetch) goes through [`spawn`], so the
//! library only names a concrete runtime in one place.

use futures::future::{BoxFuture, FutureExt};
use std::future::Future;
use once_cell::sync::OnceCell;

/// A trait for spawning async tasks (object-safe version)
pub trait AsyncSpawner: Send + Sync + 'static {
    /// Spawn a future and return a handle to it
    fn spawn_boxed(
        &self,
        future: BoxFuture<'static, ()>,
    ) -> Box<dyn AsyncHandle>;
}

/// Handle to a spawned async task
pub trait AsyncHandle: Send + Sync {
    /// Check if the task is finished
    fn is_finished(&self) -> bool;

    /// Cancel the task
    fn cancel(&self);
}

/// Spawns a detached task on the global runtime
pub fn spawn<F>(future: F) -> Box<dyn AsyncHandle>
where
    F: Future<Output = ()> + Send + 'static,
{
    log::trace!("Spawning background task");
    runtime().spawn_boxed(future.boxed())
}

/// Default spawner implementations
pub mod spawners {
    use super::*;

    pub mod tokio_impl {
        use super::*;
        use ::tokio::task::JoinHandle;

        /// Tokio-based async spawner. Must be used from within a Tokio runtime.
        pub struct TokioSpawner;

        impl AsyncSpawner for TokioSpawner {
            fn spawn_boxed(
                &self,
                future: BoxFuture<'static, ()>,
            ) -> Box<dyn AsyncHandle> {
                let handle = ::tokio::spawn(future);
                Box::new(TokioHandle(handle))
            }
        }

        struct TokioHandle(JoinHandle<()>);

        impl AsyncHandle for TokioHandle {
            fn is_finished(&self) -> bool {
                self.0.is_finished()
            }

            fn cancel(&self) {
                self.0.abort();
            }
        }
    }
}

pub mod async_utils {
    /// Runtime-agnostic sleep
    pub async fn async_delay(duration: std::time::Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Global runtime instance
static RUNTIME: OnceCell<Box<dyn AsyncSpawner>> = OnceCell::new();

/// Initialize the runtime with a specific spawner. Has no effect once a
/// spawner is in place.
pub fn init_runtime(spawner: Box<dyn AsyncSpawner>) {
    if RUNTIME.set(spawner).is_err() {
        log::debug!("Runtime already initialised; keeping the existing spawner");
    }
}

/// Get the global runtime spawner
pub fn runtime() -> &'static dyn AsyncSpawner {
    RUNTIME
        .get_or_init(|| Box::new(spawners::tokio_impl::TokioSpawner))
        .as_ref()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[::tokio::test]
    async fn test_tokio_spawner() {
        let handle = spawn(async {
            async_utils::async_delay(Duration::from_millis(50)).await;
        });

        // Should not be finished immediately
        assert!(!handle.is_finished());

        // Wait a bit and check again
        async_utils::async_delay(Duration::from_millis(200)).await;
        assert!(handle.is_finished());
    }

    #[::tokio::test]
    async fn test_spawn_boxed_runs_to_completion() {
        use std::sync::{
            atomic::{AtomicBool, Ordering},
            Arc,
        };

        let done = Arc::new(AtomicBool::new(false));
        let flag = done.clone();
        let handle = runtime().spawn_boxed(
            async move {
                flag.store(true, Ordering::SeqCst);
            }
            .boxed(),
        );

        async_utils::async_delay(Duration::from_millis(50)).await;
        assert!(handle.is_finished());
        assert!(done.load(Ordering::SeqCst));
    }

    #[::tokio::test]
    async fn test_cancel() {
        let handle = spawn(async {
            async_utils::async_delay(Duration::from_secs(60)).await;
        });
        handle.cancel();
        async_utils::async_delay(Duration::from_millis(50)).await;
        assert!(handle.is_finished());
    }
}
