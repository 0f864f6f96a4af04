//! Timer abstraction for scripted reply delays

use async_trait::async_trait;
use std::time::Duration;

/// Source of delays. Injected so tests do not sleep.
#[async_trait]
pub trait Scheduler: Send + Sync + 'static {
    async fn sleep(&self, duration: Duration);
}

/// Real delays on the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioScheduler;

#[async_trait]
impl Scheduler for TokioScheduler {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
