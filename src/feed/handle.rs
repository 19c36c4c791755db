use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{broadcast, Mutex, MutexGuard};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::engagement::ScheduledEngagement;
use crate::feed::FeedState;
use crate::{Post, Signal};

/// Shared owner of [`FeedState`]. Runs delayed engagement on the tokio
/// runtime and keeps one abortable handle per pending post.
#[derive(Clone)]
pub struct Feed {
    state: Arc<Mutex<FeedState>>,
    timers: Arc<Mutex<HashMap<String, JoinHandle<()>>>>,
}

impl Feed {
    pub fn new(state: FeedState) -> Self {
        Self {
            state: Arc::new(Mutex::new(state)),
            timers: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub async fn lock(&self) -> MutexGuard<'_, FeedState> {
        self.state.lock().await
    }

    pub async fn subscribe_signals(&self) -> broadcast::Receiver<Signal> {
        self.state.lock().await.subscribe_signals()
    }

    pub async fn add_post(&self, content: &str, parent_id: Option<&str>) -> Result<Post, String> {
        let (post, scheduled) = self.state.lock().await.add_post(content, parent_id)?;
        if let Some(scheduled) = scheduled {
            self.schedule(scheduled).await;
        }
        Ok(post)
    }

    pub async fn delete_post(&self, post_id: &str) -> bool {
        if let Some(handle) = self.timers.lock().await.remove(post_id) {
            handle.abort();
            debug!(post_id = %post_id, "engagement timer aborted");
        }
        self.state.lock().await.delete_post(post_id)
    }

    pub async fn pending_engagements(&self) -> usize {
        self.timers.lock().await.len()
    }

    async fn schedule(&self, scheduled: ScheduledEngagement) {
        let state = self.state.clone();
        let timers = self.timers.clone();
        let post_id = scheduled.post_id.clone();

        // Held across the spawn so the task cannot unregister before it is registered.
        let mut guard = self.timers.lock().await;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(scheduled.delay).await;
            state.lock().await.fire_engagement(&scheduled.post_id);
            timers.lock().await.remove(&scheduled.post_id);
        });
        guard.insert(post_id, handle);
    }
}
