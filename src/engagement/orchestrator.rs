use std::collections::HashMap;
use std::time::Duration;

use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::engagement::ReplySelector;
use crate::rng::RandomSource;
use crate::{NewNotification, NotificationKind, Post, SignalKind};

/// Write side of the shared application state that engagement touches.
pub trait EngagementSink {
    /// Inserts `batch` ahead of existing posts, keeping batch order.
    fn insert_posts(&mut self, batch: Vec<Post>);
    fn append_notification(&mut self, notification: NewNotification);
    fn emit_signal(&mut self, kind: SignalKind, message: String);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngagementState {
    PendingEngagement,
    EngagementMaterialized,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledEngagement {
    pub post_id: String,
    pub delay: Duration,
}

pub struct EngagementOrchestrator {
    selector: ReplySelector,
    rng: Box<dyn RandomSource>,
    local_user_id: String,
    delay: Duration,
    timestamp_step_ms: i64,
    enabled: bool,
    states: HashMap<String, EngagementState>,
    pending_posts: HashMap<String, Post>,
    next_seq: u64,
}

impl EngagementOrchestrator {
    pub fn new(selector: ReplySelector, rng: Box<dyn RandomSource>, config: &EngineConfig) -> Self {
        Self {
            selector,
            rng,
            local_user_id: config.local_user_id.clone(),
            delay: Duration::from_millis(config.reply_delay_ms),
            timestamp_step_ms: config.timestamp_step_ms.max(1) as i64,
            enabled: config.enabled,
            states: HashMap::new(),
            pending_posts: HashMap::new(),
            next_seq: 0,
        }
    }

    pub fn selector(&self) -> &ReplySelector {
        &self.selector
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn state(&self, post_id: &str) -> Option<EngagementState> {
        self.states.get(post_id).copied()
    }

    pub fn is_synthetic_author(&self, user_id: &str) -> bool {
        self.selector.registry().contains(user_id)
    }

    pub fn on_post_created(&mut self, post: &Post) -> Option<ScheduledEngagement> {
        if !self.enabled || !ReplySelector::is_eligible(post, &self.local_user_id) {
            return None;
        }
        if self.states.contains_key(&post.id) {
            return None;
        }

        self.states
            .insert(post.id.clone(), EngagementState::PendingEngagement);
        self.pending_posts.insert(post.id.clone(), post.clone());
        debug!(post_id = %post.id, delay_ms = self.delay.as_millis() as u64, "engagement scheduled");

        Some(ScheduledEngagement {
            post_id: post.id.clone(),
            delay: self.delay,
        })
    }

    /// Runs the delayed action for `post_id`. Returns the number of synthetic
    /// replies written; zero when the post is not pending.
    pub fn materialize(&mut self, post_id: &str, now_ms: i64, sink: &mut dyn EngagementSink) -> usize {
        if self.state(post_id) != Some(EngagementState::PendingEngagement) {
            return 0;
        }
        self.states
            .insert(post_id.to_string(), EngagementState::EngagementMaterialized);
        let post = match self.pending_posts.remove(post_id) {
            Some(post) => post,
            None => return 0,
        };

        let selected = self
            .selector
            .select_replies(&post, &self.local_user_id, self.rng.as_mut());
        if selected.is_empty() {
            return 0;
        }

        let batch: Vec<Post> = selected
            .iter()
            .enumerate()
            .map(|(index, reply)| {
                let seq = self.next_seq;
                self.next_seq += 1;
                Post {
                    id: format!("ai-reply-{}-{}", now_ms, seq),
                    created_at: now_ms + index as i64 * self.timestamp_step_ms,
                    content: reply.text.clone(),
                    author_id: reply.responder.id.clone(),
                    parent_id: Some(post.id.clone()),
                }
            })
            .collect();

        let count = batch.len();
        let authors: Vec<String> = batch.iter().map(|reply| reply.author_id.clone()).collect();
        sink.insert_posts(batch);
        sink.emit_signal(SignalKind::Ai, replies_message(count));
        for author_id in authors {
            sink.append_notification(NewNotification {
                kind: NotificationKind::Reply,
                actor_id: author_id,
                related_post_id: Some(post.id.clone()),
                message: "replied to your post".to_string(),
                timestamp: now_ms,
            });
        }

        info!(post_id = %post.id, replies = count, "engagement materialized");
        count
    }

    /// Drops a pending engagement. Returns true when one was pending.
    pub fn cancel(&mut self, post_id: &str) -> bool {
        if self.state(post_id) != Some(EngagementState::PendingEngagement) {
            return false;
        }
        self.states
            .insert(post_id.to_string(), EngagementState::Cancelled);
        self.pending_posts.remove(post_id);
        info!(post_id = %post_id, "pending engagement cancelled");
        true
    }

    /// Forgets everything tracked for `post_id`; a later fire is a no-op.
    pub fn release(&mut self, post_id: &str) {
        self.states.remove(post_id);
        self.pending_posts.remove(post_id);
    }
}

fn replies_message(count: usize) -> String {
    if count == 1 {
        "1 person replied to your post! 🎉".to_string()
    } else {
        format!("{} people replied to your post! 🎉", count)
    }
}

