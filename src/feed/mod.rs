pub mod handle;
pub mod seed;

use serde::Serialize;
use std::collections::HashSet;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::engagement::{
    ContentClassifier, EngagementOrchestrator, EngagementSink, EngagementState, ReplyCorpus,
    ReplySelector, ResponderRegistry, ScheduledEngagement,
};
use crate::rng::{RandomSource, StdRandom};
use crate::{now_ms, NewNotification, Notification, NotificationKind, Post, Signal, SignalKind, User};

pub use handle::Feed;

const SIGNAL_HISTORY: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationFilter {
    All,
    Mentions,
}

#[derive(Debug, Clone, Serialize)]
pub struct Thread {
    pub post: Post,
    /// Direct replies, oldest first.
    pub replies: Vec<Post>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProfileStats {
    pub posts: usize,
    pub replies: usize,
    pub likes: usize,
    pub following: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchResults {
    pub posts: Vec<Post>,
    pub users: Vec<User>,
}

struct FeedStore {
    posts: Vec<Post>,
    notifications: Vec<Notification>,
    signals: Vec<Signal>,
    signal_tx: broadcast::Sender<Signal>,
    next_notification: u64,
}

impl FeedStore {
    fn new(posts: Vec<Post>) -> Self {
        let (signal_tx, _) = broadcast::channel(32);
        Self {
            posts,
            notifications: Vec::new(),
            signals: Vec::new(),
            signal_tx,
            next_notification: 0,
        }
    }
}

impl EngagementSink for FeedStore {
    fn insert_posts(&mut self, batch: Vec<Post>) {
        self.posts.splice(0..0, batch);
    }

    fn append_notification(&mut self, notification: NewNotification) {
        self.next_notification += 1;
        let id = format!("notif-{}-{}", notification.timestamp, self.next_notification);
        self.notifications.insert(
            0,
            Notification {
                id,
                kind: notification.kind,
                actor_id: notification.actor_id,
                related_post_id: notification.related_post_id,
                message: notification.message,
                timestamp: notification.timestamp,
                read: false,
            },
        );
    }

    fn emit_signal(&mut self, kind: SignalKind, message: String) {
        let signal = Signal {
            kind,
            message,
            timestamp: now_ms(),
        };
        let _ = self.signal_tx.send(signal.clone());
        self.signals.insert(0, signal);
        self.signals.truncate(SIGNAL_HISTORY);
    }
}

pub struct FeedState {
    store: FeedStore,
    users: Vec<User>,
    liked: HashSet<String>,
    retweeted: HashSet<String>,
    followed: HashSet<String>,
    engine: EngagementOrchestrator,
    local_user_id: String,
    max_post_chars: usize,
    next_post_seq: u64,
}

impl FeedState {
    pub fn new(
        config: &EngineConfig,
        engine: EngagementOrchestrator,
        mut users: Vec<User>,
        posts: Vec<Post>,
        followed: Vec<String>,
    ) -> Self {
        for identity in engine.selector().registry().identities() {
            if !users.iter().any(|user| user.id == identity.id) {
                users.push(identity.to_user());
            }
        }

        Self {
            store: FeedStore::new(posts),
            users,
            liked: HashSet::new(),
            retweeted: HashSet::new(),
            followed: followed.into_iter().collect(),
            engine,
            local_user_id: config.local_user_id.clone(),
            max_post_chars: config.max_post_chars,
            next_post_seq: 0,
        }
    }

    pub fn from_config(config: &EngineConfig, rng: Box<dyn RandomSource>) -> Self {
        let selector = ReplySelector::new(
            ResponderRegistry::default_catalog(),
            ReplyCorpus::default_catalog(),
            ContentClassifier::default(),
            config.min_replies,
            config.max_replies,
        );
        let engine = EngagementOrchestrator::new(selector, rng, config);
        Self::new(
            config,
            engine,
            seed::users(),
            seed::posts(now_ms()),
            seed::followed(),
        )
    }

    pub fn with_default_rng(config: &EngineConfig) -> Self {
        let rng: Box<dyn RandomSource> = match config.seed {
            Some(seed) => Box::new(StdRandom::seeded(seed)),
            None => Box::new(StdRandom::from_entropy()),
        };
        Self::from_config(config, rng)
    }

    pub fn local_user_id(&self) -> &str {
        &self.local_user_id
    }

    pub fn posts(&self) -> &[Post] {
        &self.store.posts
    }

    pub fn post(&self, post_id: &str) -> Option<&Post> {
        self.store.posts.iter().find(|post| post.id == post_id)
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn user(&self, user_id: &str) -> Option<&User> {
        self.users.iter().find(|user| user.id == user_id)
    }

    pub fn signals(&self) -> &[Signal] {
        &self.store.signals
    }

    pub fn subscribe_signals(&self) -> broadcast::Receiver<Signal> {
        self.store.signal_tx.subscribe()
    }

    pub fn is_liked(&self, post_id: &str) -> bool {
        self.liked.contains(post_id)
    }

    pub fn is_retweeted(&self, post_id: &str) -> bool {
        self.retweeted.contains(post_id)
    }

    pub fn is_following(&self, user_id: &str) -> bool {
        self.followed.contains(user_id)
    }

    pub fn engagement_enabled(&self) -> bool {
        self.engine.is_enabled()
    }

    pub fn engagement_state(&self, post_id: &str) -> Option<EngagementState> {
        self.engine.state(post_id)
    }

    pub fn add_post(
        &mut self,
        content: &str,
        parent_id: Option<&str>,
    ) -> Result<(Post, Option<ScheduledEngagement>), String> {
        let content = content.trim();
        if content.is_empty() {
            warn!("rejected empty post");
            return Err("post content is required".to_string());
        }
        let length = content.chars().count();
        if length > self.max_post_chars {
            warn!(length, limit = self.max_post_chars, "rejected long post");
            return Err(format!(
                "post is too long: {} characters (maximum {})",
                length, self.max_post_chars
            ));
        }

        let parent_owner = match parent_id {
            Some(parent_id) => match self.post(parent_id) {
                Some(parent) => Some(parent.author_id.clone()),
                None => return Err(format!("parent post not found: {}", parent_id)),
            },
            None => None,
        };

        let now = now_ms();
        self.next_post_seq += 1;
        let post = Post {
            id: format!("{}-{}", now, self.next_post_seq),
            created_at: now,
            content: content.to_string(),
            author_id: self.local_user_id.clone(),
            parent_id: parent_id.map(str::to_string),
        };
        self.store.posts.insert(0, post.clone());
        debug!(post_id = %post.id, reply = parent_id.is_some(), "post created");

        if let (Some(parent_id), Some(owner)) = (parent_id, parent_owner) {
            if owner != self.local_user_id {
                self.store.append_notification(NewNotification {
                    kind: NotificationKind::Reply,
                    actor_id: self.local_user_id.clone(),
                    related_post_id: Some(parent_id.to_string()),
                    message: "replied to your post".to_string(),
                    timestamp: now,
                });
            }
        }

        let scheduled = self.engine.on_post_created(&post);
        Ok((post, scheduled))
    }

    /// Runs the delayed engagement for `post_id`, if it is still pending.
    pub fn fire_engagement(&mut self, post_id: &str) -> usize {
        self.engine.materialize(post_id, now_ms(), &mut self.store)
    }

    /// Removes a post and its direct replies. Pending engagement is cancelled
    /// and the post's engagement tracking is released.
    pub fn delete_post(&mut self, post_id: &str) -> bool {
        self.engine.cancel(post_id);
        self.engine.release(post_id);
        let doomed: Vec<String> = self
            .store
            .posts
            .iter()
            .filter(|post| post.id == post_id || post.parent_id.as_deref() == Some(post_id))
            .map(|post| post.id.clone())
            .collect();
        self.store.posts.retain(|post| !doomed.contains(&post.id));
        for id in &doomed {
            self.liked.remove(id);
            self.retweeted.remove(id);
        }
        let removed = !doomed.is_empty();
        if removed {
            self.store
                .emit_signal(SignalKind::Success, "Post deleted successfully".to_string());
        }
        removed
    }

    pub fn toggle_like(&mut self, post_id: &str) -> bool {
        if self.liked.remove(post_id) {
            return false;
        }
        self.liked.insert(post_id.to_string());
        self.notify_post_owner(post_id, NotificationKind::Like, "liked your post");
        true
    }

    pub fn toggle_retweet(&mut self, post_id: &str) -> bool {
        if self.retweeted.remove(post_id) {
            return false;
        }
        self.retweeted.insert(post_id.to_string());
        self.notify_post_owner(post_id, NotificationKind::Repost, "reposted your post");
        true
    }

    pub fn toggle_follow(&mut self, user_id: &str) -> bool {
        if self.followed.remove(user_id) {
            return false;
        }
        self.followed.insert(user_id.to_string());
        if self.should_notify(user_id) {
            self.store.append_notification(NewNotification {
                kind: NotificationKind::Follow,
                actor_id: self.local_user_id.clone(),
                related_post_id: None,
                message: "started following you".to_string(),
                timestamp: now_ms(),
            });
        }
        true
    }

    fn notify_post_owner(&mut self, post_id: &str, kind: NotificationKind, message: &str) {
        let owner = match self.post(post_id) {
            Some(post) => post.author_id.clone(),
            None => return,
        };
        if !self.should_notify(&owner) {
            return;
        }
        self.store.append_notification(NewNotification {
            kind,
            actor_id: self.local_user_id.clone(),
            related_post_id: Some(post_id.to_string()),
            message: message.to_string(),
            timestamp: now_ms(),
        });
    }

    /// No notifications for self-interactions or synthetic responders.
    fn should_notify(&self, target_owner: &str) -> bool {
        target_owner != self.local_user_id && !self.engine.is_synthetic_author(target_owner)
    }

    pub fn notifications(&self, filter: NotificationFilter) -> Vec<Notification> {
        self.store
            .notifications
            .iter()
            .filter(|notification| match filter {
                NotificationFilter::All => true,
                NotificationFilter::Mentions => notification.kind == NotificationKind::Mention,
            })
            .cloned()
            .collect()
    }

    pub fn unread_count(&self) -> usize {
        self.store
            .notifications
            .iter()
            .filter(|notification| !notification.read)
            .count()
    }

    pub fn mark_notification_read(&mut self, notification_id: &str) -> bool {
        match self
            .store
            .notifications
            .iter_mut()
            .find(|notification| notification.id == notification_id)
        {
            Some(notification) => {
                notification.read = true;
                true
            }
            None => false,
        }
    }

    pub fn mark_all_notifications_read(&mut self) -> usize {
        let mut changed = 0;
        for notification in self.store.notifications.iter_mut() {
            if !notification.read {
                notification.read = true;
                changed += 1;
            }
        }
        changed
    }

    pub fn toggle_engagement(&mut self) -> bool {
        let enabled = !self.engine.is_enabled();
        self.engine.set_enabled(enabled);
        let message = if enabled {
            "AI replies enabled"
        } else {
            "AI replies disabled"
        };
        self.store.emit_signal(SignalKind::Info, message.to_string());
        enabled
    }

    pub fn threads(&self) -> Vec<Thread> {
        let mut threads: Vec<Thread> = self
            .store
            .posts
            .iter()
            .filter(|post| post.is_top_level())
            .map(|post| {
                let mut replies: Vec<Post> = self
                    .store
                    .posts
                    .iter()
                    .filter(|reply| reply.parent_id.as_deref() == Some(post.id.as_str()))
                    .cloned()
                    .collect();
                replies.sort_by_key(|reply| reply.created_at);
                Thread {
                    post: post.clone(),
                    replies,
                }
            })
            .collect();
        threads.sort_by(|a, b| b.post.created_at.cmp(&a.post.created_at));
        threads
    }

    pub fn profile_stats(&self, user_id: &str) -> ProfileStats {
        let authored = self.store.posts.iter().filter(|post| post.author_id == user_id);
        let (posts, replies) = authored.fold((0, 0), |(posts, replies), post| {
            if post.is_top_level() {
                (posts + 1, replies)
            } else {
                (posts, replies + 1)
            }
        });
        let (likes, following) = if user_id == self.local_user_id {
            let likes = self
                .store
                .posts
                .iter()
                .filter(|post| self.liked.contains(&post.id))
                .count();
            (likes, self.followed.len())
        } else {
            (0, 0)
        };
        ProfileStats {
            posts,
            replies,
            likes,
            following,
        }
    }

    /// Case-insensitive substring search over posts (content and author
    /// names) and users (names and bio).
    pub fn search(&self, query: &str) -> SearchResults {
        let needle = query.trim().to_lowercase();
        let matches = |value: &str| value.to_lowercase().contains(&needle);

        let posts = self
            .store
            .posts
            .iter()
            .filter(|post| {
                matches(&post.content)
                    || self
                        .user(&post.author_id)
                        .map(|author| matches(&author.username) || matches(&author.name))
                        .unwrap_or(false)
            })
            .cloned()
            .collect();
        let users = self
            .users
            .iter()
            .filter(|user| matches(&user.username) || matches(&user.name) || matches(&user.bio))
            .cloned()
            .collect();

        SearchResults { posts, users }
    }

    pub fn who_to_follow(&self, limit: usize) -> Vec<User> {
        self.users
            .iter()
            .filter(|user| user.id != self.local_user_id)
            .take(limit)
            .cloned()
            .collect()
    }
}

