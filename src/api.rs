use serde::{Deserialize, Serialize};
use threads_sim::{FeedState, Notification, NotificationFilter, Post, ProfileStats, Thread, User};

#[derive(Debug, Deserialize)]
pub struct ApiPostRequest {
    pub content: Option<String>,
    pub parent_id: Option<String>,
}

impl ApiPostRequest {
    pub fn into_parts(self) -> Result<(String, Option<String>), String> {
        let content = self.content.unwrap_or_default().trim().to_string();
        if content.is_empty() {
            return Err("content is required".to_string());
        }
        let parent_id = self.parent_id.filter(|value| !value.trim().is_empty());
        Ok((content, parent_id))
    }
}

#[derive(Debug, Deserialize)]
pub struct NotificationQuery {
    pub filter: Option<String>,
}

impl NotificationQuery {
    pub fn filter(&self) -> Result<NotificationFilter, String> {
        match self.filter.as_deref().map(|value| value.to_lowercase()) {
            None => Ok(NotificationFilter::All),
            Some(value) => match value.as_str() {
                "all" => Ok(NotificationFilter::All),
                "mentions" | "mention" => Ok(NotificationFilter::Mentions),
                _ => Err(format!("invalid notification filter: {}", value)),
            },
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ApiThread {
    pub post: ApiPost,
    pub replies: Vec<ApiPost>,
}

/// Post joined with its author and the local user's interaction flags.
#[derive(Debug, Serialize)]
pub struct ApiPost {
    #[serde(flatten)]
    pub post: Post,
    pub author: Option<User>,
    pub liked: bool,
    pub retweeted: bool,
}

impl ApiPost {
    pub fn from_post(state: &FeedState, post: Post) -> Self {
        Self {
            author: state.user(&post.author_id).cloned(),
            liked: state.is_liked(&post.id),
            retweeted: state.is_retweeted(&post.id),
            post,
        }
    }
}

impl ApiThread {
    pub fn from_thread(state: &FeedState, thread: Thread) -> Self {
        Self {
            post: ApiPost::from_post(state, thread.post),
            replies: thread
                .replies
                .into_iter()
                .map(|reply| ApiPost::from_post(state, reply))
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiFeedResponse {
    pub threads: Vec<ApiThread>,
    pub engagement_enabled: bool,
    pub who_to_follow: Vec<User>,
}

#[derive(Debug, Serialize)]
pub struct ApiNotificationsResponse {
    pub unread: usize,
    pub notifications: Vec<Notification>,
}

#[derive(Debug, Serialize)]
pub struct ApiProfileResponse {
    pub user: User,
    pub stats: ProfileStats,
    pub following: bool,
}

#[derive(Debug, Serialize)]
pub struct ApiToggleResponse {
    pub id: String,
    pub active: bool,
}
