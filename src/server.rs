use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse,
    },
    routing::{delete, get, post},
    Json, Router,
};
use serde::Serialize;
use std::{net::SocketAddr, time::Duration};
use tokio_stream::{wrappers::BroadcastStream, StreamExt};
use tower_http::services::{ServeDir, ServeFile};
use tracing::info;

use crate::api::{
    ApiFeedResponse, ApiNotificationsResponse, ApiPost, ApiPostRequest, ApiProfileResponse,
    ApiThread, ApiToggleResponse, NotificationQuery, SearchQuery,
};
use threads_sim::{EngineConfig, Feed, FeedState, SearchResults};

#[derive(Clone)]
struct AppState {
    feed: Feed,
}

#[derive(Serialize)]
struct ReadAllResponse {
    changed: usize,
}

#[derive(Serialize)]
struct EngagementToggleResponse {
    enabled: bool,
}

pub async fn serve(args: crate::ServeArgs, config: EngineConfig) -> Result<(), String> {
    let state = AppState {
        feed: Feed::new(FeedState::with_default_rng(&config)),
    };

    let web_root = args.web_root;
    let index_path = format!("{}/index.html", web_root.trim_end_matches('/'));
    let static_service = ServeDir::new(web_root).not_found_service(ServeFile::new(index_path));

    let app = Router::new()
        .route("/api/health", get(health))
        .route("/api/feed", get(feed_handler))
        .route("/api/posts", post(create_post_handler))
        .route("/api/posts/:id", delete(delete_post_handler))
        .route("/api/posts/:id/like", post(like_handler))
        .route("/api/posts/:id/retweet", post(retweet_handler))
        .route("/api/users/:id/follow", post(follow_handler))
        .route("/api/notifications", get(notifications_handler))
        .route("/api/notifications/read-all", post(read_all_handler))
        .route("/api/notifications/:id/read", post(read_handler))
        .route("/api/engagement/toggle", post(engagement_toggle_handler))
        .route("/api/search", get(search_handler))
        .route("/api/me", get(me_handler))
        .route("/api/profile/:id", get(profile_handler))
        .route("/api/signals/stream", get(signals_stream_handler))
        .nest_service("/", static_service)
        .with_state(state);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .map_err(|err| format!("invalid bind address: {}", err))?;

    info!(%addr, "serving feed api");
    axum::serve(tokio::net::TcpListener::bind(addr).await.map_err(|err| {
        format!("failed to bind server: {}", err)
    })?, app)
    .await
    .map_err(|err| format!("server error: {}", err))?;

    Ok(())
}

async fn health() -> impl IntoResponse {
    StatusCode::OK
}

async fn feed_handler(State(state): State<AppState>) -> Json<ApiFeedResponse> {
    let guard = state.feed.lock().await;
    let threads = guard
        .threads()
        .into_iter()
        .map(|thread| ApiThread::from_thread(&guard, thread))
        .collect();
    Json(ApiFeedResponse {
        threads,
        engagement_enabled: guard.engagement_enabled(),
        who_to_follow: guard.who_to_follow(3),
    })
}

async fn create_post_handler(
    State(state): State<AppState>,
    Json(request): Json<ApiPostRequest>,
) -> Result<(StatusCode, Json<ApiPost>), (StatusCode, String)> {
    let (content, parent_id) = request
        .into_parts()
        .map_err(|err| (StatusCode::BAD_REQUEST, err))?;
    let post = state
        .feed
        .add_post(&content, parent_id.as_deref())
        .await
        .map_err(|err| (StatusCode::BAD_REQUEST, err))?;
    let guard = state.feed.lock().await;
    Ok((StatusCode::CREATED, Json(ApiPost::from_post(&guard, post))))
}

async fn delete_post_handler(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
) -> StatusCode {
    if state.feed.delete_post(&post_id).await {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

async fn like_handler(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
) -> Json<ApiToggleResponse> {
    let active = state.feed.lock().await.toggle_like(&post_id);
    Json(ApiToggleResponse { id: post_id, active })
}

async fn retweet_handler(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
) -> Json<ApiToggleResponse> {
    let active = state.feed.lock().await.toggle_retweet(&post_id);
    Json(ApiToggleResponse { id: post_id, active })
}

async fn follow_handler(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<ApiToggleResponse>, (StatusCode, String)> {
    let mut guard = state.feed.lock().await;
    if guard.user(&user_id).is_none() {
        return Err((StatusCode::NOT_FOUND, format!("user not found: {}", user_id)));
    }
    let active = guard.toggle_follow(&user_id);
    Ok(Json(ApiToggleResponse { id: user_id, active }))
}

async fn notifications_handler(
    State(state): State<AppState>,
    Query(query): Query<NotificationQuery>,
) -> Result<Json<ApiNotificationsResponse>, (StatusCode, String)> {
    let filter = query.filter().map_err(|err| (StatusCode::BAD_REQUEST, err))?;
    let guard = state.feed.lock().await;
    Ok(Json(ApiNotificationsResponse {
        unread: guard.unread_count(),
        notifications: guard.notifications(filter),
    }))
}

async fn read_handler(
    State(state): State<AppState>,
    Path(notification_id): Path<String>,
) -> StatusCode {
    if state.feed.lock().await.mark_notification_read(&notification_id) {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

async fn read_all_handler(State(state): State<AppState>) -> Json<ReadAllResponse> {
    let changed = state.feed.lock().await.mark_all_notifications_read();
    Json(ReadAllResponse { changed })
}

async fn engagement_toggle_handler(State(state): State<AppState>) -> Json<EngagementToggleResponse> {
    let enabled = state.feed.lock().await.toggle_engagement();
    Json(EngagementToggleResponse { enabled })
}

async fn search_handler(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Json<SearchResults> {
    let needle = query.q.unwrap_or_default();
    Json(state.feed.lock().await.search(&needle))
}

async fn me_handler(
    State(state): State<AppState>,
) -> Result<Json<ApiProfileResponse>, (StatusCode, String)> {
    let guard = state.feed.lock().await;
    let user_id = guard.local_user_id().to_string();
    profile_response(&guard, &user_id).map(Json)
}

async fn profile_handler(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<ApiProfileResponse>, (StatusCode, String)> {
    let guard = state.feed.lock().await;
    profile_response(&guard, &user_id).map(Json)
}

fn profile_response(
    state: &FeedState,
    user_id: &str,
) -> Result<ApiProfileResponse, (StatusCode, String)> {
    let user = state
        .user(user_id)
        .cloned()
        .ok_or_else(|| (StatusCode::NOT_FOUND, format!("user not found: {}", user_id)))?;
    Ok(ApiProfileResponse {
        stats: state.profile_stats(user_id),
        following: state.is_following(user_id),
        user,
    })
}

async fn signals_stream_handler(
    State(state): State<AppState>,
) -> Sse<impl tokio_stream::Stream<Item = Result<Event, std::convert::Infallible>>> {
    let receiver = state.feed.subscribe_signals().await;
    let stream = BroadcastStream::new(receiver).filter_map(|signal| match signal {
        Ok(signal) => {
            let data = serde_json::to_string(&signal).unwrap_or_default();
            Some(Ok(Event::default().data(data)))
        }
        Err(_) => None,
    });

    Sse::new(stream).keep_alive(KeepAlive::new().interval(Duration::from_secs(8)))
}
