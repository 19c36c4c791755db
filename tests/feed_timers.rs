use std::time::Duration;

use threads_sim::{
    EngagementState, EngineConfig, Feed, FeedState, NotificationFilter, SignalKind, StdRandom,
};

fn feed(seed: u64) -> Feed {
    Feed::new(FeedState::from_config(
        &EngineConfig::default(),
        Box::new(StdRandom::seeded(seed)),
    ))
}

async fn replies_to(feed: &Feed, post_id: &str) -> usize {
    feed.lock()
        .await
        .posts()
        .iter()
        .filter(|post| post.parent_id.as_deref() == Some(post_id))
        .count()
}

#[tokio::test(start_paused = true)]
async fn engagement_lands_after_the_delay() {
    let feed = feed(3);
    let post = feed.add_post("weekend plans", None).await.unwrap();

    assert_eq!(replies_to(&feed, &post.id).await, 0);
    assert_eq!(feed.pending_engagements().await, 1);
    assert_eq!(
        feed.lock().await.engagement_state(&post.id),
        Some(EngagementState::PendingEngagement)
    );

    tokio::time::sleep(Duration::from_millis(199)).await;
    assert_eq!(replies_to(&feed, &post.id).await, 0);

    tokio::time::sleep(Duration::from_millis(2)).await;
    let count = replies_to(&feed, &post.id).await;
    assert!((1..=3).contains(&count));
    assert_eq!(feed.pending_engagements().await, 0);

    let state = feed.lock().await;
    assert_eq!(
        state.engagement_state(&post.id),
        Some(EngagementState::EngagementMaterialized)
    );
    assert_eq!(state.notifications(NotificationFilter::All).len(), count);
}

#[tokio::test(start_paused = true)]
async fn engagement_fires_once_per_post() {
    let feed = feed(8);
    let post = feed.add_post("slow morning", None).await.unwrap();

    tokio::time::sleep(Duration::from_millis(250)).await;
    let first = replies_to(&feed, &post.id).await;
    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(replies_to(&feed, &post.id).await, first);

    let state = feed.lock().await;
    let ai_signals = state
        .signals()
        .iter()
        .filter(|signal| signal.kind == SignalKind::Ai)
        .count();
    assert_eq!(ai_signals, 1);
}

#[tokio::test(start_paused = true)]
async fn deleting_before_the_timer_cancels_engagement() {
    let feed = feed(4);
    let post = feed.add_post("maybe not", None).await.unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;

    assert!(feed.delete_post(&post.id).await);
    assert_eq!(feed.pending_engagements().await, 0);

    tokio::time::sleep(Duration::from_millis(500)).await;
    let mut state = feed.lock().await;
    assert_eq!(state.engagement_state(&post.id), None);
    assert_eq!(state.fire_engagement(&post.id), 0);
    assert!(state
        .posts()
        .iter()
        .all(|p| p.parent_id.as_deref() != Some(post.id.as_str())));
    assert!(state.notifications(NotificationFilter::All).is_empty());
    assert!(state.signals().iter().all(|signal| signal.kind != SignalKind::Ai));
}

#[tokio::test(start_paused = true)]
async fn deleting_after_materialization_removes_the_replies() {
    let feed = feed(6);
    let post = feed.add_post("short trip", None).await.unwrap();
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert!(replies_to(&feed, &post.id).await > 0);

    assert!(feed.delete_post(&post.id).await);
    assert_eq!(replies_to(&feed, &post.id).await, 0);
    let mut state = feed.lock().await;
    assert_eq!(state.engagement_state(&post.id), None);
    assert_eq!(state.fire_engagement(&post.id), 0);
}

#[tokio::test(start_paused = true)]
async fn replies_and_disabled_engagement_schedule_nothing() {
    let feed = feed(2);
    feed.add_post("see you there", Some("seed-3")).await.unwrap();
    assert_eq!(feed.pending_engagements().await, 0);

    feed.lock().await.toggle_engagement();
    let post = feed.add_post("quiet mode", None).await.unwrap();
    assert_eq!(feed.pending_engagements().await, 0);
    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(replies_to(&feed, &post.id).await, 0);
}

#[tokio::test(start_paused = true)]
async fn subscribers_receive_the_engagement_signal() {
    let feed = feed(12);
    let mut signals = feed.subscribe_signals().await;
    feed.add_post("new sketch", None).await.unwrap();

    tokio::time::sleep(Duration::from_millis(250)).await;
    let signal = signals.try_recv().unwrap();
    assert_eq!(signal.kind, SignalKind::Ai);
    assert!(signal.message.contains("replied to your post"));
}
