use threads_sim::feed::seed;
use threads_sim::{
    EngineConfig, FeedState, NotificationFilter, ProfileStats, SequenceRandom, SignalKind,
};

fn feed(draws: Vec<usize>) -> FeedState {
    FeedState::from_config(&EngineConfig::default(), Box::new(SequenceRandom::new(draws)))
}

#[test]
fn responders_join_the_user_list() {
    let state = feed(vec![0]);
    assert!(state.user("ai-1").is_some());
    assert_eq!(state.users().len(), seed::users().len() + 4);
}

#[test]
fn add_post_validates_content() {
    let mut state = feed(vec![0]);
    assert!(state.add_post("   ", None).is_err());
    assert!(state.add_post(&"x".repeat(281), None).is_err());
    assert!(state.add_post("hi", Some("missing")).is_err());
    let (post, _) = state.add_post(&"x".repeat(280), None).unwrap();
    assert_eq!(state.posts()[0].id, post.id);
}

#[test]
fn delete_removes_direct_replies_and_releases_engagement() {
    let mut state = feed(vec![0]);
    let (post, scheduled) = state.add_post("a quiet evening", None).unwrap();
    assert!(scheduled.is_some());
    state.add_post("replying to myself", Some(post.id.as_str())).unwrap();

    assert!(state.delete_post(&post.id));
    assert!(state
        .posts()
        .iter()
        .all(|p| p.id != post.id && p.parent_id.as_deref() != Some(post.id.as_str())));
    assert_eq!(state.engagement_state(&post.id), None);
    assert_eq!(state.fire_engagement(&post.id), 0);
    assert_eq!(state.signals()[0].kind, SignalKind::Success);
    assert!(!state.delete_post(&post.id));
}

#[test]
fn deleted_posts_leave_no_engagement_tracking_behind() {
    let mut state = feed(vec![0]);
    let mut ids = Vec::new();
    for n in 0..20 {
        let (post, _) = state.add_post(&format!("note {}", n), None).unwrap();
        if n % 2 == 0 {
            assert_eq!(state.fire_engagement(&post.id), 1);
        }
        ids.push(post.id);
    }
    for id in &ids {
        assert!(state.delete_post(id));
    }
    assert!(ids.iter().all(|id| state.engagement_state(id).is_none()));
}

#[test]
fn liking_twice_unlikes_without_second_notification() {
    let mut state = feed(vec![0]);
    assert!(state.toggle_like("seed-2"));
    assert!(!state.toggle_like("seed-2"));
    assert!(state.toggle_like("seed-2"));
    assert_eq!(state.notifications(NotificationFilter::All).len(), 2);
    assert!(state.is_liked("seed-2"));
}

#[test]
fn mark_read_transitions() {
    let mut state = feed(vec![0]);
    state.toggle_like("seed-2");
    state.toggle_retweet("seed-3");
    state.toggle_follow("5");
    assert_eq!(state.unread_count(), 3);

    let first = state.notifications(NotificationFilter::All)[0].id.clone();
    assert!(state.mark_notification_read(&first));
    assert!(!state.mark_notification_read("nope"));
    assert_eq!(state.unread_count(), 2);
    assert_eq!(state.mark_all_notifications_read(), 2);
    assert_eq!(state.unread_count(), 0);
    assert!(state.notifications(NotificationFilter::Mentions).is_empty());
}

#[test]
fn threads_are_newest_first_with_replies() {
    let state = feed(vec![0]);
    let threads = state.threads();
    assert_eq!(threads[0].post.id, "seed-5");
    let run = threads.iter().find(|t| t.post.id == "seed-3").unwrap();
    assert_eq!(run.replies.len(), 1);
    assert!(threads.iter().all(|t| t.post.is_top_level()));
}

#[test]
fn profile_stats_count_posts_replies_likes_following() {
    let mut state = feed(vec![0]);
    state.toggle_like("seed-3");
    state.add_post("nice run", Some("seed-3")).unwrap();
    let stats = state.profile_stats("1");
    assert_eq!(
        stats,
        ProfileStats {
            posts: 1,
            replies: 1,
            likes: 1,
            following: 2,
        }
    );
}

#[test]
fn profile_likes_only_count_posts_that_still_exist() {
    let mut state = feed(vec![0]);
    assert!(state.toggle_like("seed-2"));
    assert!(state.toggle_like("does-not-exist"));
    assert_eq!(state.profile_stats("1").likes, 1);

    assert!(state.delete_post("seed-2"));
    assert!(!state.is_liked("seed-2"));
    assert_eq!(state.profile_stats("1").likes, 0);
}

#[test]
fn deleting_a_thread_drops_likes_and_reposts_on_its_replies() {
    let mut state = feed(vec![0]);
    assert!(state.toggle_like("seed-4"));
    assert!(state.toggle_retweet("seed-4"));
    assert!(state.delete_post("seed-3"));
    assert!(!state.is_liked("seed-4"));
    assert!(!state.is_retweeted("seed-4"));
}

#[test]
fn search_matches_content_authors_and_bios() {
    let state = feed(vec![0]);
    let results = state.search("MURAL");
    assert_eq!(results.posts.len(), 1);
    let results = state.search("maya");
    assert!(results.posts.iter().any(|p| p.id == "seed-2"));
    assert!(results.users.iter().any(|u| u.id == "2"));
    let results = state.search("cheer you on");
    assert_eq!(results.users.len(), 1);
    assert_eq!(results.users[0].id, "ai-3");
}

#[test]
fn who_to_follow_skips_local_user() {
    let state = feed(vec![0]);
    let suggestions = state.who_to_follow(3);
    assert_eq!(suggestions.len(), 3);
    assert!(suggestions.iter().all(|u| u.id != "1"));
}

#[test]
fn toggle_engagement_flips_and_signals() {
    let mut state = feed(vec![0]);
    assert!(!state.toggle_engagement());
    let (_, scheduled) = state.add_post("offline for a bit", None).unwrap();
    assert!(scheduled.is_none());
    assert_eq!(state.signals()[0].message, "AI replies disabled");
    assert!(state.toggle_engagement());
}
