use crate::{Post, User};

pub const LOCAL_USER_ID: &str = "1";

pub fn users() -> Vec<User> {
    vec![
        user("1", "you", "You", "https://i.pravatar.cc/150?img=12", "Building things in public."),
        user("2", "maya_dev", "Maya Chen", "https://i.pravatar.cc/150?img=5", "Frontend engineer. Coffee first."),
        user("3", "leo_runs", "Leo Park", "https://i.pravatar.cc/150?img=8", "Marathons and morning light."),
        user("4", "ines_draws", "Ines Costa", "https://i.pravatar.cc/150?img=47", "Sketchbook always open."),
        user("5", "sam_writes", "Sam Okafor", "https://i.pravatar.cc/150?img=33", "Short stories, long walks."),
    ]
}

/// Initial timeline, newest first. Timestamps are relative to `now_ms`.
pub fn posts(now_ms: i64) -> Vec<Post> {
    const MINUTE: i64 = 60_000;
    vec![
        post("seed-5", now_ms - 5 * MINUTE, "Finally finished the mural downtown!", "4", None),
        post("seed-4", now_ms - 9 * MINUTE, "Congrats, it looks great", "5", Some("seed-3")),
        post("seed-3", now_ms - 30 * MINUTE, "Anyone else up for a 10k on Sunday?", "3", None),
        post("seed-2", now_ms - 2 * 60 * MINUTE, "Dark mode shipped to everyone today.", "2", None),
        post("seed-1", now_ms - 26 * 60 * MINUTE, "Hello threads, first post here.", LOCAL_USER_ID, None),
    ]
}

pub fn followed() -> Vec<String> {
    vec!["2".to_string(), "3".to_string()]
}

fn user(id: &str, username: &str, name: &str, avatar_ref: &str, bio: &str) -> User {
    User {
        id: id.to_string(),
        username: username.to_string(),
        name: name.to_string(),
        avatar_ref: avatar_ref.to_string(),
        bio: bio.to_string(),
    }
}

fn post(id: &str, created_at: i64, content: &str, author_id: &str, parent_id: Option<&str>) -> Post {
    Post {
        id: id.to_string(),
        created_at,
        content: content.to_string(),
        author_id: author_id.to_string(),
        parent_id: parent_id.map(str::to_string),
    }
}
