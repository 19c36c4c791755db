use serde::{Deserialize, Serialize};

use crate::User;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponderIdentity {
    pub id: String,
    pub username: String,
    pub display_name: String,
    pub avatar_ref: String,
    pub short_bio: String,
}

impl ResponderIdentity {
    pub fn new(id: &str, username: &str, display_name: &str, avatar_ref: &str, short_bio: &str) -> Self {
        Self {
            id: id.to_string(),
            username: username.to_string(),
            display_name: display_name.to_string(),
            avatar_ref: avatar_ref.to_string(),
            short_bio: short_bio.to_string(),
        }
    }

    pub fn to_user(&self) -> User {
        User {
            id: self.id.clone(),
            username: self.username.clone(),
            name: self.display_name.clone(),
            avatar_ref: self.avatar_ref.clone(),
            bio: self.short_bio.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResponderRegistry {
    identities: Vec<ResponderIdentity>,
}

impl ResponderRegistry {
    pub fn new(identities: Vec<ResponderIdentity>) -> Self {
        Self { identities }
    }

    pub fn default_catalog() -> Self {
        Self::new(vec![
            ResponderIdentity::new(
                "ai-1",
                "techie_bot",
                "Tech Explorer",
                "https://i.pravatar.cc/150?img=68",
                "Always excited about new tech! 🚀",
            ),
            ResponderIdentity::new(
                "ai-2",
                "creative_soul",
                "Creative Mind",
                "https://i.pravatar.cc/150?img=25",
                "Art and creativity enthusiast ✨",
            ),
            ResponderIdentity::new(
                "ai-3",
                "support_buddy",
                "Motivation Bot",
                "https://i.pravatar.cc/150?img=43",
                "Here to cheer you on! 💪",
            ),
            ResponderIdentity::new(
                "ai-4",
                "curious_cat",
                "Question Master",
                "https://i.pravatar.cc/150?img=17",
                "Love asking thoughtful questions 🤔",
            ),
        ])
    }

    pub fn identities(&self) -> &[ResponderIdentity] {
        &self.identities
    }

    pub fn len(&self) -> usize {
        self.identities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.identities.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.identities.iter().any(|identity| identity.id == id)
    }
}

impl Default for ResponderRegistry {
    fn default() -> Self {
        Self::default_catalog()
    }
}

