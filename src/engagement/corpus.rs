use std::collections::HashMap;

use crate::engagement::Category;
use crate::rng::RandomSource;

#[derive(Debug, Clone)]
pub struct ReplyCorpus {
    replies: HashMap<Category, Vec<String>>,
}

impl ReplyCorpus {
    pub fn new(replies: HashMap<Category, Vec<String>>) -> Result<Self, String> {
        for category in Category::ALL {
            match replies.get(&category) {
                Some(list) if !list.is_empty() => {}
                Some(_) => return Err(format!("reply corpus has no candidates for {}", category.label())),
                None => return Err(format!("reply corpus is missing category {}", category.label())),
            }
        }
        Ok(Self { replies })
    }

    pub fn default_catalog() -> Self {
        let mut replies = HashMap::new();
        replies.insert(
            Category::Affirming,
            to_strings(&[
                "This is amazing! 🔥",
                "Love this! Keep it up! 💯",
                "So inspiring! ✨",
                "Absolutely brilliant! 🌟",
                "This made my day! 😊",
            ]),
        );
        replies.insert(
            Category::Inquisitive,
            to_strings(&[
                "Tell us more about this! 🤔",
                "How did you come up with this?",
                "What's your secret? 👀",
                "Can you share more details?",
                "This is interesting! What's next?",
            ]),
        );
        replies.insert(
            Category::Supportive,
            to_strings(&[
                "You've got this! 💪",
                "Keep going strong! 🚀",
                "Rooting for you! 🙌",
                "Amazing progress! 👏",
                "So proud of you! ❤️",
            ]),
        );
        replies.insert(
            Category::Technical,
            to_strings(&[
                "What stack did you use? 💻",
                "Open source? 👀",
                "Performance looks great! ⚡",
                "Clean code vibes! 🧹",
                "Deploy it! 🚀",
            ]),
        );
        Self { replies }
    }

    pub fn candidates(&self, category: Category) -> &[String] {
        self.replies
            .get(&category)
            .map(|list| list.as_slice())
            .unwrap_or(&[])
    }

    pub fn sample(&self, category: Category, rng: &mut dyn RandomSource) -> &str {
        let candidates = self.candidates(category);
        let index = rng.next_index(candidates.len());
        candidates.get(index).map(|text| text.as_str()).unwrap_or("")
    }
}

impl Default for ReplyCorpus {
    fn default() -> Self {
        Self::default_catalog()
    }
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

