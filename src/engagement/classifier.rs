use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Technical,
    Inquisitive,
    Supportive,
    Affirming,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Technical,
        Category::Inquisitive,
        Category::Supportive,
        Category::Affirming,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::Technical => "technical",
            Category::Inquisitive => "inquisitive",
            Category::Supportive => "supportive",
            Category::Affirming => "affirming",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClassifierRule {
    pub needles: Vec<String>,
    pub category: Category,
}

impl ClassifierRule {
    pub fn new(needles: &[&str], category: Category) -> Self {
        Self {
            needles: needles.iter().map(|needle| needle.to_lowercase()).collect(),
            category,
        }
    }

    fn matches(&self, lowercase: &str) -> bool {
        self.needles.iter().any(|needle| lowercase.contains(needle.as_str()))
    }
}

/// Ordered keyword rules; the first matching rule decides the category.
#[derive(Debug, Clone)]
pub struct ContentClassifier {
    rules: Vec<ClassifierRule>,
    fallback: Category,
}

impl ContentClassifier {
    pub fn new(rules: Vec<ClassifierRule>, fallback: Category) -> Self {
        Self { rules, fallback }
    }

    pub fn rules(&self) -> &[ClassifierRule] {
        &self.rules
    }

    pub fn fallback(&self) -> Category {
        self.fallback
    }

    pub fn classify(&self, text: &str) -> Category {
        let lowercase = text.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.matches(&lowercase))
            .map(|rule| rule.category)
            .unwrap_or(self.fallback)
    }
}

impl Default for ContentClassifier {
    fn default() -> Self {
        Self::new(
            vec![
                ClassifierRule::new(&["tech", "code", "app"], Category::Technical),
                ClassifierRule::new(&["?"], Category::Inquisitive),
                ClassifierRule::new(&["help", "struggle"], Category::Supportive),
            ],
            Category::Affirming,
        )
    }
}

