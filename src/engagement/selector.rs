use crate::engagement::{Category, ContentClassifier, ReplyCorpus, ResponderIdentity, ResponderRegistry};
use crate::rng::{shuffle, RandomSource};
use crate::Post;

#[derive(Debug, Clone, PartialEq)]
pub struct SelectedReply {
    pub responder: ResponderIdentity,
    pub text: String,
    pub category: Category,
}

#[derive(Debug, Clone)]
pub struct ReplySelector {
    registry: ResponderRegistry,
    corpus: ReplyCorpus,
    classifier: ContentClassifier,
    min_replies: usize,
    max_replies: usize,
}

impl ReplySelector {
    pub fn new(
        registry: ResponderRegistry,
        corpus: ReplyCorpus,
        classifier: ContentClassifier,
        min_replies: usize,
        max_replies: usize,
    ) -> Self {
        let min_replies = min_replies.max(1);
        Self {
            registry,
            corpus,
            classifier,
            min_replies,
            max_replies: max_replies.max(min_replies),
        }
    }

    pub fn registry(&self) -> &ResponderRegistry {
        &self.registry
    }

    pub fn corpus(&self) -> &ReplyCorpus {
        &self.corpus
    }

    pub fn is_eligible(post: &Post, local_user_id: &str) -> bool {
        post.is_top_level() && post.author_id == local_user_id
    }

    /// Draws the count, then the shuffled responders, then one text per
    /// responder. The count saturates at the registry size.
    pub fn select_replies(
        &self,
        post: &Post,
        local_user_id: &str,
        rng: &mut dyn RandomSource,
    ) -> Vec<SelectedReply> {
        if !Self::is_eligible(post, local_user_id) {
            return Vec::new();
        }

        let span = self.max_replies - self.min_replies + 1;
        let count = self.min_replies + rng.next_index(span);

        let mut responders = self.registry.identities().to_vec();
        shuffle(&mut responders, rng);
        responders.truncate(count.min(self.registry.len()));

        let category = self.classifier.classify(&post.content);
        responders
            .into_iter()
            .map(|responder| SelectedReply {
                text: self.corpus.sample(category, rng).to_string(),
                responder,
                category,
            })
            .collect()
    }
}

impl Default for ReplySelector {
    fn default() -> Self {
        Self::new(
            ResponderRegistry::default_catalog(),
            ReplyCorpus::default_catalog(),
            ContentClassifier::default(),
            1,
            3,
        )
    }
}

