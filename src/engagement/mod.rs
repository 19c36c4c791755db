pub mod classifier;
pub mod corpus;
pub mod orchestrator;
pub mod responders;
pub mod selector;

pub use classifier::{Category, ClassifierRule, ContentClassifier};
pub use corpus::ReplyCorpus;
pub use orchestrator::{EngagementOrchestrator, EngagementSink, EngagementState, ScheduledEngagement};
pub use responders::{ResponderIdentity, ResponderRegistry};
pub use selector::{ReplySelector, SelectedReply};
