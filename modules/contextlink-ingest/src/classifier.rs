use ai_client::Claude;
use anyhow::Result;
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Outcome of classifying one social post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Classification {
    /// One of: housing, jobs, marketplace, event, help_request, question, news, spam, other
    pub category: String,
    /// Whether the post is relevant community information worth surfacing
    pub is_relevant: bool,
    /// Confidence in the category, from 0.0 to 1.0
    pub confidence: f32,
    /// One-sentence neutral summary of the post
    pub summary: String,
}

/// External text classifier. Failures are opaque upstream errors.
#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(&self, text: &str) -> Result<Classification>;
}

const SYSTEM_PROMPT: &str = "You classify posts from local community social media groups. \
    Pick the single best category: housing (rentals, roommates, sublets), jobs (hiring or \
    seeking work), marketplace (buying, selling, giving away items), event (a dated gathering), \
    help_request (someone asking neighbors for concrete help), question (general questions or \
    recommendations), news (local news or announcements), spam (scams, ads, off-topic promotion), \
    other. Mark is_relevant false for spam and for posts with no useful community information.";

/// Classifier backed by Claude structured extraction.
pub struct ClaudeClassifier {
    claude: Claude,
}

impl ClaudeClassifier {
    pub fn new(claude: Claude) -> Self {
        Self { claude }
    }
}

#[async_trait]
impl Classifier for ClaudeClassifier {
    async fn classify(&self, text: &str) -> Result<Classification> {
        let user = format!("Post:\n{text}");
        self.claude.extract(SYSTEM_PROMPT, user).await
    }
}
