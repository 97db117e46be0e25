use crate::stats::{FeedbackItem, Sentiment, StatsSnapshot};

#[derive(Clone, Debug, PartialEq)]
pub struct FeedbackPanel {
    pub items: Vec<FeedbackItem>,
}

impl FeedbackPanel {
    pub fn build(snapshot: Option<&StatsSnapshot>) -> Self {
        Self {
            items: snapshot.map(StatsSnapshot::feedback_items).unwrap_or_default(),
        }
    }

    /// Badge count in the panel header.
    pub fn count(&self) -> usize {
        self.items.len()
    }

    /// Skeleton rows are shown while there is nothing to say.
    pub fn is_placeholder(&self) -> bool {
        self.items.is_empty()
    }
}

/// Left border color of a feedback card.
pub fn accent_color(sentiment: Sentiment) -> &'static str {
    match sentiment {
        Sentiment::Success => "#10B981",
        Sentiment::Warning => "#F59E0B",
        Sentiment::Error => "#EF4444",
        Sentiment::Neutral => "#3B82F6",
    }
}
