use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::analysis::ChartPayload;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub sender: Sender,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chart: Option<ChartPayload>,
    pub sent_at: DateTime<Utc>,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Sender::User, text.into())
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self::new(Sender::Bot, text.into())
    }

    fn new(sender: Sender, text: String) -> Self {
        Self {
            sender,
            text,
            chart: None,
            sent_at: Utc::now(),
        }
    }

    pub fn with_chart(mut self, chart: ChartPayload) -> Self {
        self.chart = Some(chart);
        self
    }
}
