use tracing::{debug, instrument};

use super::message::ChatMessage;
use super::operations::RenderSettings;
use super::session::{ChatSession, TurnPlan};
use crate::fixtures::SharedFixtureSource;

type CloseCallback = Box<dyn FnMut() + Send>;

/// The embeddable chat widget: owns one session and the fixture source it reads from.
pub struct ChatController {
    session: ChatSession,
    source: SharedFixtureSource,
    on_close: Option<CloseCallback>,
}

impl ChatController {
    pub fn new(source: SharedFixtureSource, settings: RenderSettings) -> Self {
        Self {
            session: ChatSession::new(settings),
            source,
            on_close: None,
        }
    }

    pub fn with_on_close<F>(mut self, callback: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        self.on_close = Some(Box::new(callback));
        self
    }

    pub fn open(&mut self) {
        self.session.open();
    }

    pub fn close(&mut self) {
        if !self.session.is_open() {
            return;
        }
        self.session.close();
        if let Some(callback) = self.on_close.as_mut() {
            callback();
        }
    }

    /// Follows the host's open flag.
    pub fn set_open(&mut self, open: bool) {
        match (open, self.session.is_open()) {
            (true, false) => self.open(),
            (false, true) => self.close(),
            _ => {}
        }
    }

    pub fn is_open(&self) -> bool {
        self.session.is_open()
    }

    /// Transcript to display, or nothing while the widget is closed.
    pub fn view(&self) -> Option<&[ChatMessage]> {
        self.session.is_open().then(|| self.session.messages())
    }

    #[allow(dead_code)]
    pub fn session(&self) -> &ChatSession {
        &self.session
    }

    /// Runs one user turn to completion and returns the bot reply it appended.
    #[instrument(skip(self))]
    pub async fn send(&mut self, input: &str) -> Option<ChatMessage> {
        match self.session.begin_turn(input) {
            TurnPlan::Ignored => None,
            TurnPlan::Replied => self.session.messages().last().cloned(),
            TurnPlan::Fetch(pending) => {
                debug!(
                    dataset = pending.dataset.key,
                    operation = ?pending.operation,
                    group_field = pending.operation.group_field().unwrap_or("-"),
                    "Fetching dataset fixture"
                );
                let fetched = self.source.fetch(pending.dataset.path).await;
                self.session.finish_turn(pending, fetched).cloned()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::ChartKind;
    use crate::fixtures::memory::MemoryFixtureSource;
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn employees(n: usize) -> Value {
        let titles = ["Engineer", "Analyst", "Manager"];
        Value::Array(
            (0..n)
                .map(|i| {
                    json!({
                        "EmpId": i + 1,
                        "FirstName": format!("First{i}"),
                        "LastName": format!("Last{i}"),
                        "Title": titles[i % titles.len()],
                    })
                })
                .collect(),
        )
    }

    fn controller_with(source: MemoryFixtureSource) -> (ChatController, Arc<MemoryFixtureSource>) {
        let source = Arc::new(source);
        let mut controller = ChatController::new(source.clone(), RenderSettings::default());
        controller.open();
        (controller, source)
    }

    #[tokio::test]
    async fn option_two_counts_records() {
        let (mut chat, _) = controller_with(
            MemoryFixtureSource::default().with("/mock/data/HR_Employees.json", employees(12)),
        );
        chat.send("HR Employees").await.expect("menu");
        let reply = chat.send("2").await.expect("count");
        assert!(reply.text.contains("12"));
        assert_eq!(reply.text, "HR Employees has 12 records.");
    }

    #[tokio::test]
    async fn option_three_previews_three_rows() {
        let (mut chat, _) = controller_with(
            MemoryFixtureSource::default().with("/mock/data/HR_Employees.json", employees(10)),
        );
        chat.send("staff").await;
        let reply = chat.send("3").await.expect("preview");
        let rows = reply
            .text
            .lines()
            .filter(|line| line.starts_with('|') && !line.starts_with("| ---"))
            .count();
        assert_eq!(rows, 4);
    }

    #[tokio::test]
    async fn option_five_picks_chart_kind_by_group_count() {
        let mut rows: Vec<Value> = (0..8)
            .map(|i| json!({ "Name": format!("user{i}"), "Region": format!("R{i}"), "Active": "Yes" }))
            .collect();
        rows.push(json!({ "Name": "extra", "Region": "R0", "Active": "No" }));

        let (mut chat, _) = controller_with(
            MemoryFixtureSource::default()
                .with("/mock/data/Bloomberg_User_ReportTable.json", Value::Array(rows)),
        );
        chat.send("bloomberg").await;
        let by_name = chat.send("5").await.expect("chart");
        let chart = by_name.chart.expect("payload");
        assert_eq!(chart.kind(), ChartKind::Bar);
        assert_eq!(chart.labels().len(), chart.values().len());

        let by_active = chat.send("active").await.expect("regroup");
        let chart = by_active.chart.expect("payload");
        assert_eq!(chart.kind(), ChartKind::Pie);
        assert_eq!(chart.labels(), ["Yes", "No"]);
        assert_eq!(chart.values(), [8.0, 1.0]);
        assert!(by_active.text.contains("| Active | Count |"));
    }

    #[tokio::test]
    async fn fetch_failures_apologize_and_keep_session() {
        let (mut chat, source) = controller_with(MemoryFixtureSource::default());
        chat.send("Finance Budget").await;
        let reply = chat.send("2").await.expect("apology");
        assert_eq!(reply.text, "Unable to count records.");
        assert_eq!(source.fetch_count(), 1);
        assert!(chat.is_open());

        let reply = chat.send("1").await.expect("fields");
        assert_eq!(reply.text, "Fields in Finance Budget: department, budget, spent");
    }

    #[tokio::test]
    async fn dataset_menu_does_not_fetch() {
        let (mut chat, source) = controller_with(MemoryFixtureSource::default());
        let reply = chat.send("Show me IT Software").await.expect("menu");
        assert!(reply.text.contains("**1. List fields**"));
        assert_eq!(source.fetch_count(), 0);
    }

    #[tokio::test]
    async fn chart_request_renders_table_and_chart() {
        let (mut chat, _) = controller_with(MemoryFixtureSource::default().with(
            "/mock/data/Finance_Budget.json",
            json!([
                { "department": "Ops", "budget": 100, "spent": 40 },
                { "department": "IT", "budget": 250, "spent": 200 },
            ]),
        ));
        let reply = chat
            .send("Show a chart of Finance Budget by department")
            .await
            .expect("chart");
        assert!(reply.text.starts_with("📊 Sure! I’ll generate a chart of Finance Budget"));
        assert!(reply.text.contains("| department | Count |"));
        let chart = reply.chart.expect("payload");
        assert_eq!(chart.values(), [100.0, 250.0]);
        assert_eq!(chart.title(), Some("Sum of budget by department"));
    }

    #[tokio::test]
    async fn closed_widget_renders_nothing_and_fires_callback() {
        let closes = Arc::new(AtomicUsize::new(0));
        let counter = closes.clone();
        let mut chat = ChatController::new(
            Arc::new(MemoryFixtureSource::default()),
            RenderSettings::default(),
        )
        .with_on_close(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert!(chat.view().is_none());
        assert!(chat.send("help").await.is_none());

        chat.set_open(true);
        assert_eq!(chat.view().map(<[ChatMessage]>::len), Some(1));
        chat.send("help").await.expect("help reply");
        assert_eq!(chat.view().map(<[ChatMessage]>::len), Some(3));

        chat.set_open(false);
        chat.set_open(false);
        assert!(chat.view().is_none());
        assert_eq!(closes.load(Ordering::SeqCst), 1);

        chat.open();
        assert_eq!(chat.session().messages().len(), 1);
    }
}
