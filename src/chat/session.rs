use serde_json::Value;
use tracing::{debug, info};

use super::message::ChatMessage;
use super::operations::{render, DataOperation, RenderSettings};
use crate::fixtures::FixtureError;
use crate::interpreter::{fields_response, interpret, Intent, IntentContext};
use crate::knowledge::DatasetDescriptor;

pub const GREETING: &str = "👋 Hi, I’m Dedge, your data assistant. Ask me about your datasets, \
or type 'help' to see what I can do.";

pub const NEED_DATASET: &str =
    "I need a dataset first. Try naming one, e.g. 'Show me Finance Budget'.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Closed,
    AwaitingInput,
    Processing,
}

/// Per-open-session memory; reset on open, dropped on close.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionContext {
    pub last_dataset: Option<&'static DatasetDescriptor>,
    pub last_fetch_path: Option<String>,
    pub suggested_group_field: Option<String>,
    /// Set only while the latest bot reply is a grouping or chart answer.
    pub regroup_offered: bool,
}

impl SessionContext {
    fn select(&mut self, dataset: &'static DatasetDescriptor, fetch_path: Option<&str>) {
        let switched = self.last_dataset.map(|current| current.key) != Some(dataset.key);
        if switched {
            self.suggested_group_field = None;
        }
        self.last_dataset = Some(dataset);
        self.last_fetch_path = Some(fetch_path.unwrap_or(dataset.path).to_string());
    }

    fn group_field_or_default(&self, dataset: &DatasetDescriptor) -> Option<String> {
        self.suggested_group_field
            .clone()
            .or_else(|| dataset.default_group_field().map(str::to_string))
    }
}

/// Identifies one in-flight fetch; only the newest ticket of the current open session may land.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnTicket {
    generation: u64,
    request_id: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingFetch {
    pub ticket: TurnTicket,
    pub dataset: &'static DatasetDescriptor,
    pub operation: DataOperation,
    pub preface: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnPlan {
    /// Chat closed or blank input; nothing appended.
    Ignored,
    /// A bot reply was appended synchronously.
    Replied,
    /// Caller must fetch `dataset.path` and hand the result to `finish_turn`.
    Fetch(PendingFetch),
}

/// Conversation state plus the reducer that advances it one turn at a time.
///
/// The session never performs I/O. `begin_turn` records the user message and
/// either answers immediately or hands back a [`PendingFetch`]; the fetched
/// document comes back through `finish_turn`.
#[derive(Debug)]
pub struct ChatSession {
    phase: SessionPhase,
    messages: Vec<ChatMessage>,
    context: SessionContext,
    settings: RenderSettings,
    generation: u64,
    next_request_id: u64,
    in_flight: Option<u64>,
}

impl ChatSession {
    pub fn new(settings: RenderSettings) -> Self {
        Self {
            phase: SessionPhase::Closed,
            messages: Vec::new(),
            context: SessionContext::default(),
            settings,
            generation: 0,
            next_request_id: 0,
            in_flight: None,
        }
    }

    pub fn open(&mut self) {
        self.generation += 1;
        self.in_flight = None;
        self.context = SessionContext::default();
        self.messages = vec![ChatMessage::bot(GREETING)];
        self.phase = SessionPhase::AwaitingInput;
        info!(generation = self.generation, "Chat opened");
    }

    pub fn close(&mut self) {
        if self.phase == SessionPhase::Closed {
            return;
        }
        self.phase = SessionPhase::Closed;
        self.in_flight = None;
        self.context = SessionContext::default();
        self.messages.clear();
        info!(generation = self.generation, "Chat closed");
    }

    #[allow(dead_code)]
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_open(&self) -> bool {
        self.phase != SessionPhase::Closed
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    #[allow(dead_code)]
    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    pub fn begin_turn(&mut self, input: &str) -> TurnPlan {
        let trimmed = input.trim();
        if !self.is_open() || trimmed.is_empty() {
            return TurnPlan::Ignored;
        }

        self.messages.push(ChatMessage::user(trimmed));
        let regroup_offered = std::mem::take(&mut self.context.regroup_offered);

        if let Some(option) = quick_option(trimmed) {
            return self.quick_option(option);
        }

        if let Some(field) = self.regroup_field(trimmed, regroup_offered) {
            debug!(field = %field, "Re-selecting group field");
            self.context.suggested_group_field = Some(field.clone());
            return self.fetch(DataOperation::PivotAndChart { field }, None);
        }

        self.interpreted(input)
    }

    /// Applies a fetched document; stale tickets are dropped and nothing is appended.
    pub fn finish_turn(
        &mut self,
        pending: PendingFetch,
        fetched: Result<Value, FixtureError>,
    ) -> Option<&ChatMessage> {
        let current = pending.ticket.generation == self.generation
            && self.in_flight == Some(pending.ticket.request_id)
            && self.is_open();
        if !current {
            debug!(
                request_id = pending.ticket.request_id,
                generation = pending.ticket.generation,
                "Discarding stale fixture response"
            );
            return None;
        }

        self.in_flight = None;
        self.phase = SessionPhase::AwaitingInput;
        self.context.regroup_offered =
            pending.operation.group_field().is_some() && fetched.is_ok();

        let mut reply = render(&pending.operation, pending.dataset, fetched, self.settings);
        if let Some(preface) = pending.preface {
            reply.text = format!("{}\n\n{}", preface, reply.text);
        }
        self.messages.push(reply);
        self.messages.last()
    }

    fn quick_option(&mut self, option: u8) -> TurnPlan {
        let Some(dataset) = self.context.last_dataset else {
            return self.reply(NEED_DATASET);
        };

        match option {
            1 => self.reply(fields_response(dataset)),
            2 => self.fetch(DataOperation::Count, None),
            3 => self.fetch(DataOperation::Preview, None),
            _ => {
                let Some(field) = self.context.group_field_or_default(dataset) else {
                    return self.reply(NEED_DATASET);
                };
                self.context.suggested_group_field = Some(field.clone());
                let operation = if option == 4 {
                    DataOperation::Pivot { field }
                } else {
                    DataOperation::Chart { field }
                };
                self.fetch(operation, None)
            }
        }
    }

    /// A bare key-field name right after a grouping reply means "regroup by this".
    fn regroup_field(&self, trimmed: &str, regroup_offered: bool) -> Option<String> {
        if !regroup_offered {
            return None;
        }
        let dataset = self.context.last_dataset?;
        dataset.key_field(trimmed).map(str::to_string)
    }

    fn interpreted(&mut self, input: &str) -> TurnPlan {
        let result = interpret(
            input,
            &IntentContext {
                last_dataset: self.context.last_dataset,
            },
        );

        let Some(dataset) = result.dataset else {
            return self.reply(result.response);
        };
        self.context.select(dataset, result.fetch_path.as_deref());

        match &result.intent {
            Intent::Group { group_field } | Intent::Chart { group_field } => {
                let field = group_field
                    .as_deref()
                    .map(|candidate| {
                        dataset
                            .key_field(candidate)
                            .map(str::to_string)
                            .unwrap_or_else(|| candidate.to_string())
                    })
                    .or_else(|| self.context.group_field_or_default(dataset));

                match field {
                    Some(field) => {
                        self.context.suggested_group_field = Some(field.clone());
                        self.fetch(DataOperation::PivotAndChart { field }, Some(result.response))
                    }
                    None => self.reply(result.response),
                }
            }
            Intent::Count => self.fetch(DataOperation::Count, Some(result.response)),
            _ => self.reply(result.response),
        }
    }

    fn reply(&mut self, text: impl Into<String>) -> TurnPlan {
        self.messages.push(ChatMessage::bot(text));
        if self.in_flight.is_none() {
            self.phase = SessionPhase::AwaitingInput;
        }
        TurnPlan::Replied
    }

    fn fetch(&mut self, operation: DataOperation, preface: Option<String>) -> TurnPlan {
        let Some(dataset) = self.context.last_dataset else {
            return self.reply(NEED_DATASET);
        };

        self.next_request_id += 1;
        self.in_flight = Some(self.next_request_id);
        self.phase = SessionPhase::Processing;

        TurnPlan::Fetch(PendingFetch {
            ticket: TurnTicket {
                generation: self.generation,
                request_id: self.next_request_id,
            },
            dataset,
            operation,
            preface,
        })
    }
}

fn quick_option(trimmed: &str) -> Option<u8> {
    match trimmed {
        "1" => Some(1),
        "2" => Some(2),
        "3" => Some(3),
        "4" => Some(4),
        "5" => Some(5),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::KnowledgeMap;
    use serde_json::json;

    fn open_session() -> ChatSession {
        let mut session = ChatSession::new(RenderSettings::default());
        session.open();
        session
    }

    fn expect_fetch(plan: TurnPlan) -> PendingFetch {
        match plan {
            TurnPlan::Fetch(pending) => pending,
            other => panic!("expected fetch, got {other:?}"),
        }
    }

    fn last_text(session: &ChatSession) -> &str {
        &session.messages().last().expect("message").text
    }

    #[test]
    fn opening_seeds_a_single_greeting() {
        let session = open_session();
        assert_eq!(session.phase(), SessionPhase::AwaitingInput);
        assert_eq!(session.messages().len(), 1);
        assert_eq!(session.messages()[0].text, GREETING);
        assert!(GREETING.starts_with("👋 Hi, I’m Dedge, your data assistant."));
        assert_eq!(session.context(), &SessionContext::default());
    }

    #[test]
    fn closed_session_ignores_input() {
        let mut session = ChatSession::new(RenderSettings::default());
        assert_eq!(session.begin_turn("help"), TurnPlan::Ignored);
        assert!(session.messages().is_empty());

        let mut session = open_session();
        assert_eq!(session.begin_turn("   "), TurnPlan::Ignored);
        assert_eq!(session.messages().len(), 1);
    }

    #[test]
    fn quick_option_without_dataset_asks_for_one() {
        let mut session = open_session();
        assert_eq!(session.begin_turn("2"), TurnPlan::Replied);
        assert_eq!(last_text(&session), NEED_DATASET);
    }

    #[test]
    fn option_one_lists_key_fields() {
        let mut session = open_session();
        session.context.last_dataset = KnowledgeMap::get("Finance_Budget").ok();
        assert_eq!(session.begin_turn("1"), TurnPlan::Replied);
        assert_eq!(
            last_text(&session),
            "Fields in Finance Budget: department, budget, spent"
        );
    }

    #[test]
    fn dataset_mention_shows_menu_without_fetching() {
        let mut session = open_session();
        assert_eq!(session.begin_turn("Show me HR Employees"), TurnPlan::Replied);
        assert!(last_text(&session).contains("**5. Visualize with charts**"));
        assert_eq!(
            session.context().last_fetch_path.as_deref(),
            Some("/mock/data/HR_Employees.json")
        );
        assert_eq!(session.phase(), SessionPhase::AwaitingInput);
    }

    #[test]
    fn option_four_defaults_to_first_key_field() {
        let mut session = open_session();
        session.begin_turn("Finance Budget");
        let pending = expect_fetch(session.begin_turn("4"));
        assert_eq!(
            pending.operation,
            DataOperation::Pivot {
                field: "department".into()
            }
        );
        assert_eq!(session.phase(), SessionPhase::Processing);
        assert_eq!(
            session.context().suggested_group_field.as_deref(),
            Some("department")
        );
    }

    #[test]
    fn key_field_reply_after_grouping_regroups() {
        let mut session = open_session();
        session.begin_turn("Finance Budget");
        let pending = expect_fetch(session.begin_turn("5"));
        session.finish_turn(pending, Ok(json!([{ "department": "Ops", "budget": 1 }])));

        let pending = expect_fetch(session.begin_turn("Budget"));
        assert_eq!(
            pending.operation,
            DataOperation::PivotAndChart {
                field: "budget".into()
            }
        );
    }

    #[test]
    fn regroup_window_closes_after_any_other_turn() {
        let mut session = open_session();
        session.begin_turn("Finance Budget");
        let pending = expect_fetch(session.begin_turn("5"));
        session.finish_turn(pending, Ok(json!([{ "department": "Ops", "spent": 3 }])));

        assert_eq!(session.begin_turn("1"), TurnPlan::Replied);
        assert!(!session.context().regroup_offered);
        assert_eq!(session.begin_turn("spent"), TurnPlan::Replied);
        assert_eq!(last_text(&session), crate::interpreter::rules::UNKNOWN_RESPONSE);

        assert_eq!(session.begin_turn("Show me Finance Budget"), TurnPlan::Replied);
        assert_eq!(session.begin_turn("Budget"), TurnPlan::Replied);
        assert!(last_text(&session).starts_with("✅ You have access to **Finance Budget**"));
        assert_eq!(
            session.context().suggested_group_field.as_deref(),
            Some("department")
        );

        let pending = expect_fetch(session.begin_turn("4"));
        assert_eq!(
            pending.operation,
            DataOperation::Pivot {
                field: "department".into()
            }
        );
    }

    #[test]
    fn failed_grouping_does_not_offer_regroup() {
        let mut session = open_session();
        session.begin_turn("Finance Budget");
        let pending = expect_fetch(session.begin_turn("4"));
        session.finish_turn(
            pending,
            Err(FixtureError::NotFound("/mock/data/Finance_Budget.json".into())),
        );
        assert!(!session.context().regroup_offered);
    }

    #[test]
    fn key_field_without_suggestion_goes_to_interpreter() {
        let mut session = open_session();
        session.begin_turn("Finance Budget");
        // "budget" is an alias, so without a prior suggestion this re-selects the dataset.
        assert_eq!(session.begin_turn("budget"), TurnPlan::Replied);
        assert!(last_text(&session).starts_with("✅ You have access to **Finance Budget**"));
    }

    #[test]
    fn group_intent_resolves_extracted_field() {
        let mut session = open_session();
        let pending = expect_fetch(session.begin_turn("Group HR Employees by title"));
        assert_eq!(
            pending.operation,
            DataOperation::PivotAndChart {
                field: "Title".into()
            }
        );
        assert_eq!(pending.preface.as_deref(), Some("📊 I’ll group HR Employees by title."));
    }

    #[test]
    fn switching_datasets_forgets_the_group_field() {
        let mut session = open_session();
        session.begin_turn("Finance Budget");
        let pending = expect_fetch(session.begin_turn("4"));
        session.finish_turn(pending, Ok(json!([{ "department": "Ops" }])));

        session.begin_turn("Show me IT Software");
        assert!(session.context().suggested_group_field.is_none());
    }

    #[test]
    fn stale_responses_are_discarded() {
        let mut session = open_session();
        session.begin_turn("Finance Budget");
        let first = expect_fetch(session.begin_turn("2"));
        let second = expect_fetch(session.begin_turn("3"));
        let before = session.messages().len();

        assert!(session
            .finish_turn(first, Ok(json!([{ "department": "Ops" }])))
            .is_none());
        assert_eq!(session.messages().len(), before);

        let reply = session
            .finish_turn(second, Ok(json!([{ "department": "Ops" }])))
            .expect("latest response lands");
        assert!(reply.text.starts_with("Preview of Finance Budget"));
    }

    #[test]
    fn reopening_drops_in_flight_work_and_context() {
        let mut session = open_session();
        session.begin_turn("Finance Budget");
        let pending = expect_fetch(session.begin_turn("2"));

        session.close();
        assert!(session.messages().is_empty());
        session.open();

        assert!(session.finish_turn(pending, Ok(json!([{}]))).is_none());
        assert_eq!(session.messages().len(), 1);
        assert!(session.context().last_dataset.is_none());
    }

    #[test]
    fn count_intent_prefixes_progress_text() {
        let mut session = open_session();
        let pending = expect_fetch(session.begin_turn("How many records in HR Employees?"));
        let reply = session
            .finish_turn(pending, Ok(json!([{ "EmpId": 1 }, { "EmpId": 2 }])))
            .expect("reply");
        assert_eq!(
            reply.text,
            "Counting records in HR Employees…\n\nHR Employees has 2 records."
        );
    }
}
