use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, instrument};

use super::intent::{Intent, IntentContext, IntentKind, IntentResult};
use super::resolve::{extract_group_field, find_dataset, normalize, without_dataset_phrase};
use crate::knowledge::{DatasetDescriptor, KnowledgeMap};

pub const HELP_RESPONSE: &str = "I can help you with:\n\
• List your accessible datasets\n\
• Summarize or preview data samples\n\
• List fields or row counts\n\
• Create charts or group data by fields\n\
• Access APIs, reports, and catalog items";

pub const CATALOG_RESPONSE: &str = "The Catalog contains datasets, APIs, and reports you can request. \
I’ll only provide metadata for those until access is granted.";

pub const UNKNOWN_RESPONSE: &str = "I didn’t quite catch that. Try:\n\
• 'What datasets do I have access to?'\n\
• 'Show me Finance Budget'\n\
• 'List HR Employees fields'\n\
• 'Show a chart of Finance Budget by department'";

/// Follow-up actions offered once a dataset is selected; digits 1-5 pick them.
pub const QUICK_OPTIONS: [&str; 5] = [
    "List fields",
    "Count rows",
    "Preview sample data",
    "Group data",
    "Visualize with charts",
];

#[derive(Debug)]
struct KeywordRule {
    kind: IntentKind,
    keywords: &'static [&'static str],
}

impl KeywordRule {
    const fn new(kind: IntentKind, keywords: &'static [&'static str]) -> Self {
        Self { kind, keywords }
    }

    fn evaluate(&self, normalized: &str) -> Option<&'static str> {
        let hit = self
            .keywords
            .iter()
            .copied()
            .find(|keyword| normalized.contains(keyword));
        if let Some(keyword) = hit {
            debug!(intent = %self.kind, keyword, "Keyword rule matched");
        }
        hit
    }
}

const HELP_RULE: KeywordRule = KeywordRule::new(
    IntentKind::Help,
    &["help", "what can you do", "commands", "abilities"],
);
const CATALOG_RULE: KeywordRule = KeywordRule::new(
    IntentKind::Catalog,
    &["catalog", "request access", "available datasets"],
);
const FIELDS_RULE: KeywordRule = KeywordRule::new(
    IntentKind::ListFields,
    &["fields", "columns", "schema", "headers"],
);
const COUNT_RULE: KeywordRule = KeywordRule::new(
    IntentKind::Count,
    &["how many", "count", "number of", "row count", "record count"],
);
const CHART_RULE: KeywordRule =
    KeywordRule::new(IntentKind::Chart, &["chart", "graph", "visualize", "plot"]);
const GROUP_RULE: KeywordRule =
    KeywordRule::new(IntentKind::Group, &["group", "summarize", "aggregate"]);

static LIST_DATASETS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(what|which)\s+(data\s*sets|datasets).*(have|access|available|mine)",
        r"(my|available)\s+datasets?",
        r"show\s+(me\s+)?(my\s+)?datasets?",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("valid regex"))
    .collect()
});

/// Maps one free-text message (plus the previously resolved dataset) to a single intent.
///
/// Rules run in a fixed order and the first hit wins: help, catalog, list
/// datasets, fields, count, chart, group, a bare dataset mention, then unknown.
/// The field/count/chart/group keywords are checked with the matched dataset
/// phrase removed, so a dataset named "... Groups" is not read as a group request.
#[instrument(level = "debug", skip(context))]
pub fn interpret(message: &str, context: &IntentContext) -> IntentResult {
    let normalized = normalize(message);
    let result = classify(&normalized, context);
    debug!(
        intent = %result.intent,
        dataset = result.dataset_key().unwrap_or("-"),
        "Interpreted message"
    );
    result
}

fn classify(msg: &str, context: &IntentContext) -> IntentResult {
    if HELP_RULE.evaluate(msg).is_some() {
        return IntentResult::reply(Intent::Help, HELP_RESPONSE);
    }

    if CATALOG_RULE.evaluate(msg).is_some() {
        return IntentResult::reply(Intent::Catalog, CATALOG_RESPONSE)
            .with_fetch_path(KnowledgeMap::catalog_path());
    }

    if LIST_DATASETS.iter().any(|pattern| pattern.is_match(msg)) {
        return list_datasets();
    }

    let found = find_dataset(msg);
    let commands = without_dataset_phrase(msg, found.as_ref());
    let explicit = found.map(|found| found.dataset);
    let target = explicit.or(context.last_dataset);

    if FIELDS_RULE.evaluate(&commands).is_some() {
        return match target {
            Some(dataset) => IntentResult::for_dataset(
                Intent::ListFields,
                dataset,
                fields_response(dataset),
            ),
            None => IntentResult::reply(
                Intent::ListFields,
                "Which dataset should I list fields for? (e.g., 'List Finance Budget fields')",
            ),
        };
    }

    if COUNT_RULE.evaluate(&commands).is_some() {
        return match target {
            Some(dataset) => IntentResult::for_dataset(
                Intent::Count,
                dataset,
                format!("Counting records in {}…", dataset.label()),
            )
            .with_fetch_path(dataset.path),
            None => IntentResult::reply(
                Intent::Count,
                "Which dataset should I count? (e.g., 'How many records in HR Employees?')",
            ),
        };
    }

    if CHART_RULE.evaluate(&commands).is_some() {
        let group_field = extract_group_field(msg);
        return match target {
            Some(dataset) => {
                let response = match &group_field {
                    Some(field) => format!(
                        "📊 Sure! I’ll generate a chart of {} grouped by {}.",
                        dataset.label(),
                        field
                    ),
                    None => format!("📊 I’ll visualize the {} dataset.", dataset.label()),
                };
                IntentResult::for_dataset(Intent::Chart { group_field }, dataset, response)
                    .with_fetch_path(dataset.path)
            }
            None => IntentResult::reply(
                Intent::Chart { group_field },
                "Which dataset would you like me to chart? (e.g., 'Show a bar chart of Finance Budget')",
            ),
        };
    }

    if GROUP_RULE.evaluate(&commands).is_some() {
        let group_field = extract_group_field(msg);
        return match target {
            Some(dataset) => {
                let response = match &group_field {
                    Some(field) => format!("📊 I’ll group {} by {}.", dataset.label(), field),
                    None => format!("📊 I’ll summarize {}.", dataset.label()),
                };
                IntentResult::for_dataset(Intent::Group { group_field }, dataset, response)
                    .with_fetch_path(dataset.path)
            }
            None => IntentResult::reply(
                Intent::Group { group_field },
                "Which dataset should I group? (e.g., 'Group HR Employees by title')",
            ),
        };
    }

    if let Some(dataset) = explicit {
        return IntentResult::for_dataset(Intent::Dataset, dataset, dataset_menu(dataset))
            .with_fetch_path(dataset.path);
    }

    IntentResult::reply(Intent::Unknown, UNKNOWN_RESPONSE)
}

fn list_datasets() -> IntentResult {
    let names = KnowledgeMap::sorted_labels();
    IntentResult::reply(
        Intent::ListDatasets,
        format!(
            "You currently have access to {} dataset(s):\n• {}",
            names.len(),
            names.join("\n• ")
        ),
    )
}

pub fn fields_response(dataset: &DatasetDescriptor) -> String {
    format!(
        "Fields in {}: {}",
        dataset.label(),
        dataset.key_fields.join(", ")
    )
}

/// Summary of a selected dataset followed by the numbered quick options.
pub fn dataset_menu(dataset: &DatasetDescriptor) -> String {
    let options: Vec<String> = QUICK_OPTIONS
        .iter()
        .enumerate()
        .map(|(index, label)| format!("**{}. {}**", index + 1, label))
        .collect();

    format!(
        "✅ You have access to **{}**.\nDescription: {}\n\nKey fields: {}\n\nI can help you with:\n{}\n*(Reply with a number to choose an option)*",
        dataset.label(),
        dataset.description,
        dataset.key_fields.join(", "),
        options.join("\n")
    )
}
