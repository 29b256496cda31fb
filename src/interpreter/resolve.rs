use once_cell::sync::Lazy;
use regex::Regex;

use crate::knowledge::{human_label, DatasetDescriptor, KnowledgeMap, DATASET_ALIASES};

static SEPARATORS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[_\-]+").expect("valid regex"));
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));
static GROUP_BY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bby ([a-z0-9_ ]+)").expect("valid regex"));

/// Lower-case, fold `_`/`-` runs into spaces, collapse whitespace, trim.
pub fn normalize(input: &str) -> String {
    let lowered = input.to_lowercase();
    let spaced = SEPARATORS.replace_all(&lowered, " ");
    WHITESPACE.replace_all(&spaced, " ").trim().to_string()
}

/// A dataset reference found in a message, with the phrase that matched it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatasetMatch {
    pub dataset: &'static DatasetDescriptor,
    pub phrase: &'static str,
}

/// Full-name pass over the registry first, then the alias table, both in registry order.
pub fn find_dataset(normalized: &str) -> Option<DatasetMatch> {
    for dataset in KnowledgeMap::datasets() {
        if normalized.contains(&normalize(&human_label(dataset.key))) {
            return Some(DatasetMatch {
                dataset,
                phrase: dataset.key,
            });
        }
    }

    for (key, aliases) in DATASET_ALIASES {
        let Some(alias) = aliases
            .iter()
            .copied()
            .find(|alias| normalized.contains(&normalize(alias)))
        else {
            continue;
        };

        if let Ok(dataset) = KnowledgeMap::get(key) {
            return Some(DatasetMatch {
                dataset,
                phrase: alias,
            });
        }
    }

    None
}

/// Drops the matched dataset phrase so words inside a dataset name ("groups")
/// are not read as command keywords.
pub fn without_dataset_phrase(normalized: &str, found: Option<&DatasetMatch>) -> String {
    match found {
        Some(found) => {
            let phrase = normalize(found.phrase);
            let stripped = normalized.replace(&phrase, " ");
            WHITESPACE.replace_all(&stripped, " ").trim().to_string()
        }
        None => normalized.to_string(),
    }
}

/// Captures the text after "by", with inner spaces turned into underscores.
pub fn extract_group_field(normalized: &str) -> Option<String> {
    let captured = GROUP_BY.captures(normalized)?.get(1)?.as_str().trim();
    if captured.is_empty() {
        return None;
    }

    Some(WHITESPACE.replace_all(captured, "_").into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_folds_separators_and_whitespace() {
        assert_eq!(normalize("  HR_Employees--Count \t NOW "), "hr employees count now");
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("___"), "");
    }

    #[test]
    fn full_names_win_over_aliases() {
        let found = find_dataset("tell me about computer hardware").expect("match");
        assert_eq!(found.dataset.key, "Computer_Hardware");

        // "computers" is an alias of the AD computers set, but the full name of
        // the AD groups set appears first in the scan.
        let found = find_dataset("active directory groups and computers").expect("match");
        assert_eq!(found.dataset.key, "Active_Directory_Groups");
    }

    #[test]
    fn alias_overlap_follows_registry_order() {
        // Matches both Computer_Hardware ("hardware") and HR_Devices ("devices");
        // Computer_Hardware comes first in the registry.
        let found = find_dataset("show devices hardware").expect("match");
        assert_eq!(found.dataset.key, "Computer_Hardware");
        assert_eq!(found.phrase, "hardware");

        let found = find_dataset("list the staff").expect("match");
        assert_eq!(found.dataset.key, "HR_Employees");
    }

    #[test]
    fn nothing_matches_garbage() {
        assert!(find_dataset("asdkjhasd").is_none());
        assert!(find_dataset("").is_none());
    }

    #[test]
    fn dataset_phrase_is_removed_before_keyword_checks() {
        let normalized = normalize("Group Active_Directory_Groups by group scope");
        let found = find_dataset(&normalized);
        assert_eq!(
            without_dataset_phrase(&normalized, found.as_ref()),
            "group by group scope"
        );
        assert_eq!(without_dataset_phrase("plain text", None), "plain text");
    }

    #[test]
    fn group_field_is_underscored() {
        assert_eq!(
            extract_group_field("chart user entitlements by onedrive status"),
            Some("onedrive_status".to_string())
        );
        assert_eq!(
            extract_group_field("group finance budget by department"),
            Some("department".to_string())
        );
        assert_eq!(extract_group_field("chart finance budget"), None);
        assert_eq!(extract_group_field("show my hobby"), None);
    }
}
