use chrono::NaiveDate;
use labnote_core::query::{entry_stats, matches_query, tag_vocabulary};
use labnote_core::repo::seed::sample_entries;
use labnote_core::{run_query, Entry, EntryQuery, EntryStatus};

fn entry(id: &str, title: &str, date: (i32, u32, u32), tags: &[&str], status: EntryStatus) -> Entry {
    Entry {
        id: id.to_string(),
        title: title.to_string(),
        date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
        tags: tags.iter().map(|tag| tag.to_string()).collect(),
        status,
        body: String::new(),
        attachments: vec![],
        images: vec![],
    }
}

fn ids(entries: &[&Entry]) -> Vec<String> {
    entries.iter().map(|entry| entry.id.clone()).collect()
}

#[test]
fn inactive_query_returns_everything_newest_first() {
    let entries = sample_entries();
    let view = run_query(&entries, &EntryQuery::default());
    assert_eq!(
        ids(&view.visible),
        vec!["exp-005", "exp-004", "exp-003", "exp-002", "exp-001"]
    );
}

#[test]
fn search_matches_title_body_or_tag_case_insensitively() {
    let mut by_body = entry("a", "Expression study", (2025, 1, 1), &[], EntryStatus::Planned);
    by_body.body = "Ran deseq2 on counts".to_string();
    let by_tag = entry("b", "Other", (2025, 1, 2), &["DESeq2"], EntryStatus::Planned);
    let by_title = entry("c", "DESEQ2 rerun", (2025, 1, 3), &[], EntryStatus::Planned);
    let unrelated = entry("d", "Variant calling", (2025, 1, 4), &["GATK"], EntryStatus::Planned);
    let entries = vec![by_body, by_tag, by_title, unrelated];

    let view = run_query(&entries, &EntryQuery::new("deseq2"));
    assert_eq!(ids(&view.visible), vec!["c", "b", "a"]);
}

#[test]
fn search_against_samples_finds_only_matching_entry() {
    let entries = sample_entries();
    let view = run_query(&entries, &EntryQuery::new("DESeq2"));
    assert!(view.visible.iter().any(|entry| entry.id == "exp-001"));
    assert!(view.visible.iter().all(|entry| entry.id != "exp-005"));
}

#[test]
fn whitespace_search_is_inactive() {
    let entries = sample_entries();
    let view = run_query(&entries, &EntryQuery::new("   "));
    assert_eq!(view.visible.len(), entries.len());
}

#[test]
fn tag_filter_is_exact_and_case_sensitive() {
    let entries = vec![
        entry("a", "WGS batch", (2025, 2, 3), &["GATK", "WGS"], EntryStatus::Complete),
        entry("b", "Exome", (2025, 2, 4), &["gatk"], EntryStatus::Complete),
        entry("c", "Panel", (2025, 2, 5), &["GATK-SV"], EntryStatus::Complete),
    ];

    let view = run_query(&entries, &EntryQuery::default().with_tag("GATK"));
    assert_eq!(ids(&view.visible), vec!["a"]);
}

#[test]
fn predicates_combine_with_and() {
    let entries = sample_entries();
    let query = EntryQuery::new("analysis")
        .with_tag("metagenomics")
        .with_status(EntryStatus::Complete);
    let view = run_query(&entries, &query);
    assert_eq!(ids(&view.visible), vec!["exp-004"]);
    assert!(view.visible.iter().all(|entry| matches_query(entry, &query)));

    let none = run_query(
        &entries,
        &EntryQuery::default()
            .with_tag("metagenomics")
            .with_status(EntryStatus::InProgress),
    );
    assert!(none.visible.is_empty());
}

#[test]
fn same_date_entries_keep_collection_order() {
    let entries = vec![
        entry("first", "A", (2025, 3, 1), &[], EntryStatus::Planned),
        entry("older", "B", (2025, 1, 1), &[], EntryStatus::Planned),
        entry("second", "C", (2025, 3, 1), &[], EntryStatus::Planned),
        entry("newest", "D", (2025, 4, 1), &[], EntryStatus::Planned),
        entry("third", "E", (2025, 3, 1), &[], EntryStatus::Planned),
    ];

    let view = run_query(&entries, &EntryQuery::default());
    assert_eq!(
        ids(&view.visible),
        vec!["newest", "first", "second", "third", "older"]
    );
}

#[test]
fn vocabulary_is_sorted_unique_and_ignores_filters() {
    let entries = vec![
        entry("a", "A", (2025, 1, 1), &["b", "a", "b"], EntryStatus::Planned),
        entry("b", "B", (2025, 1, 2), &["B", "c"], EntryStatus::Complete),
    ];
    let expected = vec!["B", "a", "b", "c"];

    assert_eq!(tag_vocabulary(&entries), expected);
    let filtered = run_query(
        &entries,
        &EntryQuery::new("zzz").with_status(EntryStatus::Complete),
    );
    assert!(filtered.visible.is_empty());
    assert_eq!(filtered.vocabulary, expected);
}

#[test]
fn pipeline_does_not_reorder_input() {
    let entries = sample_entries();
    let before = entries.clone();
    let _ = run_query(&entries, &EntryQuery::new("seq"));
    assert_eq!(entries, before);
}

#[test]
fn stats_count_each_status() {
    let stats = entry_stats(&sample_entries());
    assert_eq!(stats.total, 5);
    assert_eq!(stats.complete, 3);
    assert_eq!(stats.in_progress, 2);
    assert_eq!(stats.planned, 0);
}
