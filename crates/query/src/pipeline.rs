use chrono::Datelike;
use indexmap::IndexMap;

use supplydesk_catalog::StockCatalog;
use supplydesk_core::ValueObject;
use supplydesk_requisitions::RequisitionRecord;

/// Items with an on-hand quantity strictly below this count as "low stock".
pub const LOW_STOCK_THRESHOLD: f64 = 5.0;

/// Facets applied to the requisition ledger on every view refresh.
///
/// `None` month/year means no date constraint ("all"). All three facets
/// combine with logical AND.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordFilter {
    /// Case-insensitive substring match against requester, department, or
    /// item name (logical OR across the three fields).
    pub search: String,
    /// 1-based calendar month of the requisition date.
    pub month: Option<u32>,
    pub year: Option<i32>,
}

impl ValueObject for RecordFilter {}

/// Headline figures for the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardStats {
    pub total_requests: usize,
    pub total_quantity: f64,
    /// Department with the most filtered records; `None` when there are no
    /// records. Ties go to the department first encountered while counting.
    pub top_department: Option<String>,
    /// Counted over the whole catalog, never the filtered set.
    pub low_stock_count: usize,
}

impl ValueObject for DashboardStats {}

/// One bar of the top-N chart series.
#[derive(Debug, Clone, PartialEq)]
pub struct TopItem {
    pub name: String,
    pub quantity: f64,
}

impl ValueObject for TopItem {}

/// Filter and order the ledger for display.
///
/// Returns records matching all active facets, ordered by requisition date
/// descending; records sharing a date keep their ledger (insertion) order.
pub fn filter_records<'a>(
    records: &'a [RequisitionRecord],
    filter: &RecordFilter,
) -> Vec<&'a RequisitionRecord> {
    let term = filter.search.trim().to_lowercase();

    let mut matched: Vec<&RequisitionRecord> = records
        .iter()
        .filter(|r| {
            let matches_search = term.is_empty()
                || r.requester.to_lowercase().contains(&term)
                || r.department.to_lowercase().contains(&term)
                || r.item_name.to_lowercase().contains(&term);

            let matches_month = filter.month.is_none_or(|m| r.date.month() == m);
            let matches_year = filter.year.is_none_or(|y| r.date.year() == y);

            matches_search && matches_month && matches_year
        })
        .collect();

    // Stable sort: equal dates keep insertion order.
    matched.sort_by(|a, b| b.date.cmp(&a.date));
    matched
}

/// Derive dashboard statistics from the filtered view plus the full catalog.
pub fn aggregate(filtered: &[&RequisitionRecord], catalog: &StockCatalog) -> DashboardStats {
    let total_quantity = filtered.iter().map(|r| r.quantity).sum();

    // IndexMap keeps first-encounter order, which makes the tie-break
    // ("first key encountered while counting wins") deterministic.
    let mut department_counts: IndexMap<&str, usize> = IndexMap::new();
    for record in filtered {
        *department_counts
            .entry(record.department.as_str())
            .or_insert(0) += 1;
    }

    let mut top_department: Option<(&str, usize)> = None;
    for (department, count) in &department_counts {
        match top_department {
            Some((_, best)) if *count <= best => {}
            _ => top_department = Some((department, *count)),
        }
    }

    let low_stock_count = catalog
        .items()
        .iter()
        .filter(|i| i.quantity < LOW_STOCK_THRESHOLD)
        .count();

    DashboardStats {
        total_requests: filtered.len(),
        total_quantity,
        top_department: top_department.map(|(d, _)| d.to_string()),
        low_stock_count,
    }
}

/// Top `n` items of the filtered view by summed quantity (chart series).
///
/// Grouping is by verbatim item name. Ties keep first-encounter order, same
/// rule as the department tie-break.
pub fn top_items(filtered: &[&RequisitionRecord], n: usize) -> Vec<TopItem> {
    let mut totals: IndexMap<&str, f64> = IndexMap::new();
    for record in filtered {
        *totals.entry(record.item_name.as_str()).or_insert(0.0) += record.quantity;
    }

    let mut series: Vec<TopItem> = totals
        .into_iter()
        .map(|(name, quantity)| TopItem {
            name: name.to_string(),
            quantity,
        })
        .collect();

    // Stable sort keeps first-encounter order among equal totals.
    series.sort_by(|a, b| {
        b.quantity
            .partial_cmp(&a.quantity)
            .unwrap_or(core::cmp::Ordering::Equal)
    });
    series.truncate(n);
    series
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use supplydesk_catalog::StockInput;
    use supplydesk_core::RecordId;

    fn record(
        requester: &str,
        department: &str,
        date: (i32, u32, u32),
        item_name: &str,
        quantity: f64,
    ) -> RequisitionRecord {
        RequisitionRecord {
            id: RecordId::new(),
            requester: requester.to_string(),
            department: department.to_string(),
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            item_name: item_name.to_string(),
            item_code: String::new(),
            quantity,
            unit: "pcs".to_string(),
            note: String::new(),
            timestamp: Utc::now(),
        }
    }

    fn sample_records() -> Vec<RequisitionRecord> {
        vec![
            record("Alice", "IT", (2024, 3, 10), "Pen", 2.0),
            record("Bob", "HR", (2024, 3, 20), "Paper A4", 5.0),
            record("Carol", "IT", (2024, 2, 5), "Stapler", 1.0),
            record("Dan", "Finance", (2023, 12, 1), "Pen", 3.0),
        ]
    }

    #[test]
    fn empty_filter_returns_all_sorted_by_date_descending() {
        let records = sample_records();
        let view = filter_records(&records, &RecordFilter::default());

        let requesters: Vec<&str> = view.iter().map(|r| r.requester.as_str()).collect();
        assert_eq!(requesters, vec!["Bob", "Alice", "Carol", "Dan"]);
    }

    #[test]
    fn equal_dates_keep_insertion_order() {
        let records = vec![
            record("First", "IT", (2024, 3, 10), "Pen", 1.0),
            record("Second", "HR", (2024, 3, 10), "Pen", 1.0),
            record("Third", "IT", (2024, 3, 10), "Pen", 1.0),
        ];
        let view = filter_records(&records, &RecordFilter::default());

        let requesters: Vec<&str> = view.iter().map(|r| r.requester.as_str()).collect();
        assert_eq!(requesters, vec!["First", "Second", "Third"]);
    }

    #[test]
    fn search_matches_requester_department_or_item_name() {
        let records = sample_records();

        for term in ["alice", "ALICE", "hr", "stapler"] {
            let filter = RecordFilter {
                search: term.to_string(),
                ..RecordFilter::default()
            };
            assert_eq!(filter_records(&records, &filter).len(), 1, "term {term:?}");
        }

        // Substring match: "pen" hits both Pen records.
        let filter = RecordFilter {
            search: "pen".to_string(),
            ..RecordFilter::default()
        };
        assert_eq!(filter_records(&records, &filter).len(), 2);
    }

    #[test]
    fn facets_combine_with_logical_and() {
        let records = sample_records();

        let filter = RecordFilter {
            search: String::new(),
            month: Some(3),
            year: Some(2024),
        };
        assert_eq!(filter_records(&records, &filter).len(), 2);

        let filter = RecordFilter {
            search: "pen".to_string(),
            month: Some(3),
            year: Some(2024),
        };
        let view = filter_records(&records, &filter);
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].requester, "Alice");

        let filter = RecordFilter {
            search: String::new(),
            month: Some(12),
            year: Some(2024),
        };
        assert!(filter_records(&records, &filter).is_empty());
    }

    #[test]
    fn filtering_is_idempotent() {
        let records = sample_records();
        let filter = RecordFilter {
            search: "pen".to_string(),
            month: None,
            year: Some(2024),
        };

        let once: Vec<RequisitionRecord> = filter_records(&records, &filter)
            .into_iter()
            .cloned()
            .collect();
        let twice: Vec<RequisitionRecord> = filter_records(&once, &filter)
            .into_iter()
            .cloned()
            .collect();

        assert_eq!(once, twice);
    }

    #[test]
    fn aggregate_totals_and_top_department() {
        let records = sample_records();
        let view = filter_records(&records, &RecordFilter::default());
        let stats = aggregate(&view, &StockCatalog::new());

        assert_eq!(stats.total_requests, 4);
        assert_eq!(stats.total_quantity, 11.0);
        assert_eq!(stats.top_department.as_deref(), Some("IT"));
    }

    #[test]
    fn top_department_tie_goes_to_first_encountered_while_counting() {
        // HR and IT both occur twice; HR is seen first during accumulation
        // (the view is date-descending, so the 3-20 record leads).
        let records = vec![
            record("Alice", "IT", (2024, 3, 10), "Pen", 1.0),
            record("Bob", "HR", (2024, 3, 20), "Pen", 1.0),
            record("Carol", "IT", (2024, 3, 5), "Pen", 1.0),
            record("Dan", "HR", (2024, 3, 1), "Pen", 1.0),
        ];
        let view = filter_records(&records, &RecordFilter::default());
        let stats = aggregate(&view, &StockCatalog::new());

        assert_eq!(stats.top_department.as_deref(), Some("HR"));
    }

    #[test]
    fn top_department_is_none_for_empty_view() {
        let stats = aggregate(&[], &StockCatalog::new());
        assert_eq!(stats.top_department, None);
        assert_eq!(stats.total_requests, 0);
        assert_eq!(stats.total_quantity, 0.0);
    }

    #[test]
    fn low_stock_counts_whole_catalog_with_strict_threshold() {
        let mut catalog = StockCatalog::new();
        let now = Utc::now();
        for (name, qty) in [("Paper", 100.0), ("Pen", 2.0), ("Tape", 5.0)] {
            catalog
                .insert(
                    StockInput {
                        name: name.to_string(),
                        code: String::new(),
                        quantity: qty,
                        unit: "pcs".to_string(),
                    },
                    now,
                )
                .unwrap();
        }

        // Exactly 5 is not low; only Pen (2) is. The filtered view does not
        // participate at all.
        let stats = aggregate(&[], &catalog);
        assert_eq!(stats.low_stock_count, 1);

        let records = sample_records();
        let filter = RecordFilter {
            search: "no such thing".to_string(),
            ..RecordFilter::default()
        };
        let view = filter_records(&records, &filter);
        assert_eq!(aggregate(&view, &catalog).low_stock_count, 1);
    }

    #[test]
    fn top_items_groups_sums_and_truncates() {
        let records = vec![
            record("A", "IT", (2024, 1, 1), "Pen", 2.0),
            record("B", "IT", (2024, 1, 2), "Paper", 10.0),
            record("C", "IT", (2024, 1, 3), "Pen", 4.0),
            record("D", "IT", (2024, 1, 4), "Tape", 1.0),
        ];
        let view = filter_records(&records, &RecordFilter::default());

        let series = top_items(&view, 5);
        let names: Vec<&str> = series.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Paper", "Pen", "Tape"]);
        assert_eq!(series[1].quantity, 6.0);

        let series = top_items(&view, 2);
        assert_eq!(series.len(), 2);
        assert_eq!(series[1].name, "Pen");
    }

    #[test]
    fn top_items_tie_keeps_first_encounter_order() {
        // Tape and Pen both sum to 3; Tape is encountered first in the
        // date-descending view.
        let records = vec![
            record("A", "IT", (2024, 1, 1), "Pen", 3.0),
            record("B", "IT", (2024, 1, 2), "Tape", 3.0),
        ];
        let view = filter_records(&records, &RecordFilter::default());

        let names: Vec<String> = top_items(&view, 5).into_iter().map(|i| i.name).collect();
        assert_eq!(names, vec!["Tape", "Pen"]);
    }
}
