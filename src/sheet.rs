use derive_setters::Setters;
use rayon::prelude::*;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, trace};

use crate::domain::SheetError;
use crate::export::{self, ExportFormat};
use crate::record::{DisplayField, Field, JobRequest, NewJobRequest, seed_data};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

/// `key == None` means unsorted: rows keep the order of the last filter/search pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortConfig {
    pub key: Option<Field>,
    pub direction: SortDirection,
}

/// Active column filters. A field without a (non-empty) value does not constrain rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnFilters {
    pub status: Option<String>,
    pub priority: Option<String>,
    pub submitter: Option<String>,
}

impl ColumnFilters {
    pub fn active(&self) -> impl Iterator<Item = (Field, &str)> {
        [
            (Field::Status, &self.status),
            (Field::Priority, &self.priority),
            (Field::Submitter, &self.submitter),
        ]
        .into_iter()
        .filter_map(|(field, value)| match value.as_deref() {
            Some(v) if !v.is_empty() => Some((field, v)),
            _ => None,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.active().next().is_none()
    }

    fn merge(&mut self, update: FilterUpdate) {
        fn apply(slot: &mut Option<String>, value: Option<String>) {
            match value {
                Some(v) if v.is_empty() => *slot = None,
                Some(v) => *slot = Some(v),
                None => {}
            }
        }
        apply(&mut self.status, update.status);
        apply(&mut self.priority, update.priority);
        apply(&mut self.submitter, update.submitter);
    }
}

/// A partial change to the column filters.
/// Unset fields are left alone, an empty string clears that field's filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Setters)]
#[setters(strip_option, into)]
pub struct FilterUpdate {
    pub status: Option<String>,
    pub priority: Option<String>,
    pub submitter: Option<String>,
}

impl FilterUpdate {
    /// Builds an update for a single field, `None` if the field cannot be filtered on.
    pub fn for_field(field: Field, value: impl Into<String>) -> Option<Self> {
        let update = FilterUpdate::default();
        match field {
            Field::Status => Some(update.status(value)),
            Field::Priority => Some(update.priority(value)),
            Field::Submitter => Some(update.submitter(value)),
            _ => None,
        }
    }

    pub fn clear_all() -> Self {
        FilterUpdate::default().status("").priority("").submitter("")
    }
}

/// How the view reacts to operations that the sort config does not cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewPolicy {
    /// Reapply the active sort after every filter or search.
    pub resort_after_filter: bool,
    /// After adding a row show all of `data` instead of reapplying the pipeline.
    pub reset_view_on_add: bool,
}

impl Default for ViewPolicy {
    fn default() -> Self {
        Self {
            resort_after_filter: false,
            reset_view_on_add: true,
        }
    }
}

fn matches_search(record: &JobRequest, query: &str) -> bool {
    query.is_empty()
        || DisplayField::ALL
            .iter()
            .any(|d| record.value(d.field()).to_lowercase().contains(query))
}

fn matches_filters(record: &JobRequest, filters: &[(Field, String)]) -> bool {
    filters
        .iter()
        .all(|(field, term)| record.value(*field).to_lowercase().contains(term.as_str()))
}

fn sort_rows(data: &[JobRequest], rows: &mut [usize], key: Field, direction: SortDirection) {
    // sort_by is stable, ties keep their previous relative order in both directions
    rows.sort_by(|&a, &b| {
        let ord = data[a].value(key).cmp(&data[b].value(key));
        match direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    });
}

/// Derives the visible rows of `data` as indices into it.
/// Search is applied first, then the column filters, then the sort.
pub fn compute_visible(
    data: &[JobRequest],
    filters: &ColumnFilters,
    search_query: &str,
    sort: SortConfig,
) -> Vec<usize> {
    let query = search_query.trim().to_lowercase();
    let active: Vec<(Field, String)> = filters
        .active()
        .map(|(field, term)| (field, term.to_lowercase()))
        .collect();

    let mut rows: Vec<usize> = (0..data.len())
        .into_par_iter()
        .filter(|&idx| matches_search(&data[idx], &query) && matches_filters(&data[idx], &active))
        .collect();

    if let Some(key) = sort.key {
        sort_rows(data, &mut rows, key, sort.direction);
    }
    rows
}

/// The data state engine: the canonical record set and the derived visible view.
///
/// `data` and the visible row mapping are shared snapshots. Operations never mutate
/// a snapshot another clone of the sheet can still see, so cloning a `Sheet` is a
/// cheap way to hand a consistent read-only state to a renderer.
#[derive(Debug, Clone)]
pub struct Sheet {
    data: Arc<Vec<JobRequest>>,
    rows: Arc<Vec<usize>>, // filteredData: indices into data in display order
    filters: ColumnFilters,
    search_query: String,
    sort_config: SortConfig,
    hidden_fields: BTreeSet<DisplayField>,
    selected_rows: BTreeSet<u64>,
    policy: ViewPolicy,
}

impl Sheet {
    pub fn new(data: Vec<JobRequest>) -> Self {
        let rows = (0..data.len()).collect();
        Self {
            data: Arc::new(data),
            rows: Arc::new(rows),
            filters: ColumnFilters::default(),
            search_query: String::new(),
            sort_config: SortConfig::default(),
            hidden_fields: BTreeSet::new(),
            selected_rows: BTreeSet::new(),
            policy: ViewPolicy::default(),
        }
    }

    pub fn seeded() -> Self {
        Sheet::new(seed_data())
    }

    pub fn with_policy(mut self, policy: ViewPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn data(&self) -> &[JobRequest] {
        &self.data
    }

    /// Visible records in display order.
    pub fn filtered_data(&self) -> impl ExactSizeIterator<Item = &JobRequest> + '_ {
        self.rows.iter().map(|&idx| &self.data[idx])
    }

    pub fn visible_record(&self, row: usize) -> Option<&JobRequest> {
        self.rows.get(row).map(|&idx| &self.data[idx])
    }

    pub fn visible_len(&self) -> usize {
        self.rows.len()
    }

    pub fn filters(&self) -> &ColumnFilters {
        &self.filters
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn sort_config(&self) -> SortConfig {
        self.sort_config
    }

    pub fn hidden_fields(&self) -> &BTreeSet<DisplayField> {
        &self.hidden_fields
    }

    pub fn is_hidden(&self, field: DisplayField) -> bool {
        self.hidden_fields.contains(&field)
    }

    pub fn selected_rows(&self) -> &BTreeSet<u64> {
        &self.selected_rows
    }

    pub fn is_selected(&self, id: u64) -> bool {
        self.selected_rows.contains(&id)
    }

    /// Sorts the visible rows by `key`. Sorting by the current key flips the direction.
    /// Keys outside the sortable set leave the sheet untouched.
    pub fn sort(&mut self, key: Field) {
        if !key.is_sortable() {
            debug!("Ignoring sort by non sortable field {}", key.key());
            return;
        }
        let direction = if self.sort_config.key == Some(key) {
            self.sort_config.direction.toggled()
        } else {
            SortDirection::Ascending
        };
        self.sort_config = SortConfig {
            key: Some(key),
            direction,
        };

        let mut rows = self.rows.as_ref().clone();
        sort_rows(&self.data, &mut rows, key, direction);
        self.rows = Arc::new(rows);
        debug!("Sorted {} rows by {} {:?}", self.rows.len(), key.key(), direction);
    }

    /// Sort by a record key name. Returns false, and does nothing, for unknown keys.
    pub fn sort_by_key(&mut self, key: &str) -> bool {
        match Field::from_key(key.trim()) {
            Some(field) if field.is_sortable() => {
                self.sort(field);
                true
            }
            _ => {
                debug!("Ignoring sort by unknown key \"{}\"", key);
                false
            }
        }
    }

    pub fn filter(&mut self, update: FilterUpdate) {
        self.filters.merge(update);
        trace!("Filters now {:?}", self.filters);
        self.refresh_view();
    }

    pub fn search(&mut self, query: &str) {
        self.search_query = query.to_string();
        self.refresh_view();
    }

    pub fn toggle_field_visibility(&mut self, field: DisplayField) {
        if !self.hidden_fields.remove(&field) {
            self.hidden_fields.insert(field);
        }
        trace!("Hidden fields {:?}", self.hidden_fields);
    }

    pub fn select_row(&mut self, id: u64) {
        if !self.selected_rows.remove(&id) {
            self.selected_rows.insert(id);
        }
    }

    /// Appends a record with the next free id and returns that id.
    /// Returns `None`, leaving the sheet untouched, once the largest id is `u64::MAX`.
    pub fn add_new_row(&mut self, row: NewJobRequest) -> Option<u64> {
        let id = match self.data.iter().map(|r| r.id).max() {
            Some(max) => max.checked_add(1)?,
            None => 1,
        };
        Arc::make_mut(&mut self.data).push(row.with_id(id));

        if self.policy.reset_view_on_add {
            self.rows = Arc::new((0..self.data.len()).collect());
        } else {
            self.rows = Arc::new(compute_visible(
                &self.data,
                &self.filters,
                &self.search_query,
                self.sort_config,
            ));
        }
        debug!("Added row {} ({} records, {} visible)", id, self.data.len(), self.rows.len());
        Some(id)
    }

    /// Serializes the visible rows.
    pub fn export_data(&self, format: ExportFormat) -> Result<String, SheetError> {
        match format {
            ExportFormat::Csv => Ok(export::to_csv(self.filtered_data())),
            ExportFormat::Json => {
                let records: Vec<&JobRequest> = self.filtered_data().collect();
                Ok(export::to_json(&records)?)
            }
        }
    }

    fn refresh_view(&mut self) {
        let sort = if self.policy.resort_after_filter {
            self.sort_config
        } else {
            SortConfig::default()
        };
        self.rows = Arc::new(compute_visible(&self.data, &self.filters, &self.search_query, sort));
        trace!("View has {} of {} rows", self.rows.len(), self.data.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{JobStatus, Priority};
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn visible_ids(sheet: &Sheet) -> Vec<u64> {
        sheet.filtered_data().map(|r| r.id).collect()
    }

    fn new_row(title: &str) -> NewJobRequest {
        NewJobRequest::new(title, JobStatus::NeedToStart, Priority::Medium)
    }

    #[test]
    fn filter_by_status_keeps_original_order() {
        let mut sheet = Sheet::seeded();
        sheet.filter(FilterUpdate::default().status("In-process"));
        assert_eq!(visible_ids(&sheet), vec![1, 3]);
    }

    #[test]
    fn filter_matches_case_insensitive_substrings() {
        let mut sheet = Sheet::seeded();
        sheet.filter(FilterUpdate::default().submitter("JOHN"));
        assert_eq!(visible_ids(&sheet), vec![3]);
    }

    #[test]
    fn filters_combine_with_and() {
        let mut sheet = Sheet::seeded();
        sheet.filter(FilterUpdate::default().priority("High"));
        assert_eq!(visible_ids(&sheet), vec![2]);

        // Record 2 is high priority but not blocked
        sheet.filter(FilterUpdate::default().status("Blocked"));
        assert!(visible_ids(&sheet).is_empty());

        sheet.filter(FilterUpdate::default().priority(""));
        assert_eq!(visible_ids(&sheet), vec![5]);
        assert_eq!(sheet.filters().priority, None);
    }

    #[test]
    fn clearing_all_filters_restores_every_row() {
        let mut sheet = Sheet::seeded();
        sheet.filter(FilterUpdate::default().status("Complete").priority("Low"));
        assert_eq!(visible_ids(&sheet), vec![4]);
        sheet.filter(FilterUpdate::clear_all());
        assert!(sheet.filters().is_empty());
        assert_eq!(visible_ids(&sheet), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn search_matches_any_field() {
        let mut sheet = Sheet::seeded();
        sheet.search("khan");
        assert_eq!(visible_ids(&sheet), vec![2]);

        sheet.search("  30-01  ");
        assert_eq!(visible_ids(&sheet), vec![5]);

        sheet.search("low");
        assert_eq!(visible_ids(&sheet), vec![4, 5]);
    }

    #[test]
    fn search_ignores_style_tags_and_id() {
        let mut sheet = Sheet::seeded();
        sheet.search("bg-slate");
        assert!(visible_ids(&sheet).is_empty());
        sheet.search("   ");
        assert_eq!(visible_ids(&sheet), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn search_runs_before_column_filters() {
        let mut sheet = Sheet::seeded();
        sheet.search("update");
        assert_eq!(visible_ids(&sheet), vec![2, 3]);
        sheet.filter(FilterUpdate::default().status("in-"));
        assert_eq!(visible_ids(&sheet), vec![3]);
        assert_eq!(sheet.search_query(), "update");
    }

    #[test]
    fn sort_twice_toggles_direction() {
        let mut sheet = Sheet::seeded();
        sheet.sort(Field::Priority);
        assert_eq!(visible_ids(&sheet), vec![2, 4, 5, 1, 3]);
        assert_eq!(sheet.sort_config().direction, SortDirection::Ascending);

        sheet.sort(Field::Priority);
        assert_eq!(visible_ids(&sheet), vec![1, 3, 4, 5, 2]);
        assert_eq!(
            sheet.sort_config(),
            SortConfig {
                key: Some(Field::Priority),
                direction: SortDirection::Descending
            }
        );
    }

    #[test]
    fn switching_sort_key_starts_ascending() {
        let mut sheet = Sheet::seeded();
        sheet.sort(Field::Title);
        sheet.sort(Field::Title);
        sheet.sort(Field::Submitter);
        assert_eq!(sheet.sort_config().direction, SortDirection::Ascending);
        // Aisha, Emily, Irfan, Jessica, Mark
        assert_eq!(visible_ids(&sheet), vec![1, 4, 2, 5, 3]);
    }

    #[test]
    fn dates_sort_as_plain_text() {
        let mut sheet = Sheet::seeded();
        sheet.sort(Field::SubmittedDate);
        // "05-12-2024" < "10-01-2025" < "15-11-2024" < "25-01-2025" < "28-10-2024"
        assert_eq!(visible_ids(&sheet), vec![3, 4, 1, 5, 2]);
    }

    #[test]
    fn unknown_or_unsortable_key_is_a_no_op() {
        let mut sheet = Sheet::seeded();
        sheet.sort(Field::Priority);
        let before = visible_ids(&sheet);

        assert!(!sheet.sort_by_key("colour"));
        sheet.sort(Field::Url);
        sheet.sort(Field::Id);
        assert_eq!(visible_ids(&sheet), before);
        assert_eq!(sheet.sort_config().key, Some(Field::Priority));

        assert!(sheet.sort_by_key("dueDate"));
        assert_eq!(sheet.sort_config().key, Some(Field::DueDate));
    }

    #[test]
    fn sort_only_reorders_visible_rows() {
        let mut sheet = Sheet::seeded();
        sheet.filter(FilterUpdate::default().priority("low"));
        sheet.sort(Field::Title);
        assert_eq!(visible_ids(&sheet), vec![4, 5]);
        sheet.sort(Field::Title);
        assert_eq!(visible_ids(&sheet), vec![5, 4]);
        let data_ids: Vec<u64> = sheet.data().iter().map(|r| r.id).collect();
        assert_eq!(data_ids, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn filter_drops_sort_order_by_default() {
        let mut sheet = Sheet::seeded();
        sheet.sort(Field::Priority);
        sheet.filter(FilterUpdate::default().priority("m"));
        assert_eq!(visible_ids(&sheet), vec![1, 3]);

        sheet.filter(FilterUpdate::default().priority(""));
        sheet.sort(Field::Title);
        sheet.search("");
        assert_eq!(visible_ids(&sheet), vec![1, 2, 3, 4, 5]);
        assert_eq!(sheet.sort_config().key, Some(Field::Title));
    }

    #[test]
    fn filter_keeps_sort_order_when_configured() {
        let mut sheet = Sheet::seeded().with_policy(ViewPolicy {
            resort_after_filter: true,
            reset_view_on_add: true,
        });
        sheet.sort(Field::Priority);
        sheet.sort(Field::Priority);
        sheet.search("");
        assert_eq!(visible_ids(&sheet), vec![1, 3, 4, 5, 2]);
    }

    #[test]
    fn toggle_field_visibility_does_not_touch_rows() {
        let mut sheet = Sheet::seeded();
        sheet.filter(FilterUpdate::default().status("process"));
        let original = sheet.hidden_fields().clone();

        sheet.toggle_field_visibility(DisplayField::Status);
        assert!(sheet.is_hidden(DisplayField::Status));
        assert_eq!(visible_ids(&sheet), vec![1, 3]);

        sheet.toggle_field_visibility(DisplayField::Status);
        assert_eq!(sheet.hidden_fields(), &original);
        assert_eq!(visible_ids(&sheet), vec![1, 3]);
    }

    #[test]
    fn select_row_toggles_membership() {
        let mut sheet = Sheet::seeded();
        sheet.select_row(3);
        sheet.select_row(5);
        assert!(sheet.is_selected(3));
        sheet.select_row(3);
        assert_eq!(sheet.selected_rows().iter().copied().collect::<Vec<_>>(), vec![5]);
    }

    #[test]
    fn add_new_row_takes_next_id_and_resets_view() {
        let mut sheet = Sheet::seeded();
        sheet.filter(FilterUpdate::default().status("Blocked"));
        sheet.sort(Field::Title);

        let id = sheet.add_new_row(new_row("Plan offsite")).unwrap();
        assert_eq!(id, 6);
        assert_eq!(sheet.data().len(), 6);
        assert_eq!(visible_ids(&sheet), vec![1, 2, 3, 4, 5, 6]);
        // The settings survive, they are only applied again on the next operation
        assert_eq!(sheet.filters().status.as_deref(), Some("Blocked"));
    }

    #[test]
    fn add_new_row_can_reapply_the_pipeline() {
        let mut sheet = Sheet::seeded().with_policy(ViewPolicy {
            resort_after_filter: false,
            reset_view_on_add: false,
        });
        sheet.filter(FilterUpdate::default().priority("Medium"));
        sheet.sort(Field::Title);
        sheet.sort(Field::Title);

        let id = sheet.add_new_row(new_row("Zine layout")).unwrap();
        assert_eq!(visible_ids(&sheet), vec![id, 1, 3]);
    }

    #[test]
    fn add_new_row_on_empty_sheet_starts_at_one() {
        let mut sheet = Sheet::new(Vec::new());
        assert_eq!(sheet.add_new_row(new_row("first")), Some(1));
        assert_eq!(sheet.add_new_row(new_row("second")), Some(2));
    }

    #[test]
    fn add_new_row_uses_max_id_not_length() {
        let mut data = seed_data();
        data[4].id = 40;
        let mut sheet = Sheet::new(data);
        assert_eq!(sheet.add_new_row(new_row("gap")), Some(41));
    }

    #[test]
    fn add_new_row_refuses_when_ids_are_exhausted() {
        let mut data = seed_data();
        data[4].id = u64::MAX;
        let mut sheet = Sheet::new(data);
        sheet.filter(FilterUpdate::default().status("Blocked"));

        assert_eq!(sheet.add_new_row(new_row("one too many")), None);
        assert_eq!(sheet.data().len(), 5);
        assert_eq!(visible_ids(&sheet), vec![u64::MAX]);
    }

    #[test]
    fn operations_on_empty_sheet_do_not_fail() {
        let mut sheet = Sheet::new(Vec::new());
        sheet.filter(FilterUpdate::default().status("Blocked"));
        sheet.search("anything");
        sheet.sort(Field::Title);
        assert_eq!(sheet.visible_len(), 0);
        assert_eq!(sheet.export_data(ExportFormat::Csv).unwrap(), "");
        assert_eq!(sheet.export_data(ExportFormat::Json).unwrap(), "[]");
    }

    #[test]
    fn export_follows_visible_rows() {
        let mut sheet = Sheet::seeded();
        let csv = sheet.export_data(ExportFormat::Csv).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(
            lines[0],
            "id,title,submittedDate,status,statusColor,submitter,url,assigned,priority,priorityColor,dueDate,estValue"
        );
        assert_eq!(lines.len(), 1 + sheet.visible_len());

        sheet.search("khan");
        let json = sheet.export_data(ExportFormat::Json).unwrap();
        let parsed: Vec<JobRequest> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, vec![seed_data()[1].clone()]);
    }

    #[test]
    fn clones_are_unaffected_by_later_operations() {
        let mut sheet = Sheet::seeded();
        let snapshot = sheet.clone();
        sheet.add_new_row(new_row("after snapshot")).unwrap();
        sheet.sort(Field::Title);
        sheet.filter(FilterUpdate::default().status("Need"));

        assert_eq!(snapshot.data().len(), 5);
        assert_eq!(visible_ids(&snapshot), vec![1, 2, 3, 4, 5]);
    }

    fn records() -> impl Strategy<Value = Vec<JobRequest>> {
        prop::collection::vec(("[a-cA-C ]{0,6}", 0usize..4, 0usize..3, "[a-c]{0,3}"), 0..16)
            .prop_map(|rows| {
                rows.into_iter()
                    .enumerate()
                    .map(|(idx, (title, status, priority, submitter))| {
                        let mut row =
                            NewJobRequest::new(title, JobStatus::ALL[status], Priority::ALL[priority]);
                        row.submitter = submitter;
                        row.with_id(idx as u64 + 1)
                    })
                    .collect()
            })
    }

    fn sortable_field() -> impl Strategy<Value = Field> {
        prop::sample::select(Field::ALL.iter().copied().filter(|f| f.is_sortable()).collect::<Vec<_>>())
    }

    proptest! {
        #[test]
        fn filtering_is_idempotent(
            data in records(),
            status in "[a-z-]{0,3}",
            query in "[a-cA-C ]{0,3}",
            key in sortable_field(),
        ) {
            let filters = ColumnFilters { status: Some(status), ..ColumnFilters::default() };
            let sort = SortConfig { key: Some(key), direction: SortDirection::Descending };
            let first = compute_visible(&data, &filters, &query, sort);
            let second = compute_visible(&data, &filters, &query, sort);
            prop_assert_eq!(first, second);
        }

        #[test]
        fn visible_rows_are_a_unique_subset(
            data in records(),
            submitter in "[a-c]{0,2}",
            query in "[a-c]{0,2}",
            key in sortable_field(),
        ) {
            let mut sheet = Sheet::new(data);
            sheet.search(&query);
            sheet.filter(FilterUpdate::default().submitter(submitter));
            sheet.sort(key);

            let ids = visible_ids(&sheet);
            let unique: HashSet<u64> = ids.iter().copied().collect();
            prop_assert_eq!(unique.len(), ids.len());
            for id in ids {
                prop_assert!(sheet.data().iter().any(|r| r.id == id));
            }
        }

        #[test]
        fn sorting_again_reverses_and_keeps_ties(data in records(), key in sortable_field()) {
            let mut sheet = Sheet::new(data);
            sheet.sort(key);
            let ascending: Vec<JobRequest> = sheet.filtered_data().cloned().collect();
            for pair in ascending.windows(2) {
                prop_assert!(pair[0].value(key) <= pair[1].value(key));
            }

            sheet.sort(key);
            let descending: Vec<JobRequest> = sheet.filtered_data().cloned().collect();
            let mut expected = ascending.clone();
            expected.sort_by(|a, b| b.value(key).cmp(&a.value(key)));
            prop_assert_eq!(descending, expected);
        }

        #[test]
        fn new_ids_are_max_plus_one(data in records()) {
            let expected = data.iter().map(|r| r.id).max().unwrap_or(0) + 1;
            let mut sheet = Sheet::new(data);
            prop_assert_eq!(sheet.add_new_row(new_row("x")), Some(expected));
            prop_assert_eq!(sheet.visible_len(), sheet.data().len());
        }
    }
}
