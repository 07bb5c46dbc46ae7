use arboard::Clipboard;
use ratatui::crossterm::event::KeyEvent;
use tracing::{debug, error, info, trace};

use crate::command::{Command, parse_new_row};
use crate::domain::{CmdMode, HELP_TEXT, Message, SheetConfig, SheetError};
use crate::export::{self, ExportFormat};
use crate::inputter::{InputResult, Inputter};
use crate::record::{DisplayField, Field, JobRequest, NewJobRequest};
use crate::sheet::{FilterUpdate, Sheet, SortDirection};
use crate::ui::{CMDLINE_HEIGH, COLUMN_WIDTH_MARGIN, TABLE_BORDER_HEIGHT, TABLE_HEADER_HEIGHT};

#[derive(Debug, PartialEq)]
pub enum Status {
    Ready,
    Quitting,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Modus {
    Table,
    Popup,
    CmdInput,
}

/// A column of the grid: one of the record's display fields or an ad-hoc column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridColumn {
    Field(DisplayField),
    Custom(usize),
}

#[derive(Clone, Debug)]
pub struct ColumnView {
    pub name: String,
    pub field: Option<DisplayField>,
    pub width: usize,
    pub data: Vec<String>,
}

/// Everything the ui needs to draw one frame.
pub struct UIData {
    pub name: String,
    pub table: Vec<ColumnView>,
    pub marked: Vec<bool>, // Selected rows, by visible row index
    pub nrows: usize,
    pub selected_row: usize,
    pub selected_column: usize,
    pub show_popup: bool,
    pub popup_message: String,
    pub cmdinput: InputResult,
    pub cmd_mode: Option<CmdMode>,
    pub active_cmdinput: bool,
    pub status_message: String,
    pub view_summary: String,
}

impl UIData {
    pub fn empty() -> Self {
        UIData {
            name: String::new(),
            table: Vec::new(),
            marked: Vec::new(),
            nrows: 0,
            selected_row: 0,
            selected_column: 0,
            show_popup: false,
            popup_message: String::new(),
            cmdinput: InputResult::default(),
            cmd_mode: None,
            active_cmdinput: false,
            status_message: String::new(),
            view_summary: String::new(),
        }
    }
}

pub struct Model {
    config: SheetConfig,
    pub status: Status,
    modus: Modus,
    previous_modus: Modus,
    sheet: Sheet,
    custom_columns: Vec<String>,
    cursor_row: usize,
    cursor_column: usize,
    table_height: usize,
    uidata: UIData,
    clipboard: Option<Clipboard>, // Created on first copy
    input: Inputter,
    cmd_mode: Option<CmdMode>,
    last_input: InputResult,
    active_cmdinput: bool,
    status_message: String,
}

impl Model {
    pub fn init(config: &SheetConfig, sheet: Sheet) -> Self {
        let mut model = Self {
            config: config.clone(),
            status: Status::Ready,
            modus: Modus::Table,
            previous_modus: Modus::Table,
            sheet: sheet.with_policy(config.view_policy),
            custom_columns: Vec::new(),
            cursor_row: 0,
            cursor_column: 0,
            table_height: 1,
            uidata: UIData::empty(),
            clipboard: None,
            input: Inputter::default(),
            cmd_mode: None,
            last_input: InputResult::default(),
            active_cmdinput: false,
            status_message: String::new(),
        };
        model.update_uidata();
        let loaded = format!("Loaded {} job requests, ? for help", model.sheet.data().len());
        model.set_status_message(loaded);
        model
    }

    pub fn sheet(&self) -> &Sheet {
        &self.sheet
    }

    pub fn get_uidata(&self) -> &UIData {
        &self.uidata
    }

    pub fn raw_keyevents(&self) -> bool {
        self.active_cmdinput
    }

    pub fn quit(&mut self) {
        self.status = Status::Quitting;
    }

    pub fn update(&mut self, message: Option<Message>) -> Result<(), SheetError> {
        if let Some(msg) = message {
            match self.modus {
                Modus::Table => match msg {
                    Message::Quit => self.quit(),
                    Message::MoveUp => self.move_selection_up(1),
                    Message::MoveDown => self.move_selection_down(1),
                    Message::MoveLeft => self.move_selection_left(),
                    Message::MoveRight => self.move_selection_right(),
                    Message::MovePageUp => self.move_selection_up(self.table_height),
                    Message::MovePageDown => self.move_selection_down(self.table_height),
                    Message::MoveBeginning => self.move_selection_up(usize::MAX),
                    Message::MoveEnd => self.move_selection_down(usize::MAX),
                    Message::Sort => self.sort_current_column(),
                    Message::Search => self.enter_cmd_mode(CmdMode::Search),
                    Message::Filter => self.filter_current_column(),
                    Message::ClearFilters => self.clear_filters(),
                    Message::HideColumn => self.hide_current_column(),
                    Message::ShowAllColumns => self.show_all_columns(),
                    Message::SelectRow => self.select_current_row(),
                    Message::AddRow => self.enter_cmd_mode(CmdMode::AddRow),
                    Message::AddColumn => self.add_custom_column(),
                    Message::Export(format) => self.export(format),
                    Message::CopyCell => self.copy_cell(),
                    Message::CopyRow => self.copy_row(),
                    Message::EnterCommand => self.enter_cmd_mode(CmdMode::Raw),
                    Message::Help => self.show_help(),
                    Message::Resize(width, height) => self.ui_resize(width, height),
                    Message::Exit | Message::RawKey(_) => (),
                },
                Modus::Popup => match msg {
                    Message::Quit => self.quit(),
                    Message::Resize(width, height) => self.ui_resize(width, height),
                    Message::Exit | Message::Help => self.exit(),
                    _ => (),
                },
                Modus::CmdInput => match msg {
                    Message::RawKey(key) => self.raw_input(key),
                    Message::Resize(width, height) => self.ui_resize(width, height),
                    _ => (),
                },
            }
        }
        Ok(())
    }

    // -------------------- View building ---------------------- //

    fn grid_columns(&self) -> Vec<GridColumn> {
        DisplayField::ALL
            .into_iter()
            .filter(|d| !self.sheet.is_hidden(*d))
            .map(GridColumn::Field)
            .chain((0..self.custom_columns.len()).map(GridColumn::Custom))
            .collect()
    }

    fn current_column(&self) -> Option<GridColumn> {
        self.grid_columns().get(self.cursor_column).copied()
    }

    fn current_record(&self) -> Option<&JobRequest> {
        self.sheet.visible_record(self.cursor_row)
    }

    fn cell_value(record: &JobRequest, column: GridColumn) -> String {
        match column {
            GridColumn::Field(d) => record.value(d.field()).replace('\n', " ↵ "),
            GridColumn::Custom(_) => String::new(),
        }
    }

    fn calculate_column_width(name: &str, data: &[String], max_column_width: usize) -> usize {
        let content = data.iter().map(|s| s.chars().count()).max().unwrap_or(0);
        let width = std::cmp::max(name.chars().count(), content) + COLUMN_WIDTH_MARGIN;
        std::cmp::min(width, max_column_width)
    }

    fn build_column_view(&self, column: GridColumn) -> ColumnView {
        let (name, field) = match column {
            GridColumn::Field(d) => {
                let sort = self.sheet.sort_config();
                let name = match (sort.key, sort.direction) {
                    (Some(key), SortDirection::Ascending) if key == d.field() => {
                        format!("{} ▲", d.label())
                    }
                    (Some(key), SortDirection::Descending) if key == d.field() => {
                        format!("{} ▼", d.label())
                    }
                    _ => d.label().to_string(),
                };
                (name, Some(d))
            }
            GridColumn::Custom(idx) => (self.custom_columns[idx].clone(), None),
        };
        let data: Vec<String> = self
            .sheet
            .filtered_data()
            .map(|record| Self::cell_value(record, column))
            .collect();
        let width = Self::calculate_column_width(&name, &data, self.config.max_column_width);
        ColumnView {
            name,
            field,
            width,
            data,
        }
    }

    fn view_summary(&self) -> String {
        let mut parts = vec![format!(
            "{}/{} rows",
            self.sheet.visible_len(),
            self.sheet.data().len()
        )];
        let query = self.sheet.search_query().trim();
        if !query.is_empty() {
            parts.push(format!("search \"{query}\""));
        }
        for (field, term) in self.sheet.filters().active() {
            parts.push(format!("{}~\"{}\"", field.key(), term));
        }
        if !self.sheet.selected_rows().is_empty() {
            parts.push(format!("{} selected", self.sheet.selected_rows().len()));
        }
        if !self.sheet.hidden_fields().is_empty() {
            parts.push(format!("{} hidden", self.sheet.hidden_fields().len()));
        }
        parts.join(" | ")
    }

    fn update_uidata(&mut self) {
        let columns = self.grid_columns();
        let nrows = self.sheet.visible_len();
        self.cursor_row = std::cmp::min(self.cursor_row, nrows.saturating_sub(1));
        self.cursor_column = std::cmp::min(self.cursor_column, columns.len().saturating_sub(1));

        let table = columns
            .into_iter()
            .map(|column| self.build_column_view(column))
            .collect();
        let marked = self
            .sheet
            .filtered_data()
            .map(|record| self.sheet.is_selected(record.id))
            .collect();

        self.uidata = UIData {
            name: "jobsheet".to_string(),
            table,
            marked,
            nrows,
            selected_row: self.cursor_row,
            selected_column: self.cursor_column,
            show_popup: self.uidata.show_popup,
            popup_message: self.uidata.popup_message.clone(),
            cmdinput: self.last_input.clone(),
            cmd_mode: self.cmd_mode,
            active_cmdinput: self.active_cmdinput,
            status_message: self.status_message.clone(),
            view_summary: self.view_summary(),
        };
    }

    fn set_status_message(&mut self, message: impl Into<String>) {
        self.status_message = message.into();
        self.uidata.status_message = self.status_message.clone();
    }

    fn ui_resize(&mut self, width: usize, height: usize) {
        trace!("UI was resized! w:{}, h:{}", width, height);
        self.table_height = height
            .saturating_sub(CMDLINE_HEIGH + TABLE_HEADER_HEIGHT + TABLE_BORDER_HEIGHT)
            .max(1);
        self.update_uidata();
    }

    // -------------------- Control handling functions ---------------------- //

    fn exit(&mut self) {
        if self.modus == Modus::Popup {
            trace!("Close popup ...");
            self.modus = self.previous_modus;
            self.previous_modus = Modus::Popup;
            self.uidata.show_popup = false;
        }
    }

    fn show_help(&mut self) {
        self.previous_modus = self.modus;
        self.modus = Modus::Popup;
        self.uidata.popup_message = HELP_TEXT.to_string();
        self.uidata.show_popup = true;
    }

    fn raw_input(&mut self, key: KeyEvent) {
        if self.active_cmdinput {
            self.last_input = self.input.read(key);
            if self.last_input.finished {
                self.handle_cmd_input();
            }
            self.uidata.cmdinput = self.last_input.clone();
            self.uidata.cmd_mode = self.cmd_mode;
            self.uidata.active_cmdinput = self.active_cmdinput;
        }
    }

    fn enter_cmd_mode(&mut self, mode: CmdMode) {
        trace!("Entering command mode {:?} ...", mode);
        self.previous_modus = self.modus;
        self.modus = Modus::CmdInput;
        self.cmd_mode = Some(mode);
        self.active_cmdinput = true;

        self.input.clear();
        match mode {
            CmdMode::Search => self.input.set(self.sheet.search_query()),
            CmdMode::Filter(field) => {
                let current = self
                    .sheet
                    .filters()
                    .active()
                    .find(|(f, _)| *f == field)
                    .map(|(_, term)| term.to_string());
                if let Some(term) = current {
                    self.input.set(&term);
                }
            }
            CmdMode::Raw | CmdMode::AddRow => {}
        }
        self.last_input = self.input.get();

        self.uidata.cmdinput = self.last_input.clone();
        self.uidata.active_cmdinput = self.active_cmdinput;
        self.uidata.cmd_mode = self.cmd_mode;
    }

    fn handle_cmd_input(&mut self) {
        trace!("Handle cmd input {}", self.last_input.input);

        self.active_cmdinput = false;
        self.modus = self.previous_modus;
        self.previous_modus = Modus::CmdInput;
        let mode = self.cmd_mode.take();

        if self.last_input.canceled {
            self.set_status_message("Canceled");
            self.update_uidata();
            return;
        }

        let cmd_input = self.last_input.input.clone();
        match mode {
            Some(CmdMode::Search) => self.apply_search(&cmd_input),
            Some(CmdMode::Filter(field)) => self.apply_filter(field, &cmd_input),
            Some(CmdMode::AddRow) => match parse_new_row(&cmd_input) {
                Ok(row) => self.insert_row(row),
                Err(e) => self.set_status_message(e),
            },
            Some(CmdMode::Raw) => match cmd_input.parse::<Command>() {
                Ok(command) => self.run_command(command),
                Err(e) => self.set_status_message(e),
            },
            None => info!("Cmd mode is none!"),
        }
        self.update_uidata();
    }

    fn run_command(&mut self, command: Command) {
        debug!("Running command {:?}", command);
        match command {
            Command::Sort(key) => {
                if self.sheet.sort_by_key(&key) {
                    self.set_status_message(format!("Sorted by {}", key.trim()));
                } else {
                    self.set_status_message(format!("Cannot sort by \"{key}\""));
                }
            }
            Command::Filter(field, value) => self.apply_filter(field, &value),
            Command::Search(query) => self.apply_search(&query),
            Command::Toggle(field) => {
                self.sheet.toggle_field_visibility(field);
                let state = if self.sheet.is_hidden(field) { "Hid" } else { "Showing" };
                self.set_status_message(format!("{} column {}", state, field.label()));
            }
            Command::Select(id) => {
                if self.sheet.data().iter().any(|r| r.id == id) {
                    self.sheet.select_row(id);
                    self.set_status_message(format!("Toggled selection of #{id}"));
                } else {
                    self.set_status_message(format!("No job request #{id}"));
                }
            }
            Command::Add(row) => self.insert_row(row),
            Command::Column => self.add_custom_column(),
            Command::Export(format) => self.export(format),
            Command::Quit => self.quit(),
        }
        self.update_uidata();
    }

    fn apply_search(&mut self, query: &str) {
        self.sheet.search(query);
        self.cursor_row = 0;
        self.set_status_message(format!("Found {} rows", self.sheet.visible_len()));
        self.update_uidata();
    }

    fn apply_filter(&mut self, field: Field, value: &str) {
        match FilterUpdate::for_field(field, value.trim()) {
            Some(update) => {
                self.sheet.filter(update);
                self.cursor_row = 0;
                self.set_status_message(format!(
                    "Filtered {}: {} rows",
                    field.key(),
                    self.sheet.visible_len()
                ));
            }
            None => self.set_status_message(format!("Cannot filter on {}", field.key())),
        }
        self.update_uidata();
    }

    fn filter_current_column(&mut self) {
        match self.current_column() {
            Some(GridColumn::Field(d))
                if matches!(d.field(), Field::Status | Field::Priority | Field::Submitter) =>
            {
                self.enter_cmd_mode(CmdMode::Filter(d.field()))
            }
            Some(GridColumn::Field(d)) => {
                self.set_status_message(format!("Column {} cannot be filtered", d.label()))
            }
            Some(GridColumn::Custom(_)) => {
                self.set_status_message("Custom columns cannot be filtered")
            }
            None => {}
        }
    }

    fn clear_filters(&mut self) {
        if self.sheet.filters().is_empty() && self.sheet.search_query().trim().is_empty() {
            self.set_status_message("No filters to clear");
            return;
        }
        self.sheet.filter(FilterUpdate::clear_all());
        self.sheet.search("");
        self.cursor_row = 0;
        self.set_status_message("Cleared filters and search");
        self.update_uidata();
    }

    fn sort_current_column(&mut self) {
        match self.current_column() {
            Some(GridColumn::Field(d)) if d.field().is_sortable() => {
                self.sheet.sort(d.field());
                let direction = match self.sheet.sort_config().direction {
                    SortDirection::Ascending => "ascending",
                    SortDirection::Descending => "descending",
                };
                self.set_status_message(format!("Sorted by {} ({})", d.label(), direction));
            }
            Some(GridColumn::Field(d)) => {
                self.set_status_message(format!("Column {} cannot be sorted", d.label()))
            }
            Some(GridColumn::Custom(_)) => self.set_status_message("Custom columns cannot be sorted"),
            None => {}
        }
        self.update_uidata();
    }

    fn hide_current_column(&mut self) {
        match self.current_column() {
            Some(GridColumn::Field(d)) => {
                self.sheet.toggle_field_visibility(d);
                self.set_status_message(format!("Hid column {}, X shows all", d.label()));
            }
            Some(GridColumn::Custom(_)) => self.set_status_message("Custom columns cannot be hidden"),
            None => {}
        }
        self.update_uidata();
    }

    fn show_all_columns(&mut self) {
        let hidden: Vec<DisplayField> = self.sheet.hidden_fields().iter().copied().collect();
        for field in hidden.iter() {
            self.sheet.toggle_field_visibility(*field);
        }
        self.set_status_message(format!("Showing {} hidden columns", hidden.len()));
        self.update_uidata();
    }

    fn select_current_row(&mut self) {
        if let Some(id) = self.current_record().map(|r| r.id) {
            self.sheet.select_row(id);
            let state = if self.sheet.is_selected(id) { "Selected" } else { "Unselected" };
            self.set_status_message(format!("{state} #{id}"));
            self.update_uidata();
        }
    }

    fn insert_row(&mut self, row: NewJobRequest) {
        let Some(id) = self.sheet.add_new_row(row) else {
            error!("No free job request id left");
            self.set_status_message("Cannot add row: no free id left");
            return;
        };
        if let Some(pos) = self.sheet.filtered_data().position(|r| r.id == id) {
            self.cursor_row = pos;
        }
        info!("Added job request #{id}");
        self.set_status_message(format!("Added job request #{id}"));
        self.update_uidata();
    }

    fn add_custom_column(&mut self) {
        let name = format!("Custom {}", self.custom_columns.len() + 1);
        self.set_status_message(format!("Added column {name}"));
        self.custom_columns.push(name);
        self.update_uidata();
    }

    fn export(&mut self, format: ExportFormat) {
        let written = self
            .sheet
            .export_data(format)
            .and_then(|contents| export::deliver(&self.config.export_dir, format, &contents));
        match written {
            Ok(path) => self.set_status_message(format!(
                "Exported {} rows to {}",
                self.sheet.visible_len(),
                path.display()
            )),
            Err(e) => {
                error!("Export failed: {:?}", e);
                self.set_status_message(format!("Export failed: {e}"));
            }
        }
    }

    fn wrap_cell_content(c: &str) -> String {
        let needs_escaping = c.contains('"');
        let needs_wrapping =
            needs_escaping || c.chars().any(|c| c == ' ' || c == '\t' || c == ',');
        let mut out = String::from(c);

        if needs_escaping {
            out = out.replace('"', "\"\"");
        }
        if needs_wrapping {
            out = format!("\"{out}\"");
        }
        out
    }

    fn copy_cell(&mut self) {
        let cell = match (self.current_record(), self.current_column()) {
            (Some(record), Some(column)) => Self::cell_value(record, column),
            _ => return,
        };
        trace!("Cell content: {}", cell);
        self.copy_to_clipboard(cell);
    }

    fn copy_row(&mut self) {
        let Some(record) = self.current_record() else {
            return;
        };
        let row_content = self
            .grid_columns()
            .into_iter()
            .map(|column| Self::wrap_cell_content(&Self::cell_value(record, column)))
            .collect::<Vec<String>>()
            .join(",");
        self.copy_to_clipboard(row_content);
    }

    fn copy_to_clipboard(&mut self, text: String) {
        if self.clipboard.is_none() {
            match Clipboard::new() {
                Ok(clipboard) => self.clipboard = Some(clipboard),
                Err(e) => {
                    error!("Clipboard unavailable: {:?}", e);
                    self.set_status_message("Clipboard unavailable");
                    return;
                }
            }
        }
        if let Some(clipboard) = self.clipboard.as_mut() {
            match clipboard.set_text(text) {
                Ok(_) => self.set_status_message("Copied to clipboard"),
                Err(e) => {
                    error!("Error copying to clipboard: {:?}", e);
                    self.set_status_message("Copy failed");
                }
            }
        }
    }

    fn move_selection_up(&mut self, size: usize) {
        self.cursor_row = self.cursor_row.saturating_sub(size);
        self.update_uidata();
    }

    fn move_selection_down(&mut self, size: usize) {
        let last = self.sheet.visible_len().saturating_sub(1);
        self.cursor_row = std::cmp::min(self.cursor_row.saturating_add(size), last);
        self.update_uidata();
    }

    fn move_selection_left(&mut self) {
        self.cursor_column = self.cursor_column.saturating_sub(1);
        self.update_uidata();
    }

    fn move_selection_right(&mut self) {
        self.cursor_column += 1;
        // update_uidata clamps to the last column
        self.update_uidata();
    }
}
