use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    symbols::border,
    text::{Line, Span},
    widgets::{Block, Cell, Clear, Paragraph, Row, Table, TableState},
};

use crate::model::{ColumnView, Model, UIData};
use crate::record::{DisplayField, JobStatus, Priority};

pub const CMDLINE_HEIGH: usize = 1;
pub const TABLE_HEADER_HEIGHT: usize = 1;
pub const TABLE_BORDER_HEIGHT: usize = 2;
pub const COLUMN_WIDTH_MARGIN: usize = 1;

const MARKER_WIDTH: u16 = 1;

#[derive(Debug, Default)]
pub struct TableUI {
    table_state: TableState,
}

impl TableUI {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draw(&mut self, model: &Model, frame: &mut Frame) {
        let uidata = model.get_uidata();
        let [table_area, cmdline_area] = Layout::vertical([
            Constraint::Min(1),
            Constraint::Length(CMDLINE_HEIGH as u16),
        ])
        .areas(frame.area());

        self.render_table(uidata, frame, table_area);
        render_cmdline(uidata, frame, cmdline_area);

        if uidata.show_popup {
            render_popup(&uidata.popup_message, frame);
        }
    }

    fn render_table(&mut self, uidata: &UIData, frame: &mut Frame, area: Rect) {
        // The first column carries the selection marker
        let header = Row::new(
            std::iter::once(Cell::from(" "))
                .chain(uidata.table.iter().map(|col| Cell::from(col.name.clone()))),
        )
        .style(Style::new().add_modifier(Modifier::BOLD | Modifier::UNDERLINED))
        .height(TABLE_HEADER_HEIGHT as u16);

        let rows = (0..uidata.nrows).map(|row| {
            let marker = if uidata.marked.get(row).copied().unwrap_or(false) {
                "●"
            } else {
                " "
            };
            Row::new(
                std::iter::once(Cell::from(marker).green())
                    .chain(uidata.table.iter().map(|col| data_cell(col, row))),
            )
        });

        let widths = std::iter::once(Constraint::Length(MARKER_WIDTH)).chain(
            uidata
                .table
                .iter()
                .map(|col| Constraint::Length(saturating_u16(col.width))),
        );

        let title = Line::from(format!(" {} ", uidata.name).bold());
        let summary = Line::from(format!(" {} ", uidata.view_summary));
        let table = Table::new(rows, widths)
            .header(header)
            .block(
                Block::bordered()
                    .title(title.centered())
                    .title_bottom(summary.right_aligned())
                    .border_set(border::PLAIN),
            )
            .row_highlight_style(Style::new().add_modifier(Modifier::REVERSED))
            .column_highlight_style(Style::new().fg(Color::Cyan))
            .cell_highlight_style(Style::new().add_modifier(Modifier::BOLD));

        if uidata.nrows == 0 {
            self.table_state.select(None);
        } else {
            self.table_state.select(Some(uidata.selected_row));
        }
        if uidata.table.is_empty() {
            self.table_state.select_column(None);
        } else {
            self.table_state.select_column(Some(uidata.selected_column + 1));
        }

        frame.render_stateful_widget(table, area, &mut self.table_state);
    }
}

// Terminal coordinates are u16, wider values stick at the edge
fn saturating_u16(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}

fn data_cell(col: &ColumnView, row: usize) -> Cell<'static> {
    let value = col.data.get(row).cloned().unwrap_or_default();
    let style = cell_style(col.field, &value);
    Cell::from(value).style(style)
}

fn cell_style(field: Option<DisplayField>, value: &str) -> Style {
    match field {
        Some(DisplayField::Status) => match value.parse::<JobStatus>() {
            Ok(JobStatus::InProcess) => Style::new().fg(Color::Yellow),
            Ok(JobStatus::NeedToStart) => Style::new().fg(Color::Gray),
            Ok(JobStatus::Complete) => Style::new().fg(Color::Green),
            Ok(JobStatus::Blocked) => Style::new().fg(Color::Red),
            Err(_) => Style::new(),
        },
        Some(DisplayField::Priority) => match value.parse::<Priority>() {
            Ok(Priority::High) => Style::new().fg(Color::Red).add_modifier(Modifier::BOLD),
            Ok(Priority::Medium) => Style::new().fg(Color::Yellow),
            Ok(Priority::Low) => Style::new().fg(Color::Blue),
            Err(_) => Style::new(),
        },
        Some(DisplayField::Url) => Style::new().fg(Color::Blue).add_modifier(Modifier::UNDERLINED),
        _ => Style::new(),
    }
}

fn render_cmdline(uidata: &UIData, frame: &mut Frame, area: Rect) {
    if uidata.active_cmdinput {
        let prompt = uidata.cmd_mode.map(|m| m.prompt()).unwrap_or_default();
        let cursor_x = saturating_u16(prompt.chars().count() + uidata.cmdinput.cursor_pos);
        let line = Line::from(vec![
            Span::from(prompt).yellow(),
            Span::from(uidata.cmdinput.input.clone()),
        ]);
        frame.render_widget(Paragraph::new(line), area);
        frame.set_cursor_position((
            std::cmp::min(area.x.saturating_add(cursor_x), area.right().saturating_sub(1)),
            area.y,
        ));
    } else {
        frame.render_widget(Paragraph::new(uidata.status_message.as_str()), area);
    }
}

fn render_popup(message: &str, frame: &mut Frame) {
    let area = centered_rect(60, 70, frame.area());
    let block = Block::bordered()
        .title(Line::from(" Help ".bold()).centered())
        .title_bottom(Line::from(vec![" Close ".into(), "<Esc> ".blue().bold()]).centered())
        .border_set(border::THICK);

    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(message).block(block), area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
