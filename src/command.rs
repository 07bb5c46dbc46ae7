use std::str::FromStr;

use crate::export::ExportFormat;
use crate::record::{DisplayField, Field, JobStatus, NewJobRequest, Priority};

/// A line typed into the `:` command prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Sort(String),
    Filter(Field, String),
    Search(String),
    Toggle(DisplayField),
    Select(u64),
    Add(NewJobRequest),
    Column,
    Export(ExportFormat),
    Quit,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (verb, rest) = match s.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (s, ""),
        };

        match verb {
            "sort" if !rest.is_empty() => Ok(Command::Sort(rest.to_string())),
            "filter" => {
                let (key, value) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
                match Field::from_key(key) {
                    Some(field @ (Field::Status | Field::Priority | Field::Submitter)) => {
                        Ok(Command::Filter(field, value.trim().to_string()))
                    }
                    _ => Err(format!("cannot filter on \"{key}\"")),
                }
            }
            "search" => Ok(Command::Search(rest.to_string())),
            "toggle" => DisplayField::from_label(rest)
                .map(Command::Toggle)
                .ok_or_else(|| format!("unknown column \"{rest}\"")),
            "select" => rest
                .parse::<u64>()
                .map(Command::Select)
                .map_err(|_| format!("invalid row id \"{rest}\"")),
            "add" => parse_new_row(rest).map(Command::Add),
            "column" => Ok(Command::Column),
            "export" => rest.parse().map(Command::Export),
            "quit" | "q" => Ok(Command::Quit),
            "" => Err("empty command".to_string()),
            _ => Err(format!("unknown command \"{s}\"")),
        }
    }
}

/// Parses `title | submitter | assigned | priority | due date | est. value`.
/// Only the title is required. New rows start as "Need to start".
pub fn parse_new_row(input: &str) -> Result<NewJobRequest, String> {
    let mut parts = input.split('|').map(str::trim);
    let title = parts.next().unwrap_or_default();
    if title.is_empty() {
        return Err("a new row needs a title".to_string());
    }
    let submitter = parts.next().unwrap_or_default();
    let assigned = parts.next().unwrap_or_default();
    let priority = match parts.next() {
        Some(p) if !p.is_empty() => p.parse::<Priority>()?,
        _ => Priority::Medium,
    };
    let due_date = parts.next().unwrap_or_default();
    let est_value = parts.next().unwrap_or_default();
    if parts.next().is_some() {
        return Err("too many fields for a new row".to_string());
    }

    let mut row = NewJobRequest::new(title, JobStatus::NeedToStart, priority);
    row.submitter = submitter.to_string();
    row.assigned = assigned.to_string();
    row.due_date = due_date.to_string();
    row.est_value = est_value.to_string();
    Ok(row)
}
