use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobStatus {
    #[serde(rename = "In-process")]
    InProcess,
    #[serde(rename = "Need to start")]
    NeedToStart,
    Complete,
    Blocked,
}

impl JobStatus {
    pub const ALL: [JobStatus; 4] = [
        JobStatus::InProcess,
        JobStatus::NeedToStart,
        JobStatus::Complete,
        JobStatus::Blocked,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::InProcess => "In-process",
            JobStatus::NeedToStart => "Need to start",
            JobStatus::Complete => "Complete",
            JobStatus::Blocked => "Blocked",
        }
    }

    /// Style tag attached to new records with this status.
    pub fn color_tag(&self) -> &'static str {
        match self {
            JobStatus::InProcess => "bg-[#fff3d6] text-[#84640a]",
            JobStatus::NeedToStart => "bg-slate-200 text-slate-600",
            JobStatus::Complete => "bg-[#d2f2e2] text-[#0a6d3c]",
            JobStatus::Blocked => "bg-[#ffe1dd] text-[#c12119]",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        JobStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown status \"{s}\""))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }

    pub fn color_tag(&self) -> &'static str {
        match self {
            Priority::High => "text-[#ef4c43]",
            Priority::Medium => "text-[#c1920f]",
            Priority::Low => "text-[#1a8cff]",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Priority::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown priority \"{s}\""))
    }
}

/// One row of the sheet. Field declaration order is the export column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRequest {
    pub id: u64,
    pub title: String,
    pub submitted_date: String,
    pub status: JobStatus,
    pub status_color: String,
    pub submitter: String,
    pub url: String,
    pub assigned: String,
    pub priority: Priority,
    pub priority_color: String,
    pub due_date: String,
    pub est_value: String,
}

impl JobRequest {
    /// String representation of a single field, as used by search, filter, sort and export.
    pub fn value(&self, field: Field) -> Cow<'_, str> {
        match field {
            Field::Id => Cow::Owned(self.id.to_string()),
            Field::Title => Cow::Borrowed(&self.title),
            Field::SubmittedDate => Cow::Borrowed(&self.submitted_date),
            Field::Status => Cow::Borrowed(self.status.as_str()),
            Field::StatusColor => Cow::Borrowed(&self.status_color),
            Field::Submitter => Cow::Borrowed(&self.submitter),
            Field::Url => Cow::Borrowed(&self.url),
            Field::Assigned => Cow::Borrowed(&self.assigned),
            Field::Priority => Cow::Borrowed(self.priority.as_str()),
            Field::PriorityColor => Cow::Borrowed(&self.priority_color),
            Field::DueDate => Cow::Borrowed(&self.due_date),
            Field::EstValue => Cow::Borrowed(&self.est_value),
        }
    }
}

/// A record that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewJobRequest {
    pub title: String,
    pub submitted_date: String,
    pub status: JobStatus,
    pub status_color: String,
    pub submitter: String,
    pub url: String,
    pub assigned: String,
    pub priority: Priority,
    pub priority_color: String,
    pub due_date: String,
    pub est_value: String,
}

impl NewJobRequest {
    pub fn new(title: impl Into<String>, status: JobStatus, priority: Priority) -> Self {
        Self {
            title: title.into(),
            submitted_date: String::new(),
            status,
            status_color: status.color_tag().to_string(),
            submitter: String::new(),
            url: String::new(),
            assigned: String::new(),
            priority,
            priority_color: priority.color_tag().to_string(),
            due_date: String::new(),
            est_value: String::new(),
        }
    }

    pub fn with_id(self, id: u64) -> JobRequest {
        JobRequest {
            id,
            title: self.title,
            submitted_date: self.submitted_date,
            status: self.status,
            status_color: self.status_color,
            submitter: self.submitter,
            url: self.url,
            assigned: self.assigned,
            priority: self.priority,
            priority_color: self.priority_color,
            due_date: self.due_date,
            est_value: self.est_value,
        }
    }
}

/// Internal record keys, in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    Id,
    Title,
    SubmittedDate,
    Status,
    StatusColor,
    Submitter,
    Url,
    Assigned,
    Priority,
    PriorityColor,
    DueDate,
    EstValue,
}

impl Field {
    pub const ALL: [Field; 12] = [
        Field::Id,
        Field::Title,
        Field::SubmittedDate,
        Field::Status,
        Field::StatusColor,
        Field::Submitter,
        Field::Url,
        Field::Assigned,
        Field::Priority,
        Field::PriorityColor,
        Field::DueDate,
        Field::EstValue,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Field::Id => "id",
            Field::Title => "title",
            Field::SubmittedDate => "submittedDate",
            Field::Status => "status",
            Field::StatusColor => "statusColor",
            Field::Submitter => "submitter",
            Field::Url => "url",
            Field::Assigned => "assigned",
            Field::Priority => "priority",
            Field::PriorityColor => "priorityColor",
            Field::DueDate => "dueDate",
            Field::EstValue => "estValue",
        }
    }

    pub fn from_key(key: &str) -> Option<Field> {
        Field::ALL.into_iter().find(|f| f.key() == key)
    }

    pub fn is_sortable(&self) -> bool {
        matches!(
            self,
            Field::Title
                | Field::SubmittedDate
                | Field::Status
                | Field::Submitter
                | Field::Assigned
                | Field::Priority
                | Field::DueDate
                | Field::EstValue
        )
    }
}

/// Column names as shown in the grid. Each maps to exactly one record key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DisplayField {
    Title,
    Submitted,
    Status,
    Submitter,
    Url,
    Assigned,
    Priority,
    DueDate,
    EstValue,
}

impl DisplayField {
    pub const ALL: [DisplayField; 9] = [
        DisplayField::Title,
        DisplayField::Submitted,
        DisplayField::Status,
        DisplayField::Submitter,
        DisplayField::Url,
        DisplayField::Assigned,
        DisplayField::Priority,
        DisplayField::DueDate,
        DisplayField::EstValue,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            DisplayField::Title => "Job Request",
            DisplayField::Submitted => "Submitted",
            DisplayField::Status => "Status",
            DisplayField::Submitter => "Submitter",
            DisplayField::Url => "URL",
            DisplayField::Assigned => "Assigned",
            DisplayField::Priority => "Priority",
            DisplayField::DueDate => "Due Date",
            DisplayField::EstValue => "Est. Value",
        }
    }

    pub fn from_label(label: &str) -> Option<DisplayField> {
        let label = label.trim();
        DisplayField::ALL
            .into_iter()
            .find(|d| d.label().eq_ignore_ascii_case(label))
    }

    pub fn field(&self) -> Field {
        match self {
            DisplayField::Title => Field::Title,
            DisplayField::Submitted => Field::SubmittedDate,
            DisplayField::Status => Field::Status,
            DisplayField::Submitter => Field::Submitter,
            DisplayField::Url => Field::Url,
            DisplayField::Assigned => Field::Assigned,
            DisplayField::Priority => Field::Priority,
            DisplayField::DueDate => Field::DueDate,
            DisplayField::EstValue => Field::EstValue,
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn seed(
    id: u64,
    title: &str,
    submitted_date: &str,
    status: JobStatus,
    submitter: &str,
    url: &str,
    assigned: &str,
    priority: Priority,
    due_date: &str,
    est_value: &str,
) -> JobRequest {
    JobRequest {
        id,
        title: title.to_string(),
        submitted_date: submitted_date.to_string(),
        status,
        status_color: status.color_tag().to_string(),
        submitter: submitter.to_string(),
        url: url.to_string(),
        assigned: assigned.to_string(),
        priority,
        priority_color: priority.color_tag().to_string(),
        due_date: due_date.to_string(),
        est_value: est_value.to_string(),
    }
}

/// The starter list the sheet opens with when no data file is given.
pub fn seed_data() -> Vec<JobRequest> {
    vec![
        seed(
            1,
            "Launch social media campaign for product XYZ",
            "15-11-2024",
            JobStatus::InProcess,
            "Aisha Patel",
            "www.aishapatel.com",
            "Sophie Choudhury",
            Priority::Medium,
            "20-11-2024",
            "6,200,000",
        ),
        seed(
            2,
            "Update press kit for company redesign",
            "28-10-2024",
            JobStatus::NeedToStart,
            "Irfan Khan",
            "www.irfankhanportfolio.com",
            "Tejas Pandey",
            Priority::High,
            "30-10-2024",
            "3,500,000",
        ),
        seed(
            3,
            "Finalize user testing feedback for app update",
            "05-12-2024",
            JobStatus::InProcess,
            "Mark Johnson",
            "www.markjohnsondesigns.com",
            "Rachel Lee",
            Priority::Medium,
            "10-12-2024",
            "4,750,000",
        ),
        seed(
            4,
            "Design new features for the website",
            "10-01-2025",
            JobStatus::Complete,
            "Emily Green",
            "www.emilygreenart.com",
            "Tom Wright",
            Priority::Low,
            "15-01-2025",
            "5,900,000",
        ),
        seed(
            5,
            "Prepare financial report for Q4",
            "25-01-2025",
            JobStatus::Blocked,
            "Jessica Brown",
            "www.jessicabrowncreative.com",
            "Kevin Smith",
            Priority::Low,
            "30-01-2025",
            "2,800,000",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_has_five_records_with_sequential_ids() {
        let ids: Vec<u64> = seed_data().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn status_parses_display_strings() {
        assert_eq!("Need to start".parse::<JobStatus>(), Ok(JobStatus::NeedToStart));
        assert_eq!(" in-process ".parse::<JobStatus>(), Ok(JobStatus::InProcess));
        assert!("Done".parse::<JobStatus>().is_err());
        assert_eq!("low".parse::<Priority>(), Ok(Priority::Low));
    }

    #[test]
    fn value_renders_enums_and_id_as_text() {
        let record = &seed_data()[1];
        assert_eq!(record.value(Field::Id), "2");
        assert_eq!(record.value(Field::Status), "Need to start");
        assert_eq!(record.value(Field::Priority), "High");
        assert_eq!(record.value(Field::EstValue), "3,500,000");
    }

    #[test]
    fn display_labels_map_to_record_keys() {
        assert_eq!(DisplayField::from_label("Job Request"), Some(DisplayField::Title));
        assert_eq!(DisplayField::from_label("est. value"), Some(DisplayField::EstValue));
        assert_eq!(DisplayField::from_label("status"), Some(DisplayField::Status));
        assert_eq!(DisplayField::from_label("Colour"), None);
        assert_eq!(DisplayField::Submitted.field().key(), "submittedDate");
    }

    #[test]
    fn only_displayed_text_fields_are_sortable() {
        let sortable: Vec<&str> = Field::ALL
            .iter()
            .filter(|f| f.is_sortable())
            .map(|f| f.key())
            .collect();
        assert_eq!(
            sortable,
            vec![
                "title",
                "submittedDate",
                "status",
                "submitter",
                "assigned",
                "priority",
                "dueDate",
                "estValue"
            ]
        );
        assert_eq!(Field::from_key("statusColor"), Some(Field::StatusColor));
        assert_eq!(Field::from_key("colour"), None);
    }
}
