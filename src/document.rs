//! Document model builder – groups entries into ordered sections and resolves
//! every derived line (date range, hours, bullets) once, so the raster and
//! structured backends format identically.

use serde::Serialize;

use crate::model::{Category, Entry, ResumeData, StudentProfile};

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Normalized header fields. Empty strings become `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HeaderRecord {
    pub name: Option<String>,
    pub grade: Option<String>,
    pub school: Option<String>,
    pub email: Option<String>,
    pub gpa: Option<String>,
    pub interests: Option<String>,
}

impl HeaderRecord {
    pub fn from_profile(profile: &StudentProfile) -> Self {
        Self {
            name: non_empty(&profile.name),
            grade: non_empty(&profile.grade),
            school: non_empty(&profile.school),
            email: non_empty(&profile.email),
            gpa: non_empty(&profile.gpa),
            interests: non_empty(&profile.interests),
        }
    }

    /// `GPA: …  Interests: …`, or `None` when neither is set.
    pub fn summary_line(&self) -> Option<String> {
        let mut parts = Vec::new();
        if let Some(gpa) = &self.gpa {
            parts.push(format!("GPA: {gpa}"));
        }
        if let Some(interests) = &self.interests {
            parts.push(format!("Interests: {interests}"));
        }
        (!parts.is_empty()).then(|| parts.join("  "))
    }
}

/// One entry with all of its printable lines resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntryView {
    pub title: String,
    pub organization: Option<String>,
    pub date_range: Option<String>,
    pub hours: Option<String>,
    pub bullets: Vec<String>,
}

impl EntryView {
    pub fn from_entry(entry: &Entry) -> Self {
        Self {
            title: entry.title.trim().to_string(),
            organization: non_empty(&entry.organization),
            date_range: format_date_range(&entry.start_date, &entry.end_date),
            hours: format_hours(&entry.hours_per_week, &entry.weeks_per_year),
            bullets: resolve_bullets(entry),
        }
    }
}

/// A run of entries sharing one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    pub category: Category,
    pub label: &'static str,
    pub entries: Vec<EntryView>,
}

/// The complete, template-independent document.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DocumentModel {
    pub header: HeaderRecord,
    pub sections: Vec<Section>,
}

impl DocumentModel {
    pub fn entry_count(&self) -> usize {
        self.sections.iter().map(|s| s.entries.len()).sum()
    }
}

/// Group visible entries by category in catalog order.
///
/// Entries keep their supplied order inside a section; categories without a
/// visible entry produce no section.
pub fn build_document(data: &ResumeData) -> DocumentModel {
    let sections = Category::ALL
        .iter()
        .filter_map(|&category| {
            let entries: Vec<EntryView> = data
                .visible_entries()
                .filter(|e| e.category == category)
                .map(EntryView::from_entry)
                .collect();
            (!entries.is_empty()).then(|| Section {
                category,
                label: category.label(),
                entries,
            })
        })
        .collect();

    DocumentModel {
        header: HeaderRecord::from_profile(&data.profile),
        sections,
    }
}

/// Explicit bullets win; otherwise the description becomes the only bullet.
pub fn resolve_bullets(entry: &Entry) -> Vec<String> {
    if !entry.bullets.is_empty() {
        entry.bullets.clone()
    } else if !entry.description.trim().is_empty() {
        vec![entry.description.clone()]
    } else {
        Vec::new()
    }
}

/// `2022-09` → `Sep 2022`. A trailing day (`2023-05-01`) is ignored. Values
/// of any other shape pass through as-is.
pub fn format_month(value: &str) -> String {
    let value = value.trim();
    let mut parts = value.split('-');
    let parsed = match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(y), Some(m), day, None) => {
            let month: usize = m.parse().unwrap_or(0);
            let year_ok = y.len() == 4 && y.chars().all(|c| c.is_ascii_digit());
            let day_ok = day.map_or(true, |d| {
                (1..=2).contains(&d.len()) && d.chars().all(|c| c.is_ascii_digit())
            });
            (year_ok && day_ok && (1..=12).contains(&month))
                .then(|| format!("{} {y}", MONTHS[month - 1]))
        }
        _ => None,
    };
    parsed.unwrap_or_else(|| {
        log::warn!("date {value:?} is not YYYY-MM; rendering verbatim");
        value.to_string()
    })
}

/// Date range shown beside an entry title.
///
/// | start | end | result |
/// |---|---|---|
/// | set | set | `Mon YYYY – Mon YYYY` |
/// | set | empty | `Mon YYYY – Present` |
/// | empty | set | `Mon YYYY` |
/// | empty | empty | omitted |
pub fn format_date_range(start: &str, end: &str) -> Option<String> {
    match (start.trim().is_empty(), end.trim().is_empty()) {
        (false, false) => Some(format!("{} – {}", format_month(start), format_month(end))),
        (false, true) => Some(format!("{} – Present", format_month(start))),
        (true, false) => Some(format_month(end)),
        (true, true) => None,
    }
}

pub fn format_hours(hours_per_week: &str, weeks_per_year: &str) -> Option<String> {
    let hours = hours_per_week.trim();
    if hours.is_empty() {
        return None;
    }
    let weeks = weeks_per_year.trim();
    Some(if weeks.is_empty() {
        format!("{hours} hrs/wk")
    } else {
        format!("{hours} hrs/wk · {weeks} wks/yr")
    })
}

fn non_empty(s: &str) -> Option<String> {
    let t = s.trim();
    (!t.is_empty()).then(|| t.to_string())
}
