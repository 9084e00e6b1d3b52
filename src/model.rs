//! Input data model – the profile and entry records handed to the engine by
//! the UI/storage layer.
//!
//! The serde shape matches the application's backup JSON (camelCase keys,
//! `type` for the category, `org` for the organisation), so a backup file can
//! be rendered as-is.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ForgeError;

/// Entry categories in the order their sections appear on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Category {
    Education,
    Coursework,
    Award,
    Activity,
    Sport,
    Volunteer,
    Work,
    Project,
    Skill,
    Certification,
}

impl Category {
    /// The full catalog, in section order.
    pub const ALL: [Category; 10] = [
        Category::Education,
        Category::Coursework,
        Category::Award,
        Category::Activity,
        Category::Sport,
        Category::Volunteer,
        Category::Work,
        Category::Project,
        Category::Skill,
        Category::Certification,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Education => "Education",
            Category::Coursework => "Coursework",
            Category::Award => "Award",
            Category::Activity => "Activity",
            Category::Sport => "Sport",
            Category::Volunteer => "Volunteer",
            Category::Work => "Work",
            Category::Project => "Project",
            Category::Skill => "Skill",
            Category::Certification => "Certification",
        }
    }

    /// Section heading label.
    pub fn label(self) -> &'static str {
        match self {
            Category::Education => "Education",
            Category::Coursework => "Relevant Coursework",
            Category::Award => "Honors & Awards",
            Category::Activity => "Activities",
            Category::Sport => "Athletics",
            Category::Volunteer => "Community Service",
            Category::Work => "Work Experience",
            Category::Project => "Projects",
            Category::Skill => "Skills",
            Category::Certification => "Certifications",
        }
    }
}

impl FromStr for Category {
    type Err = ForgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| ForgeError::UnknownCategory(s.to_string()))
    }
}

impl TryFrom<String> for Category {
    type Error = ForgeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Category> for String {
    fn from(c: Category) -> Self {
        c.as_str().to_string()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The student's header details. Every field is optional free text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StudentProfile {
    pub name: String,
    pub grade: String,
    pub school: String,
    pub interests: String,
    pub gpa: String,
    pub email: String,
}

/// One resume line item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type")]
    pub category: Category,
    #[serde(default)]
    pub title: String,
    #[serde(default, rename = "org")]
    pub organization: String,
    /// `YYYY-MM`, or empty.
    #[serde(default)]
    pub start_date: String,
    /// `YYYY-MM`, or empty for "ongoing".
    #[serde(default)]
    pub end_date: String,
    #[serde(default, rename = "hrsPerWeek")]
    pub hours_per_week: String,
    #[serde(default)]
    pub weeks_per_year: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub bullets: Vec<String>,
    /// Hidden entries are left out of every export.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub hidden: bool,
}

impl Entry {
    pub fn new(category: Category, title: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            category,
            title: title.into(),
            organization: String::new(),
            start_date: String::new(),
            end_date: String::new(),
            hours_per_week: String::new(),
            weeks_per_year: String::new(),
            description: String::new(),
            bullets: Vec::new(),
            hidden: false,
        }
    }

    pub fn with_bullets<I, S>(mut self, bullets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.bullets = bullets.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_dates(mut self, start: &str, end: &str) -> Self {
        self.start_date = start.to_string();
        self.end_date = end.to_string();
        self
    }
}

/// Everything a render call consumes: one profile and its entries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumeData {
    #[serde(default)]
    pub profile: StudentProfile,
    #[serde(default)]
    pub entries: Vec<Entry>,
}

impl ResumeData {
    /// Parse the backup JSON shape. Entries with a category outside the
    /// catalog reject the whole document.
    pub fn from_json(json: &str) -> Result<Self, ForgeError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Entries that take part in rendering, in the order they were supplied.
    pub fn visible_entries(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter().filter(|e| !e.hidden)
    }
}
