//! Plain-text export, for pasting into forms and editors.

use crate::model::{Entry, ResumeData};

/// One block per header line and per visible entry, separated by blank lines.
/// Entries appear in the order supplied, not grouped by section.
pub fn render_plain_text(data: &ResumeData) -> String {
    let profile = &data.profile;
    let name = profile.name.trim();
    let mut blocks = vec![if name.is_empty() {
        "STUDENT NAME".to_string()
    } else {
        name.to_uppercase()
    }];
    if !profile.school.trim().is_empty() {
        blocks.push(profile.school.trim().to_string());
    }
    if !profile.gpa.trim().is_empty() {
        blocks.push(format!("GPA: {}", profile.gpa.trim()));
    }
    blocks.extend(data.visible_entries().map(entry_block));
    blocks.join("\n\n")
}

fn entry_block(entry: &Entry) -> String {
    let mut head = format!("{}: {}", entry.category.as_str().to_uppercase(), entry.title);
    if !entry.organization.is_empty() {
        head.push_str(" | ");
        head.push_str(&entry.organization);
    }
    let mut lines = vec![head];
    if !entry.description.is_empty() {
        lines.push(format!("  {}", entry.description));
    }
    lines.extend(
        entry
            .bullets
            .iter()
            .filter(|b| !b.is_empty())
            .map(|b| format!("  • {b}")),
    );
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Category, StudentProfile};

    #[test]
    fn header_and_entries() {
        let mut robotics = Entry::new(Category::Activity, "Robotics Captain")
            .with_bullets(["Led 12 students to regionals"]);
        robotics.organization = "FRC".into();
        let mut award = Entry::new(Category::Award, "AP Scholar");
        award.description = "Scored 4+ on five exams".into();
        let data = ResumeData {
            profile: StudentProfile {
                name: "Alex Rivera".into(),
                gpa: "3.9".into(),
                ..Default::default()
            },
            entries: vec![robotics, award],
        };

        assert_eq!(
            render_plain_text(&data),
            "ALEX RIVERA\n\nGPA: 3.9\n\n\
             ACTIVITY: Robotics Captain | FRC\n  • Led 12 students to regionals\n\n\
             AWARD: AP Scholar\n  Scored 4+ on five exams"
        );
    }

    #[test]
    fn placeholder_and_hidden_entries() {
        let mut hidden = Entry::new(Category::Work, "Cashier");
        hidden.hidden = true;
        let data = ResumeData {
            profile: StudentProfile::default(),
            entries: vec![hidden],
        };
        assert_eq!(render_plain_text(&data), "STUDENT NAME");
    }
}
