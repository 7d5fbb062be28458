//! Subcommand implementations and the table helpers they share.

pub mod analyze;
pub mod chat;
pub mod courses;
pub mod init;
pub mod progress;
pub mod questions;
pub mod quiz;
pub mod subjects;
pub mod validate;

use comfy_table::{Cell, Table};

use eduflex_core::model::{CourseEntry, TaggedCourse};

/// Render courses as a table, or a short note when there are none.
pub(crate) fn course_table(courses: &[CourseEntry]) -> String {
    if courses.is_empty() {
        return "No matching courses found.".to_string();
    }

    let mut table = Table::new();
    table.set_header(vec!["Course", "Rating", "Category", "Level", "Link"]);
    for course in courses {
        table.add_row(vec![
            Cell::new(&course.name),
            Cell::new(format!("{:.1}", course.rating)),
            Cell::new(&course.category),
            Cell::new(course.level.as_deref().unwrap_or("-")),
            Cell::new(&course.link),
        ]);
    }
    table.to_string()
}

/// Like [`course_table`], with the weak subject that produced each course.
pub(crate) fn tagged_course_table(courses: &[TaggedCourse]) -> String {
    if courses.is_empty() {
        return "No matching courses found.".to_string();
    }

    let mut table = Table::new();
    table.set_header(vec!["Subject", "Course", "Rating", "Link"]);
    for tagged in courses {
        table.add_row(vec![
            Cell::new(if tagged.subject.is_empty() { "-" } else { tagged.subject.as_str() }),
            Cell::new(&tagged.course.name),
            Cell::new(format!("{:.1}", tagged.course.rating)),
            Cell::new(&tagged.course.link),
        ]);
    }
    table.to_string()
}
