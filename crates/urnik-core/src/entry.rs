//! Builders turning a raw sub-entry into a typed [`EntryKind`].
//!
//! A lesson sub-entry looks like
//!
//! ```text
//! <div>
//!   <table><tr><td><span title="Matematika">MAT</span> <img title="..."></td></tr>
//!          <tr><td><div title="Janez Novak">NOVAK, U12</div>
//!                  <div>Skupina 1</div></td></tr></table>
//! </div>
//! ```
//!
//! Only a missing primary cell is an error; every other absent field becomes
//! an empty string or an empty list.

use crate::dom::{Content, Node, normalize_ws};
use crate::error::EntryError;
use crate::event_kind::EventKind;
use crate::model::{EntryKind, Teacher};
use crate::types::View;

/// Builds the entry shape for `view`, dispatching on the event kind.
pub fn build_entry<N: Node>(
    node: &N,
    event: Option<EventKind>,
    view: View,
) -> Result<EntryKind, EntryError> {
    match (event, view) {
        (Some(EventKind::OfficeHours), _) => office_hours(node),
        (Some(EventKind::GenericEvent), View::Class) => {
            let (title, description) = event_texts(node);
            Ok(EntryKind::Event { title, description })
        }
        (Some(EventKind::GenericEvent), View::Limited) => {
            let (title, description) = event_texts(node);
            Ok(EntryKind::LimitedEvent { title, description })
        }
        (_, View::Class) => class_entry(node),
        (_, View::Limited) => limited_entry(node),
    }
}

fn primary_cell<N: Node>(node: &N) -> Result<N, EntryError> {
    node.find_tag("td").ok_or(EntryError::MissingPrimaryCell)
}

fn trimmed_attr<N: Node>(node: &N, name: &str) -> Option<String> {
    node.attr(name)
        .map(normalize_ws)
        .filter(|value| !value.is_empty())
}

/// First non-blank text directly inside `node`, ignoring nested elements.
fn first_own_text<N: Node>(node: &N) -> String {
    node.contents()
        .into_iter()
        .find_map(|c| match c {
            Content::Text(t) if !t.trim().is_empty() => Some(normalize_ws(&t)),
            _ => None,
        })
        .unwrap_or_default()
}

/// Teacher and classroom from the first line below the subject.
///
/// The line's `title` holds the full name, its text `SHORT, CLASSROOM`.
fn teacher_line<N: Node>(lines: &[N]) -> (Teacher, String) {
    let Some(line) = lines.first() else {
        return (Teacher::default(), String::new());
    };
    let text = normalize_ws(&line.text());
    let (short_name, classroom) = match text.split_once(',') {
        Some((short, room)) => (short.trim().to_string(), room.trim().to_string()),
        None => (text, String::new()),
    };
    let teacher = Teacher {
        name: trimmed_attr(line, "title").unwrap_or_default(),
        short_name,
    };
    (teacher, classroom)
}

fn group_names<N: Node>(lines: &[N]) -> Vec<String> {
    lines
        .iter()
        .skip(1)
        .map(|line| normalize_ws(&line.text()))
        .filter(|name| !name.is_empty())
        .collect()
}

/// Lesson in a single-class view.
pub fn class_entry<N: Node>(node: &N) -> Result<EntryKind, EntryError> {
    let primary = primary_cell(node)?;
    let subject_short = normalize_ws(&primary.text());
    let subject = primary
        .find_tag("span")
        .and_then(|span| trimmed_attr(&span, "title"))
        .unwrap_or_else(|| subject_short.clone());

    let lines = node.find_all_tag("div");
    let (teacher, classroom) = teacher_line(&lines);

    Ok(EntryKind::Class {
        subject,
        subject_short,
        teacher,
        classroom,
        groups: group_names(&lines),
    })
}

/// Lesson in a classroom or school-wide view: the primary text is the class name.
pub fn limited_entry<N: Node>(node: &N) -> Result<EntryKind, EntryError> {
    let primary = primary_cell(node)?;
    let lines = node.find_all_tag("div");
    let (teacher, _) = teacher_line(&lines);

    Ok(EntryKind::Limited {
        class_name: normalize_ws(&primary.text()),
        teacher,
        groups: group_names(&lines),
    })
}

/// Title and free-text description of a generic event.
///
/// The description is the text outside the marker element and the title table.
fn event_texts<N: Node>(node: &N) -> (String, String) {
    let title = node
        .find_tag("td")
        .map(|td| normalize_ws(&td.text()))
        .or_else(|| node.first_text())
        .unwrap_or_default();

    let mut marker_skipped = false;
    let mut description = String::new();
    for content in node.contents() {
        match content {
            Content::Text(text) => description.push_str(&text),
            Content::Element(_) if !marker_skipped => marker_skipped = true,
            Content::Element(el) if el.tag() == "table" => {}
            Content::Element(el) => description.push_str(&el.text()),
        }
    }

    (title, normalize_ws(&description))
}

/// Teacher and classroom from `Teacher (Classroom)` or `Name (Teacher, Classroom)`.
pub fn parse_office_hours_line(text: &str) -> (String, String) {
    let text = normalize_ws(text);
    let Some((head, rest)) = text.split_once('(') else {
        return (text, String::new());
    };
    let inner = rest.trim_end().trim_end_matches(')').trim();
    match inner.split_once(',') {
        Some((teacher, classroom)) => (teacher.trim().to_string(), classroom.trim().to_string()),
        None => (head.trim().to_string(), inner.to_string()),
    }
}

/// Office hours: a title line, an optional `em` description and a `span`
/// naming teacher and classroom. Groups never apply.
pub fn office_hours<N: Node>(node: &N) -> Result<EntryKind, EntryError> {
    let primary = node.find_tag("td").unwrap_or_else(|| node.clone());
    let line = primary
        .find_tag("span")
        .ok_or(EntryError::MissingOfficeHoursLine)?;
    let (teacher, classroom) = parse_office_hours_line(&line.text());
    let description = primary
        .find_tag("em")
        .map(|em| normalize_ws(&em.text()))
        .unwrap_or_default();

    Ok(EntryKind::OfficeHours {
        title: first_own_text(&primary),
        description,
        teacher: Teacher {
            name: teacher,
            short_name: String::new(),
        },
        classroom,
    })
}
