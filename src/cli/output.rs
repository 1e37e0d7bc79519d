//! Output formatting utilities

use crate::application::CategoryUsage;
use crate::domain::Note;
use chrono::{DateTime, Local};

/// Longest title shown in a list row
const TITLE_WIDTH: usize = 40;

/// Render a millisecond timestamp in local time
pub fn format_timestamp(millis: i64) -> String {
    match DateTime::from_timestamp_millis(millis) {
        Some(time) => time
            .with_timezone(&Local)
            .format("%d-%m-%Y %H:%M")
            .to_string(),
        None => millis.to_string(),
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut short: String = text.chars().take(width - 1).collect();
    short.push('…');
    short
}

/// Format a list of notes for display
pub fn format_note_list(notes: &[Note]) -> String {
    if notes.is_empty() {
        return "No notes found".to_string();
    }

    let mut output = String::new();
    for note in notes {
        let title = if note.title.is_empty() {
            "(untitled)".to_string()
        } else {
            truncate(&note.title, TITLE_WIDTH)
        };
        output.push_str(&format!(
            "{:>5}  {}  {}\n",
            note.id,
            format_timestamp(note.modify_time),
            title
        ));
    }
    output
}

/// Format a single note with its metadata
pub fn format_note_detail(note: &Note) -> String {
    let mut output = format!("# {}\n", note.title);
    output.push_str(&format!("id:       {}\n", note.id));
    output.push_str(&format!("created:  {}\n", format_timestamp(note.create_time)));
    output.push_str(&format!("modified: {}\n", format_timestamp(note.modify_time)));
    if note.is_categorized() {
        output.push_str(&format!("category: {}\n", note.category_id));
    }
    output.push('\n');
    output.push_str(&note.content);
    if !note.content.ends_with('\n') {
        output.push('\n');
    }
    output
}

pub fn format_category_list(categories: &[CategoryUsage]) -> String {
    if categories.is_empty() {
        return "No categories found".to_string();
    }

    let mut output = String::new();
    for usage in categories {
        output.push_str(&format!(
            "{:>5}  {} ({})\n",
            usage.category.id, usage.category.name, usage.note_count
        ));
    }
    output
}
