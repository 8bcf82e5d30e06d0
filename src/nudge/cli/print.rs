use chrono::{TimeZone, Utc};
use colored::{ColoredString, Colorize};
use nudge::api::{CmdMessage, MessageLevel};
use nudge::config::{NudgeConfig, KEYS};
use nudge::model::{Priority, Reminder};
use timeago::Formatter;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const LINE_WIDTH: usize = 100;
const TIME_WIDTH: usize = 14;
const PRIORITY_MARKER: &str = "▌";

pub fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

pub fn print_config(config: &NudgeConfig) {
    for key in KEYS {
        if let Some(value) = config.get(key) {
            println!("{} = {}", key, value);
        }
    }
}

fn priority_marker(priority: Priority) -> ColoredString {
    match priority {
        Priority::VeryUrgent => PRIORITY_MARKER.red(),
        Priority::Urgent => PRIORITY_MARKER.yellow(),
        Priority::Normal => PRIORITY_MARKER.green(),
    }
}

pub fn print_reminders(reminders: &[Reminder]) {
    if reminders.is_empty() {
        println!("No reminders yet");
        return;
    }

    for (i, reminder) in reminders.iter().enumerate() {
        let idx_str = format!("{}. ", i + 1);
        let check = if reminder.done { "[x] " } else { "[ ] " };
        let id_str = format!(" {}", reminder.short_id());
        let time_ago = format_time_ago(reminder.created_at);

        let fixed_width = 2
            + idx_str.width()
            + check.width()
            + id_str.width()
            + TIME_WIDTH;
        let available = LINE_WIDTH.saturating_sub(fixed_width);
        let text: String = reminder
            .text
            .chars()
            .map(|c| if c == '\n' { ' ' } else { c })
            .collect();
        let text_display = truncate_to_width(&text, available);
        let padding = available.saturating_sub(text_display.width());

        let text_colored = if reminder.done {
            text_display.dimmed().strikethrough()
        } else {
            text_display.normal()
        };

        println!(
            "{} {}{}{}{}{}{}",
            priority_marker(reminder.priority),
            idx_str,
            check,
            text_colored,
            " ".repeat(padding),
            id_str.dimmed(),
            time_ago.dimmed()
        );
    }
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }

    result
}

fn format_time_ago(created_at_millis: i64) -> String {
    let created = Utc
        .timestamp_millis_opt(created_at_millis)
        .single()
        .unwrap_or_else(Utc::now);
    let duration = Utc::now().signed_duration_since(created);
    let time_str = Formatter::new().convert(duration.to_std().unwrap_or_default());
    format!("{:>width$}", time_str, width = TIME_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_with_ellipsis() {
        assert_eq!(truncate_to_width("hello", 10), "hello");
        assert_eq!(truncate_to_width("hello world", 6), "hello…");
    }

    #[test]
    fn text_that_fits_exactly_is_kept_whole() {
        assert_eq!(truncate_to_width("hello", 5), "hello");
        assert_eq!(truncate_to_width("hello!", 5), "hell…");
    }

    #[test]
    fn time_ago_is_right_aligned() {
        let formatted = format_time_ago(Utc::now().timestamp_millis());
        assert_eq!(formatted.width(), TIME_WIDTH);
        assert!(formatted.starts_with(' '));
    }
}
