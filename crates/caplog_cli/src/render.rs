//! Terminal rendering for journal entries.
//!
//! One flag-marked line per entry; multi-line entries keep their text
//! aligned under the first text column.

use caplog_core::Entry;
use colored::Colorize;

// "🚩" renders two columns wide, plus the two-space gaps around the
// 16-char timestamp.
const CONTINUATION_INDENT: usize = 2 + 2 + 16 + 2;

/// Renders one entry as a display block (no trailing newline).
pub fn entry_line(entry: &Entry) -> String {
    let mut lines = entry.text.lines();
    let first = lines.next().unwrap_or_default();
    let mut rendered = format!("🚩  {}  {}", entry.local_time.cyan(), first);

    for line in lines {
        rendered.push('\n');
        rendered.push_str(&" ".repeat(CONTINUATION_INDENT));
        rendered.push_str(line);
    }

    rendered
}

/// Prints entries in the order given, one block per entry.
pub fn print_entries(entries: &[Entry]) {
    for entry in entries {
        println!("{}", entry_line(entry));
    }
}
