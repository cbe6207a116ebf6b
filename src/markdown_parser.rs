use crate::todo::TodoItem;
use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};
use regex::Regex;
use std::sync::LazyLock;

/// Trailing ` (#123)` issue reference on an item's text.
static ISSUE_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s+\(#([0-9]+)\)\s*$").expect("issue suffix pattern must compile")
});

/// A list item that has been opened but not yet closed while walking the event stream.
struct OpenItem {
    /// Output position reserved when the item turned out to be a task.
    slot: Option<usize>,
    is_checked: bool,
    text: String,
    /// Set once the block holding the checkbox has ended; later blocks of the item are not its text.
    text_complete: bool,
}

impl OpenItem {
    fn push_text(&mut self, text: &str) {
        if !self.text_complete {
            self.text.push_str(text);
        }
    }

    fn complete_text(&mut self) {
        if self.slot.is_some() {
            self.text_complete = true;
        }
    }
}

/// Parses markdown and returns every task-list item in document order.
///
/// Nested task lists are flattened, inline formatting is reduced to its plain text and
/// only the paragraph holding an item's checkbox counts as its text. Anything that is not a task item (headings, prose, plain bullets, code blocks) is ignored.
/// Items whose text is empty after trimming are dropped.
pub fn parse_todo_markdown(content: &str) -> Vec<TodoItem> {
    let mut open_items: Vec<OpenItem> = Vec::new();
    let mut slots: Vec<Option<TodoItem>> = Vec::new();
    let mut code_block_depth = 0usize;

    let parser = Parser::new_ext(
        content,
        Options::ENABLE_TASKLISTS | Options::ENABLE_STRIKETHROUGH,
    );

    for event in parser {
        match event {
            Event::Start(Tag::Item) => open_items.push(OpenItem {
                slot: None,
                is_checked: false,
                text: String::new(),
                text_complete: false,
            }),
            Event::TaskListMarker(checked) => {
                if let Some(item) = open_items.last_mut().filter(|item| item.slot.is_none()) {
                    item.slot = Some(slots.len());
                    item.is_checked = checked;
                    slots.push(None);
                }
            }
            Event::Start(Tag::CodeBlock(_)) => code_block_depth += 1,
            Event::End(TagEnd::CodeBlock) => code_block_depth = code_block_depth.saturating_sub(1),
            Event::Text(text) | Event::Code(text) if code_block_depth == 0 => {
                if let Some(item) = open_items.last_mut() {
                    item.push_text(&text);
                }
            }
            Event::SoftBreak | Event::HardBreak => {
                if let Some(item) = open_items.last_mut() {
                    item.push_text(" ");
                }
            }
            Event::End(TagEnd::Paragraph) | Event::Start(Tag::List(_)) => {
                if let Some(item) = open_items.last_mut() {
                    item.complete_text();
                }
            }
            Event::End(TagEnd::Item) => {
                if let Some(OpenItem {
                    slot: Some(slot),
                    is_checked,
                    text,
                    ..
                }) = open_items.pop()
                {
                    slots[slot] = build_item(&text, is_checked);
                }
            }
            _ => {}
        }
    }

    slots.into_iter().flatten().collect()
}

fn build_item(raw_text: &str, is_checked: bool) -> Option<TodoItem> {
    let trimmed = raw_text.trim();
    if trimmed.is_empty() {
        return None;
    }
    let (text, issue_number) = extract_issue_number(trimmed);
    Some(TodoItem {
        text,
        is_checked,
        issue_number,
    })
}

/// Splits a trailing ` (#N)` reference off `text`.
///
/// Anything else, including `(# 123)`, `(#abc)` or a number that overflows `u64`, is left
/// in the text and yields no issue number.
pub fn extract_issue_number(text: &str) -> (String, Option<u64>) {
    ISSUE_SUFFIX
        .captures(text)
        .and_then(|captures| {
            let suffix = captures.get(0)?;
            let number = captures[1].parse::<u64>().ok()?;
            Some((text[..suffix.start()].trim().to_string(), Some(number)))
        })
        .unwrap_or_else(|| (text.to_string(), None))
}

pub fn serialize_todo_markdown(items: &[TodoItem]) -> String {
    items
        .iter()
        .map(|item| {
            let checkbox = if item.is_checked { "[x]" } else { "[ ]" };
            let text = if let Some(issue_number) = item.issue_number {
                format!("{} (#{issue_number})", item.text)
            } else {
                item.text.clone()
            };
            format!("- {checkbox} {text}\n")
        })
        .collect()
}
