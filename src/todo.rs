/// One task-list line of `TODO.md`.
///
/// `text` never carries the ` (#N)` suffix; that lives in `issue_number`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoItem {
    pub text: String,
    pub is_checked: bool,
    pub issue_number: Option<u64>,
}

impl TodoItem {
    pub fn new(text: impl Into<String>, is_checked: bool, issue_number: Option<u64>) -> Self {
        TodoItem {
            text: text.into(),
            is_checked,
            issue_number,
        }
    }
}
