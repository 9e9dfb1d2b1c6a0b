//! Required tag checks.

use eventaudit_core::{Issue, IssueKind, Tags};

/// Tags every bus and rule is expected to carry
pub const REQUIRED_TAGS: [&str; 2] = ["Application", "Owner"];

/// Keys from `required` absent in `tags`, in `required` order.
///
/// Matching is case-sensitive: `owner` does not satisfy `Owner`.
pub fn missing_required_tags<S: AsRef<str>>(tags: &Tags, required: &[S]) -> Vec<String> {
    required
        .iter()
        .map(AsRef::as_ref)
        .filter(|key| !tags.contains_key(key))
        .map(str::to_string)
        .collect()
}

/// One `missing_required_tags` issue listing every absent key, if any
pub fn check_required_tags<S: AsRef<str>>(tags: &Tags, required: &[S]) -> Option<Issue> {
    let missing = missing_required_tags(tags, required);
    if missing.is_empty() {
        return None;
    }
    Some(Issue::new(
        IssueKind::MissingRequiredTags,
        format!("missing required tags: {}", missing.join(", ")),
    ))
}
