/// One selectable rubric identifier with its display label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RubricOption {
    pub id: String,
    pub label: String,
    pub selected: bool,
}

/// Formats a rubric identifier for display.
///
/// Identifiers are underscore-joined token sequences whose first token is a
/// short code: `PAFIAST_School_of_Engineering` renders as
/// `School of Engineering - PAFIAST`. A single-token identifier renders
/// unchanged.
pub fn format_rubric_label(id: &str) -> String {
    let mut tokens = id.split('_');
    let code = tokens.next().unwrap_or_default();
    let rest = tokens.collect::<Vec<_>>().join(" ");
    if rest.is_empty() {
        id.to_string()
    } else {
        format!("{rest} - {code}")
    }
}
