//! Rendering of [`FilterCondition`] into RediSearch query syntax (DIALECT 2 and later).
//!
//! | Condition  | Rendered               |
//! |------------|------------------------|
//! | `Tag`      | `@location:{Roorkee}`  |
//! | `Range`    | `@price:[100 +inf]`    |
//! | `Contains` | `@title:*2bhk*`        |
//! | `And`      | children joined by ` ` |
//! | `Or`       | children joined by ` \| ` |
//!
//! Composite children with more than one part are parenthesized, since AND binds tighter
//! than OR in RediSearch.

use super::FilterCondition;

/// Matches no document. RediSearch has no literal for false.
const MATCH_NOTHING: &str = "-*";

impl FilterCondition {
    /// Render as a RediSearch clause. A match-all condition renders as `""`.
    pub fn to_query_clause(&self) -> String {
        let mut out = String::new();
        self.render(&mut out);
        out
    }

    fn render(&self, out: &mut String) {
        match self {
            Self::Tag { field, value } => {
                out.push_str(&format!("@{field}:{{{}}}", escape_query_value(value)));
            }
            Self::Range { field, lower, upper } => {
                let lower = lower.map_or_else(|| "-inf".to_string(), format_bound);
                let upper = upper.map_or_else(|| "+inf".to_string(), format_bound);
                out.push_str(&format!("@{field}:[{lower} {upper}]"));
            }
            Self::Contains { field, needle } => {
                out.push_str(&format!("@{field}:*{}*", escape_query_value(needle)));
            }
            Self::And(children) => render_joined(children, " ", out),
            Self::Or(_) if self.is_match_all() => {}
            Self::Or(children) if children.is_empty() => out.push_str(MATCH_NOTHING),
            Self::Or(children) => render_joined(children, " | ", out),
        }
    }

    /// Direct children that render to something.
    fn part_count(&self) -> usize {
        match self {
            Self::And(children) | Self::Or(children) => children.iter().filter(|c| !c.is_match_all()).count(),
            _ => 1,
        }
    }
}

fn render_joined(children: &[FilterCondition], separator: &str, out: &mut String) {
    let mut first = true;
    for child in children.iter().filter(|c| !c.is_match_all()) {
        if !first {
            out.push_str(separator);
        }
        first = false;

        let wrap = matches!(child, FilterCondition::And(_) | FilterCondition::Or(_)) && child.part_count() > 1;
        if wrap {
            out.push('(');
        }
        child.render(out);
        if wrap {
            out.push(')');
        }
    }
}

/// The full query for `FT.SEARCH`: the rendered clause, or `*` for match-all.
pub fn query_string(condition: &FilterCondition) -> String {
    let clause = condition.to_query_clause();
    if clause.is_empty() { "*".to_string() } else { clause }
}

/// Backslash-escape everything RediSearch could read as syntax: ASCII punctuation and
/// whitespace. Letters, digits, `_` and non-ASCII characters pass through.
///
/// ```
/// use nest::search::escape_query_value;
///
/// assert_eq!(escape_query_value("Roorkee"), "Roorkee");
/// assert_eq!(escape_query_value("New Delhi"), "New\\ Delhi");
/// assert_eq!(escape_query_value("Sector-5"), "Sector\\-5");
/// assert_eq!(escape_query_value("2bhk"), "2bhk");
/// ```
pub fn escape_query_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len() + 4);
    for ch in value.chars() {
        if (ch.is_ascii_punctuation() && ch != '_') || ch.is_ascii_whitespace() {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

fn format_bound(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}
