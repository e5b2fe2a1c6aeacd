//! Fragment types held by the query state before rendering

use std::fmt;

/// A field or predicate entry.
///
/// An entry is either one expression or a group of sub-expressions added
/// in a single call. Groups are flattened in place when the statement is
/// rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    Single(String),
    Group(Vec<String>),
}

impl Fragment {
    /// True when the fragment contributes nothing to the rendered clause
    pub fn is_empty(&self) -> bool {
        match self {
            Fragment::Single(expr) => expr.is_empty(),
            Fragment::Group(exprs) => exprs.is_empty(),
        }
    }

    /// Iterate the expressions this fragment contributes, in order
    pub fn expressions(&self) -> impl Iterator<Item = &str> {
        let slice: &[String] = match self {
            Fragment::Single(expr) => std::slice::from_ref(expr),
            Fragment::Group(exprs) => exprs,
        };
        slice.iter().map(String::as_str)
    }
}

/// Flatten a sequence of fragments into one list, keeping relative order
pub fn flatten(fragments: &[Fragment]) -> Vec<&str> {
    fragments.iter().flat_map(Fragment::expressions).collect()
}

impl From<&str> for Fragment {
    fn from(expr: &str) -> Self {
        Fragment::Single(expr.to_string())
    }
}

impl From<String> for Fragment {
    fn from(expr: String) -> Self {
        Fragment::Single(expr)
    }
}

impl From<&String> for Fragment {
    fn from(expr: &String) -> Self {
        Fragment::Single(expr.clone())
    }
}

impl From<Vec<&str>> for Fragment {
    fn from(exprs: Vec<&str>) -> Self {
        Fragment::Group(exprs.into_iter().map(str::to_string).collect())
    }
}

impl From<Vec<String>> for Fragment {
    fn from(exprs: Vec<String>) -> Self {
        Fragment::Group(exprs)
    }
}

impl<const N: usize> From<[&str; N]> for Fragment {
    fn from(exprs: [&str; N]) -> Self {
        Fragment::Group(exprs.iter().map(|e| e.to_string()).collect())
    }
}

/// A join descriptor: `{table, alias, condition, type}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Join {
    pub table: String,
    pub alias: String,
    pub condition: String,
    pub join_type: String,
}

impl Join {
    /// Join type used when none is given
    pub const DEFAULT_TYPE: &'static str = "left";

    pub fn new(table: &str, alias: &str, condition: &str, join_type: &str) -> Self {
        let join_type = if join_type.is_empty() {
            Self::DEFAULT_TYPE
        } else {
            join_type
        };
        Self {
            table: table.to_string(),
            alias: alias.to_string(),
            condition: condition.to_string(),
            join_type: join_type.to_string(),
        }
    }

    /// The alias to render; an empty alias falls back to the table name
    pub fn effective_alias(&self) -> &str {
        if self.alias.is_empty() {
            &self.table
        } else {
            &self.alias
        }
    }
}

impl fmt::Display for Join {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} JOIN {} AS {} ON {} ",
            self.join_type.to_uppercase(),
            self.table,
            self.effective_alias(),
            self.condition
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flatten_preserves_order_across_groups() {
        let fragments = vec![
            Fragment::from("a"),
            Fragment::from(vec!["b", "c"]),
            Fragment::from("d"),
            Fragment::from(["e", "f"]),
        ];
        assert_eq!(flatten(&fragments), vec!["a", "b", "c", "d", "e", "f"]);
    }

    #[test]
    fn test_empty_fragments() {
        assert!(Fragment::from("").is_empty());
        assert!(Fragment::from(Vec::<String>::new()).is_empty());
        assert!(!Fragment::from(vec![""]).is_empty());
    }

    #[test]
    fn test_join_display() {
        let join = Join::new("users", "u", "u.id = o.user_id", "inner");
        assert_eq!(join.to_string(), "INNER JOIN users AS u ON u.id = o.user_id ");
    }

    #[test]
    fn test_join_defaults() {
        let join = Join::new("users", "", "users.id = o.user_id", "");
        assert_eq!(join.join_type, "left");
        assert_eq!(join.effective_alias(), "users");
        assert_eq!(
            join.to_string(),
            "LEFT JOIN users AS users ON users.id = o.user_id "
        );
    }

    #[test]
    fn test_join_without_condition_keeps_on() {
        let join = Join::new("t", "", "", "");
        assert_eq!(join.to_string(), "LEFT JOIN t AS t ON  ");
    }
}
