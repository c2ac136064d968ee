//! Display records and the collaborator seams for rendering and notifying.
//!
//! A `View` is the owned, markup-free form of a `Selection`: one record per
//! matching todo, or the reason the list is empty.

use serde::{Deserialize, Serialize};

use crate::filter::{EmptyReason, ListLabel, Selection};

/// Badge shown under a todo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Badge {
    /// The todo belongs to no (known) list.
    General,
    List { name: String, color: [u8; 3] },
}

/// What clicking the record's checkbox does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToggleAction {
    Check,
    Uncheck,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayRecord {
    pub id: String,
    pub title: String,
    pub description: String,
    pub completed: bool,
    pub badge: Badge,
    pub action: ToggleAction,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "data", rename_all = "snake_case")]
pub enum View {
    Records(Vec<DisplayRecord>),
    Empty(EmptyReason),
}

impl View {
    pub fn records(&self) -> &[DisplayRecord] {
        match self {
            View::Records(records) => records,
            View::Empty(_) => &[],
        }
    }
}

impl From<&Selection<'_>> for View {
    fn from(selection: &Selection<'_>) -> Self {
        match selection {
            Selection::Empty(reason) => View::Empty(*reason),
            Selection::Matches(matches) => View::Records(
                matches
                    .iter()
                    .map(|m| DisplayRecord {
                        id: m.todo.id.clone(),
                        title: m.todo.title.clone(),
                        description: m.todo.description.clone(),
                        completed: m.todo.is_completed,
                        badge: match m.list {
                            ListLabel::NoList => Badge::General,
                            ListLabel::Named { name, color } => Badge::List {
                                name: name.to_string(),
                                color,
                            },
                        },
                        action: if m.todo.is_completed {
                            ToggleAction::Uncheck
                        } else {
                            ToggleAction::Check
                        },
                    })
                    .collect(),
            ),
        }
    }
}

impl EmptyReason {
    /// Default empty-state text.
    pub fn message(self) -> &'static str {
        match self {
            EmptyReason::NoMatch => "No item matches the search criteria",
            EmptyReason::NoData => "No items in the database",
        }
    }
}

impl Badge {
    /// Label text; todos without a list are grouped under "General".
    pub fn label(&self) -> &str {
        match self {
            Badge::General => "General",
            Badge::List { name, .. } => name,
        }
    }
}

/// Consumes the rendered view (markup, terminal, test recorder, ...).
pub trait Renderer {
    fn render(&mut self, view: &View);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Warning,
    Error,
}

/// User-facing notification sink (toast, status line, ...).
pub trait Notifier {
    fn notify(&mut self, message: &str, kind: NotificationKind);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{select, Query};
    use crate::types::{timestamp, List, Todo};

    fn fixture() -> (Vec<Todo>, Vec<List>) {
        let todos = vec![
            Todo {
                id: "t1".to_string(),
                title: "Buy milk".to_string(),
                description: "2l".to_string(),
                list_id: "l1".to_string(),
                is_completed: false,
                last_modified: timestamp::parse("2024-01-02").unwrap(),
            },
            Todo {
                id: "t2".to_string(),
                title: "Buy bread".to_string(),
                description: String::new(),
                list_id: "deleted".to_string(),
                is_completed: true,
                last_modified: timestamp::parse("2024-01-01").unwrap(),
            },
        ];
        let lists = vec![List {
            id: "l1".to_string(),
            name: "Groceries".to_string(),
            color: [1, 2, 3],
        }];
        (todos, lists)
    }

    #[test]
    fn view_builds_one_record_per_match() {
        let (todos, lists) = fixture();
        let view = View::from(&select(&todos, &lists, &Query::default()));
        let records = view.records();
        assert_eq!(records.len(), 2);
        assert_eq!(
            records[0].badge,
            Badge::List {
                name: "Groceries".to_string(),
                color: [1, 2, 3]
            }
        );
        assert_eq!(records[0].action, ToggleAction::Check);
        assert_eq!(records[1].badge, Badge::General);
        assert_eq!(records[1].badge.label(), "General");
        assert_eq!(records[1].action, ToggleAction::Uncheck);
    }

    #[test]
    fn empty_view_keeps_reason() {
        let (todos, lists) = fixture();
        let query = Query {
            text: "nothing".to_string(),
            ..Query::default()
        };
        let view = View::from(&select(&todos, &lists, &query));
        assert_eq!(view, View::Empty(EmptyReason::NoMatch));
        assert!(view.records().is_empty());
    }

    #[test]
    fn view_serializes_for_the_frontend() {
        let json = serde_json::to_value(View::Empty(EmptyReason::NoData)).unwrap();
        assert_eq!(json["state"], "empty");
        assert_eq!(json["data"], "no-data");
        assert_eq!(
            serde_json::to_value(NotificationKind::Warning).unwrap(),
            "warning"
        );
    }
}
