//! Filter/search engine: snapshot + query in, ordered matches out.
//!
//! # Design
//! `select` is a pure function over borrowed data. The completion filter
//! narrows first; the text search (case-insensitive substring) then runs on
//! exactly one field selection, with no fall-through between field cases.
//! Input order is preserved, so the store's newest-first order is what the
//! caller sees.

use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::store::ListIndex;
use crate::types::Todo;

/// Completion-state narrowing applied before search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterMode {
    #[default]
    All,
    IncompleteOnly,
    CompleteOnly,
}

impl FilterMode {
    pub fn admits(self, todo: &Todo) -> bool {
        match self {
            FilterMode::All => true,
            FilterMode::IncompleteOnly => !todo.is_completed,
            FilterMode::CompleteOnly => todo.is_completed,
        }
    }
}

/// Maps the web UI's filter `<select>` values.
impl TryFrom<u8> for FilterMode {
    type Error = ApiError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(FilterMode::IncompleteOnly),
            2 => Ok(FilterMode::All),
            3 => Ok(FilterMode::CompleteOnly),
            other => Err(ApiError::InvalidSelection(format!("filter mode {other}"))),
        }
    }
}

/// Which text fields the search string is matched against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchField {
    Title,
    Description,
    #[default]
    TitleOrDescription,
}

impl SearchField {
    /// `needle` must already be lowercased.
    fn matches(self, todo: &Todo, needle: &str) -> bool {
        let hit = |text: &str| text.to_lowercase().contains(needle);
        match self {
            SearchField::Title => hit(&todo.title),
            SearchField::Description => hit(&todo.description),
            SearchField::TitleOrDescription => hit(&todo.title) || hit(&todo.description),
        }
    }
}

/// Maps the web UI's search-field `<select>` values.
impl TryFrom<u8> for SearchField {
    type Error = ApiError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(SearchField::Title),
            2 => Ok(SearchField::Description),
            3 => Ok(SearchField::TitleOrDescription),
            other => Err(ApiError::InvalidSelection(format!("search field {other}"))),
        }
    }
}

/// The current UI selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    pub filter: FilterMode,
    pub field: SearchField,
    pub text: String,
}

impl Query {
    pub fn new(filter: FilterMode, field: SearchField, text: impl Into<String>) -> Self {
        Self {
            filter,
            field,
            text: text.into(),
        }
    }
}

/// Resolved list of a matching todo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListLabel<'a> {
    /// Empty `listId`, or one naming a list that is not in the snapshot.
    NoList,
    Named { name: &'a str, color: [u8; 3] },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match<'a> {
    pub todo: &'a Todo,
    pub list: ListLabel<'a>,
}

/// Why a selection came out empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EmptyReason {
    /// Search text was given and nothing matched it.
    NoMatch,
    /// No search text, and the filtered snapshot has nothing to show.
    NoData,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection<'a> {
    Matches(Vec<Match<'a>>),
    Empty(EmptyReason),
}

impl<'a> Selection<'a> {
    pub fn matches(&self) -> &[Match<'a>] {
        match self {
            Selection::Matches(matches) => matches,
            Selection::Empty(_) => &[],
        }
    }

    pub fn empty_reason(&self) -> Option<EmptyReason> {
        match self {
            Selection::Matches(_) => None,
            Selection::Empty(reason) => Some(*reason),
        }
    }

    pub fn len(&self) -> usize {
        self.matches().len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches().is_empty()
    }

    pub fn ids(&self) -> Vec<&'a str> {
        self.matches().iter().map(|m| m.todo.id.as_str()).collect()
    }
}

/// Apply `query` to `todos`, resolving each survivor's list via `lists`.
pub fn select<'a, I>(todos: &'a [Todo], lists: &'a I, query: &Query) -> Selection<'a>
where
    I: ListIndex + ?Sized,
{
    let needle = query.text.to_lowercase();
    let searching = !needle.is_empty();

    let matches: Vec<Match<'a>> = todos
        .iter()
        .filter(|todo| query.filter.admits(todo))
        .filter(|todo| !searching || query.field.matches(todo, &needle))
        .map(|todo| Match {
            todo,
            list: resolve_list(todo, lists),
        })
        .collect();

    if !matches.is_empty() {
        Selection::Matches(matches)
    } else if searching {
        Selection::Empty(EmptyReason::NoMatch)
    } else {
        Selection::Empty(EmptyReason::NoData)
    }
}

fn resolve_list<'a, I>(todo: &Todo, lists: &'a I) -> ListLabel<'a>
where
    I: ListIndex + ?Sized,
{
    match lists.find_list(&todo.list_id) {
        Some(list) => ListLabel::Named {
            name: &list.name,
            color: list.color,
        },
        None => ListLabel::NoList,
    }
}
