//! Domain task model shared with every consumer of the data layer.
//!
//! [`Task`] is the only representation that crosses layer boundaries. The
//! persisted row lives in [`crate::entities::task`] and the wire format in
//! [`crate::backend::BackendTask`]; conversions between the three are in
//! [`crate::mapping`].

use serde::{Deserialize, Serialize};

/// A to-do item as seen by the rest of the application.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub description: String,
    pub is_completed: bool,
}

impl Task {
    pub fn new(id: impl Into<String>, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            is_completed: false,
        }
    }

    /// Label shown in list rows: the title, or the description when the title is empty.
    pub fn title_for_list(&self) -> &str {
        if self.title.is_empty() {
            &self.description
        } else {
            &self.title
        }
    }

    pub fn is_active(&self) -> bool {
        !self.is_completed
    }

    /// True when either the title or the description is missing.
    pub fn is_empty(&self) -> bool {
        self.title.is_empty() || self.description.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_for_list_prefers_title() {
        let task = Task::new("1", "Title", "Description");
        assert_eq!(task.title_for_list(), "Title");
    }

    #[test]
    fn test_title_for_list_falls_back_to_description() {
        let task = Task::new("1", "", "Description");
        assert_eq!(task.title_for_list(), "Description");
    }

    #[test]
    fn test_is_active() {
        let mut task = Task::new("1", "Title", "Description");
        assert!(task.is_active());
        task.is_completed = true;
        assert!(!task.is_active());
    }

    #[test]
    fn test_is_empty() {
        assert!(Task::new("1", "", "Description").is_empty());
        assert!(Task::new("1", "Title", "").is_empty());
        assert!(!Task::new("1", "Title", "Description").is_empty());
    }
}
