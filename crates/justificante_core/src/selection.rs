//! crates/justificante_core/src/selection.rs
//!
//! Roster filtering and selection. The selection owns the full roster plus a
//! case-insensitive substring filter, and emits the selected students in
//! roster order after every mutation.

use std::collections::HashSet;

use crate::domain::Student;

/// The student selector backing the roster table.
#[derive(Debug, Clone, Default)]
pub struct RosterSelection {
    roster: Vec<Student>,
    filter: String,
    selected: HashSet<String>,
}

impl RosterSelection {
    pub fn new(roster: Vec<Student>) -> Self {
        Self {
            roster,
            filter: String::new(),
            selected: HashSet::new(),
        }
    }

    pub fn roster(&self) -> &[Student] {
        &self.roster
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn set_filter(&mut self, term: impl Into<String>) {
        self.filter = term.into();
    }

    fn matches(&self, student: &Student) -> bool {
        let term = self.filter.to_lowercase();
        student.name.to_lowercase().contains(&term) || student.id.to_lowercase().contains(&term)
    }

    /// The roster entries matching the current filter, in roster order.
    pub fn filtered(&self) -> Vec<&Student> {
        self.roster.iter().filter(|s| self.matches(s)).collect()
    }

    pub fn is_selected(&self, student_id: &str) -> bool {
        self.selected.contains(student_id)
    }

    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    /// Flips one student's membership in the selected set. Ids not on the
    /// roster are ignored. Returns the materialized selection.
    pub fn toggle(&mut self, student_id: &str) -> Vec<Student> {
        if self.roster.iter().any(|s| s.id == student_id) {
            if !self.selected.remove(student_id) {
                self.selected.insert(student_id.to_string());
            }
        }
        self.selected_students()
    }

    /// Select-all / deselect-all scoped to the currently filtered view.
    ///
    /// If every filtered student is already selected, exactly those are
    /// deselected; otherwise all filtered students are selected. Students
    /// hidden by the filter keep their selection either way. A no-op when the
    /// filtered view is empty. Returns the materialized selection.
    pub fn toggle_all(&mut self) -> Vec<Student> {
        let filtered_ids: Vec<String> = self.filtered().iter().map(|s| s.id.clone()).collect();
        if filtered_ids.is_empty() {
            return self.selected_students();
        }

        let all_selected = filtered_ids.iter().all(|id| self.selected.contains(id));
        for id in filtered_ids {
            if all_selected {
                self.selected.remove(&id);
            } else {
                self.selected.insert(id);
            }
        }
        self.selected_students()
    }

    /// The full records of the currently selected students, in roster order
    /// (not selection order).
    pub fn selected_students(&self) -> Vec<Student> {
        self.roster
            .iter()
            .filter(|s| self.selected.contains(&s.id))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student(id: &str, name: &str) -> Student {
        Student {
            id: id.to_string(),
            name: name.to_string(),
            career: "Ing. Industrial".to_string(),
        }
    }

    fn roster() -> Vec<Student> {
        vec![
            student("001234", "García Martínez, Juan Carlos"),
            student("001235", "López Hernández, María Fernanda"),
            student("001236", "Rodríguez Pérez, Luis Alberto"),
            student("001237", "Sánchez González, Ana Patricia"),
        ]
    }

    #[test]
    fn toggle_pair_is_idempotent() {
        let mut selection = RosterSelection::new(roster());
        assert_eq!(selection.roster().len(), 4);

        selection.toggle("001235");
        assert!(selection.is_selected("001235"));
        assert_eq!(selection.selected_count(), 1);
        let before: Vec<String> = selection
            .selected_students()
            .iter()
            .map(|s| s.id.clone())
            .collect();

        selection.toggle("001236");
        selection.toggle("001236");
        assert!(!selection.is_selected("001236"));
        assert_eq!(selection.selected_count(), 1);

        let after: Vec<String> = selection
            .selected_students()
            .iter()
            .map(|s| s.id.clone())
            .collect();
        assert_eq!(before, after);
    }

    #[test]
    fn toggle_ignores_unknown_ids() {
        let mut selection = RosterSelection::new(roster());
        let selected = selection.toggle("999999");
        assert!(selected.is_empty());
    }

    #[test]
    fn filter_matches_name_and_id_case_insensitively() {
        let mut selection = RosterSelection::new(roster());
        selection.set_filter("garcía");
        assert_eq!(selection.filtered().len(), 1);

        selection.set_filter("1235");
        assert_eq!(selection.filter(), "1235");
        let filtered = selection.filtered();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, "001235");
    }

    #[test]
    fn select_all_under_filter_only_adds_filtered_students() {
        let mut selection = RosterSelection::new(roster());
        selection.set_filter("lópez");
        selection.toggle_all();

        let ids: Vec<String> = selection
            .selected_students()
            .iter()
            .map(|s| s.id.clone())
            .collect();
        assert_eq!(ids, vec!["001235".to_string()]);
    }

    #[test]
    fn deselect_all_under_filter_leaves_hidden_selections_untouched() {
        let mut selection = RosterSelection::new(roster());
        selection.toggle("001234");
        selection.toggle("001236");

        // Filter down to 001236 only, then deselect-all within the filter.
        selection.set_filter("rodríguez");
        selection.toggle_all();

        let ids: Vec<String> = selection
            .selected_students()
            .iter()
            .map(|s| s.id.clone())
            .collect();
        assert_eq!(ids, vec!["001234".to_string()]);
    }

    #[test]
    fn toggle_all_on_empty_filtered_view_is_a_noop() {
        let mut selection = RosterSelection::new(roster());
        selection.toggle("001234");
        selection.set_filter("no existe");
        let selected = selection.toggle_all();
        assert_eq!(selected.len(), 1);
    }

    #[test]
    fn selection_is_emitted_in_roster_order() {
        let mut selection = RosterSelection::new(roster());
        selection.toggle("001237");
        let selected = selection.toggle("001234");

        let ids: Vec<&str> = selected.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["001234", "001237"]);
    }
}
