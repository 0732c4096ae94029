//! Creation form handling for the terminal user interface.
//!
//! This module provides the `TaskForm` structure backing the "Criar Nova
//! Demanda" modal: field ordering, focus movement and the status selector.

use crate::{
    fields::Status,
    task::TaskDraft,
    tui::input::InputField,
};

/// Global order constants for the creation form fields.
pub const TITLE_GLOBAL_ORDER: usize = 0;
pub const DESCRIPTION_GLOBAL_ORDER: usize = 1;
pub const STATUS_GLOBAL_ORDER: usize = 2;
pub const TRIGGER_GLOBAL_ORDER: usize = 3;

const FIELD_COUNT: usize = 4;

/// Creation form state.
pub struct TaskForm {
    pub title: InputField,
    pub description: InputField,
    pub trigger: InputField,
    pub status: usize,
    pub statuses: Vec<Status>,
    pub current_field: usize,
}

impl TaskForm {
    /// Create a form populated from a held draft, focused on the title.
    pub fn from_draft(draft: &TaskDraft) -> Self {
        let statuses = Status::choices().to_vec();
        let status = statuses.iter().position(|s| *s == draft.status).unwrap_or(0);
        let mut form = Self {
            title: InputField::with_value(&draft.task),
            description: InputField::with_value(&draft.description),
            trigger: InputField::with_value(&draft.trigger),
            status,
            statuses,
            current_field: TITLE_GLOBAL_ORDER,
        };
        form.update_active_field();
        form
    }

    /// Draft with the current field values.
    pub fn to_draft(&self) -> TaskDraft {
        TaskDraft {
            task: self.title.value.clone(),
            description: self.description.value.clone(),
            status: self.selected_status().clone(),
            trigger: self.trigger.value.clone(),
        }
    }

    pub fn selected_status(&self) -> &Status {
        &self.statuses[self.status]
    }

    /// The text field with focus, if focus is not on the selector.
    fn active_input(&mut self) -> Option<&mut InputField> {
        match self.current_field {
            TITLE_GLOBAL_ORDER => Some(&mut self.title),
            DESCRIPTION_GLOBAL_ORDER => Some(&mut self.description),
            TRIGGER_GLOBAL_ORDER => Some(&mut self.trigger),
            _ => None,
        }
    }

    /// Move to the next field in the form.
    pub fn next_field(&mut self) {
        self.current_field = (self.current_field + 1) % FIELD_COUNT;
        self.update_active_field();
    }

    /// Move to the previous field in the form.
    pub fn prev_field(&mut self) {
        self.current_field = if self.current_field == 0 {
            FIELD_COUNT - 1
        } else {
            self.current_field - 1
        };
        self.update_active_field();
    }

    /// Update which field is currently active for editing.
    pub fn update_active_field(&mut self) {
        self.title.active = self.current_field == TITLE_GLOBAL_ORDER;
        self.description.active = self.current_field == DESCRIPTION_GLOBAL_ORDER;
        self.trigger.active = self.current_field == TRIGGER_GLOBAL_ORDER;
    }

    pub fn handle_char(&mut self, c: char) {
        if let Some(field) = self.active_input() {
            field.handle_char(c);
        }
    }

    pub fn handle_backspace(&mut self) {
        if let Some(field) = self.active_input() {
            field.handle_backspace();
        }
    }

    pub fn handle_delete(&mut self) {
        if let Some(field) = self.active_input() {
            field.handle_delete();
        }
    }

    /// Handle left/right arrow keys for cursor movement or status cycling.
    pub fn handle_left_right(&mut self, right: bool) {
        if self.current_field == STATUS_GLOBAL_ORDER {
            let len = self.statuses.len();
            self.status = if right {
                (self.status + 1) % len
            } else {
                (self.status + len - 1) % len
            };
            return;
        }
        if let Some(field) = self.active_input() {
            if right {
                field.move_cursor_right();
            } else {
                field.move_cursor_left();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trips_held_draft() {
        let draft = TaskDraft {
            task: "Revisar contrato".to_string(),
            description: "Cláusula 4".to_string(),
            status: Status::InProgress,
            trigger: "Jurídico".to_string(),
        };
        let form = TaskForm::from_draft(&draft);
        assert_eq!(form.current_field, TITLE_GLOBAL_ORDER);
        assert!(form.title.active);
        assert_eq!(form.to_draft(), draft);
    }

    #[test]
    fn test_focus_wraps_and_typing_goes_to_focused_field() {
        let mut form = TaskForm::from_draft(&TaskDraft::default());
        form.prev_field();
        assert_eq!(form.current_field, TRIGGER_GLOBAL_ORDER);
        form.handle_char('é');
        form.next_field();
        assert_eq!(form.current_field, TITLE_GLOBAL_ORDER);
        form.handle_char('T');

        let draft = form.to_draft();
        assert_eq!(draft.trigger, "é");
        assert_eq!(draft.task, "T");
    }

    #[test]
    fn test_status_selector_cycles() {
        let mut form = TaskForm::from_draft(&TaskDraft::default());
        form.current_field = STATUS_GLOBAL_ORDER;
        form.update_active_field();
        assert_eq!(form.selected_status(), &Status::Pending);

        form.handle_left_right(false);
        assert_eq!(form.selected_status(), &Status::Done);
        form.handle_left_right(true);
        form.handle_left_right(true);
        assert_eq!(form.selected_status(), &Status::InProgress);

        // Typing on the selector is ignored.
        form.handle_char('x');
        assert_eq!(form.to_draft().task, "");
    }
}
