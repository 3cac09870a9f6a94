use uuid::Uuid;

use shared_models::UserRole;

use crate::models::CalendarEvent;

/// Events whose doctor belongs to `specialty_id`; everything when `None`.
pub fn filter_by_specialty(events: &[CalendarEvent], specialty_id: Option<Uuid>) -> Vec<CalendarEvent> {
    match specialty_id {
        None => events.to_vec(),
        Some(id) => events
            .iter()
            .filter(|event| event.specialty_id() == Some(id))
            .cloned()
            .collect(),
    }
}

/// Receives the filtered list each time it changes.
pub type FilterListener = Box<dyn FnMut(&[CalendarEvent]) + Send>;

/// Admin-only specialty narrowing with a push channel for sibling widgets.
#[derive(Default)]
pub struct SpecialtyFilter {
    selected: Option<Uuid>,
    listener: Option<FilterListener>,
    last_emitted: Option<Vec<CalendarEvent>>,
}

impl SpecialtyFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_listener(&mut self, listener: FilterListener) {
        self.listener = Some(listener);
        self.last_emitted = None;
    }

    pub fn select(&mut self, specialty_id: Option<Uuid>) {
        self.selected = specialty_id;
    }

    pub fn selected(&self) -> Option<Uuid> {
        self.selected
    }

    /// Filter `base` for `role`; non-admins always get `base` back unchanged.
    pub fn apply(&mut self, base: &[CalendarEvent], role: UserRole) -> Vec<CalendarEvent> {
        let filtered = if role.is_admin() {
            filter_by_specialty(base, self.selected)
        } else {
            base.to_vec()
        };

        self.emit_if_changed(&filtered);
        filtered
    }

    fn emit_if_changed(&mut self, filtered: &[CalendarEvent]) {
        if self.last_emitted.as_deref() == Some(filtered) {
            return;
        }

        if let Some(listener) = self.listener.as_mut() {
            listener(filtered);
        }
        self.last_emitted = Some(filtered.to_vec());
    }
}
