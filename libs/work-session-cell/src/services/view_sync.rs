//! Keeps the requested view mode, the widget and the event cache in step.
//!
//! Month view is backed by the local [`EventCache`]; week and day views
//! show only what the parent supplies, so entering them drops the cache.
//! Operations that need data return a [`LoadTicket`] which the caller
//! resolves against a [`WorkSessionSource`](crate::WorkSessionSource) and
//! hands back through [`ViewSynchronizer::finish_load`].

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::debug;

use shared_utils::Clock;

use crate::models::{CalendarEvent, MonthKey, Navigation, ViewMode};
use crate::services::event_cache::{EventCache, LoadOutcome, LoadTicket};
use crate::services::widget::CalendarWidget;

pub struct ViewSynchronizer<W: CalendarWidget> {
    widget: W,
    clock: Arc<dyn Clock>,
    view: ViewMode,
    visible_date: NaiveDate,
    cache: EventCache,
    authoritative: Vec<CalendarEvent>,
}

impl<W: CalendarWidget> ViewSynchronizer<W> {
    /// Adopt the widget's current view and date; nothing is loaded until
    /// [`mount`](Self::mount).
    pub fn new(widget: W, clock: Arc<dyn Clock>) -> Self {
        let view = widget.view();
        let visible_date = widget.date();

        Self {
            widget,
            clock,
            view,
            visible_date,
            cache: EventCache::new(),
            authoritative: Vec::new(),
        }
    }

    /// Enter the widget's initial view as if it had just been selected.
    pub fn mount(&mut self) -> Option<LoadTicket> {
        self.transition(self.view)
    }

    /// The parent changed the requested view.
    pub fn set_view(&mut self, view: ViewMode) -> Option<LoadTicket> {
        if view == self.view && view == self.widget.view() {
            return None;
        }
        self.transition(view)
    }

    /// The user clicked a view toggle on the calendar toolbar.
    pub fn toggle_view(&mut self, view: ViewMode) -> Option<LoadTicket> {
        self.transition(view)
    }

    fn transition(&mut self, view: ViewMode) -> Option<LoadTicket> {
        if self.widget.view() != view {
            self.widget.change_view(view);
        }
        if self.view != view {
            debug!("Calendar view {:?} -> {:?}", self.view, view);
            self.view = view;
        }

        match view {
            ViewMode::Month => self.ensure_month_loaded(),
            ViewMode::Week | ViewMode::Day => {
                self.cache.invalidate();
                None
            }
        }
    }

    pub fn navigate(&mut self, navigation: Navigation) -> Option<LoadTicket> {
        let target = match navigation {
            Navigation::Prev => self.view.shift(self.visible_date, false),
            Navigation::Next => self.view.shift(self.visible_date, true),
            Navigation::Today => self.clock.today(),
        };

        // Issue the load for the target month before the widget moves.
        self.visible_date = target;
        let ticket = self.ensure_month_loaded();

        match navigation {
            Navigation::Prev => self.widget.prev(),
            Navigation::Next => self.widget.next(),
            Navigation::Today => self.widget.today(target),
        }

        if self.widget.date() != target {
            self.widget.goto_date(target);
        }

        ticket
    }

    pub fn prev(&mut self) -> Option<LoadTicket> {
        self.navigate(Navigation::Prev)
    }

    pub fn next(&mut self) -> Option<LoadTicket> {
        self.navigate(Navigation::Next)
    }

    pub fn today(&mut self) -> Option<LoadTicket> {
        self.navigate(Navigation::Today)
    }

    /// The widget moved on its own (e.g. its internal toolbar or a date click).
    pub fn sync_from_widget(&mut self) -> Option<LoadTicket> {
        let view = self.widget.view();
        let date = self.widget.date();

        if view != self.view {
            self.visible_date = date;
            return self.transition(view);
        }

        if date == self.visible_date {
            return None;
        }

        self.visible_date = date;
        self.ensure_month_loaded()
    }

    /// The parent handed over a fresh event list.
    ///
    /// A non-empty list is authoritative and replaces anything loaded
    /// locally; an empty list means the calendar must fetch on its own.
    pub fn supply_events(&mut self, events: Vec<CalendarEvent>) -> Option<LoadTicket> {
        self.cache.invalidate();
        self.authoritative = events;
        self.ensure_month_loaded()
    }

    /// Reload the visible month even if the cache already holds it.
    pub fn refresh(&mut self) -> Option<LoadTicket> {
        if !self.loads_locally() {
            return None;
        }
        Some(self.cache.begin_load(self.visible_month()))
    }

    pub fn finish_load<E>(
        &mut self,
        ticket: LoadTicket,
        result: Result<Vec<CalendarEvent>, E>,
    ) -> Result<LoadOutcome, E> {
        self.cache.finish_load(ticket, result)
    }

    fn loads_locally(&self) -> bool {
        self.view == ViewMode::Month && self.authoritative.is_empty()
    }

    fn ensure_month_loaded(&mut self) -> Option<LoadTicket> {
        if !self.loads_locally() {
            return None;
        }

        let month = self.visible_month();
        if self.cache.pending_month() == Some(month) {
            return None;
        }
        if self.cache.is_valid_for(month) {
            // Back on the cached month: a load for the month just left must not land.
            self.cache.cancel_pending();
            return None;
        }

        Some(self.cache.begin_load(month))
    }

    /// Events to render: the parent's list when given, else the cache for
    /// the visible month.
    pub fn visible_events(&self) -> &[CalendarEvent] {
        if !self.authoritative.is_empty() {
            &self.authoritative
        } else {
            self.cache.events_for(self.visible_month())
        }
    }

    pub fn view(&self) -> ViewMode {
        self.view
    }

    pub fn visible_date(&self) -> NaiveDate {
        self.visible_date
    }

    pub fn visible_month(&self) -> MonthKey {
        MonthKey::of(self.visible_date)
    }

    pub fn cache(&self) -> &EventCache {
        &self.cache
    }

    pub fn has_authoritative_events(&self) -> bool {
        !self.authoritative.is_empty()
    }

    pub fn widget(&self) -> &W {
        &self.widget
    }

    pub fn widget_mut(&mut self) -> &mut W {
        &mut self.widget
    }

    /// Drop locally loaded events, e.g. after the scope changed.
    pub fn invalidate(&mut self) -> Option<LoadTicket> {
        self.cache.invalidate();
        self.ensure_month_loaded()
    }
}
