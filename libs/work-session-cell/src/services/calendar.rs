use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, error, info};
use uuid::Uuid;

use doctor_cell::{Specialty, SpecialtyDirectory};
use shared_config::AppConfig;
use shared_models::{AppError, SessionUser, UserRole};
use shared_utils::{Clock, SystemClock};

use crate::error::CalendarError;
use crate::models::{events_from_sessions, CalendarEvent, EventScope, MonthKey, Navigation, ViewMode};
use crate::services::event_cache::{LoadOutcome, LoadTicket};
use crate::services::source::{WorkSessionService, WorkSessionSource};
use crate::services::specialty_filter::{FilterListener, SpecialtyFilter};
use crate::services::summary::SessionSummary;
use crate::services::view_sync::ViewSynchronizer;
use crate::services::widget::CalendarWidget;

/// Work-session calendar for one signed-in user.
///
/// Owns the synchronizer (and through it the event cache) and the
/// specialty filter, and resolves load tickets against the remote source.
/// Load failures are logged and kept in [`last_error`](Self::last_error);
/// the previously loaded events stay on screen.
pub struct WorkSessionCalendar<W: CalendarWidget> {
    source: Arc<dyn WorkSessionSource>,
    sync: ViewSynchronizer<W>,
    filter: SpecialtyFilter,
    user: SessionUser,
    scope: EventScope,
    specialties: Option<Vec<Specialty>>,
    filtered: Vec<CalendarEvent>,
    last_error: Option<CalendarError>,
}

impl<W: CalendarWidget> WorkSessionCalendar<W> {
    pub fn new(
        source: Arc<dyn WorkSessionSource>,
        widget: W,
        user: SessionUser,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let scope = default_scope(&user);

        Self {
            source,
            sync: ViewSynchronizer::new(widget, clock),
            filter: SpecialtyFilter::new(),
            user,
            scope,
            specialties: None,
            filtered: Vec::new(),
            last_error: None,
        }
    }

    /// Calendar backed by the clinic API and the system clock.
    pub fn with_service(config: &AppConfig, widget: W, user: SessionUser) -> Self {
        Self::new(
            Arc::new(WorkSessionService::new(config)),
            widget,
            user,
            Arc::new(SystemClock),
        )
    }

    pub async fn mount(&mut self) {
        info!(
            "Mounting work-session calendar for {:?} in {:?} view",
            self.user.role,
            self.sync.view()
        );
        let ticket = self.sync.mount();
        self.execute(ticket).await;
    }

    pub async fn set_view(&mut self, view: ViewMode) {
        let ticket = self.sync.set_view(view);
        self.execute(ticket).await;
    }

    pub async fn toggle_view(&mut self, view: ViewMode) {
        let ticket = self.sync.toggle_view(view);
        self.execute(ticket).await;
    }

    pub async fn navigate(&mut self, navigation: Navigation) {
        let ticket = self.sync.navigate(navigation);
        self.execute(ticket).await;
    }

    pub async fn prev(&mut self) {
        self.navigate(Navigation::Prev).await
    }

    pub async fn next(&mut self) {
        self.navigate(Navigation::Next).await
    }

    pub async fn today(&mut self) {
        self.navigate(Navigation::Today).await
    }

    /// The widget changed date or view by itself.
    pub async fn widget_changed(&mut self) {
        let ticket = self.sync.sync_from_widget();
        self.execute(ticket).await;
    }

    /// Hand over events fetched elsewhere (e.g. after a status change).
    pub async fn supply_events(&mut self, events: Vec<CalendarEvent>) {
        let ticket = self.sync.supply_events(events);
        self.execute(ticket).await;
    }

    pub async fn refresh(&mut self) {
        let ticket = self.sync.refresh();
        self.execute(ticket).await;
    }

    /// Switch whose sessions are shown; a doctor scope needs a doctor.
    pub async fn set_scope(&mut self, scope: EventScope) -> Result<(), AppError> {
        if scope == EventScope::Doctor(None) {
            return Err(AppError::Validation("Please select a doctor".to_string()));
        }
        if scope == self.scope {
            return Ok(());
        }

        debug!("Calendar scope {:?} -> {:?}", self.scope, scope);
        self.scope = scope;
        let ticket = self.sync.invalidate();
        self.execute(ticket).await;
        Ok(())
    }

    pub fn select_specialty(&mut self, specialty_id: Option<Uuid>) {
        self.filter.select(specialty_id);
        self.recompute();
    }

    /// Push channel for widgets that must agree with what is rendered.
    pub fn on_filtered(&mut self, listener: FilterListener) {
        self.filter.set_listener(listener);
        self.recompute();
    }

    /// Specialties for the admin selector, fetched once per calendar.
    pub async fn ensure_specialties(
        &mut self,
        directory: &dyn SpecialtyDirectory,
    ) -> Result<&[Specialty], CalendarError> {
        if !self.user.is_admin() {
            return Ok(&[]);
        }

        if self.specialties.is_none() {
            let specialties = directory.list_specialties().await.map_err(|e| {
                error!("Failed to load specialties: {}", e);
                CalendarError::Specialties(e)
            })?;
            self.specialties = Some(specialties);
        }

        Ok(self.specialties.as_deref().unwrap_or(&[]))
    }

    async fn execute(&mut self, ticket: Option<LoadTicket>) {
        if let Some(ticket) = ticket {
            let result = self
                .source
                .fetch(self.scope, ticket.range())
                .await
                .map(events_from_sessions);

            match self.sync.finish_load(ticket, result) {
                Ok(LoadOutcome::Applied { month, count }) => {
                    debug!("Loaded {} work sessions for {}", count, month);
                    self.last_error = None;
                }
                Ok(LoadOutcome::Stale { generation, latest }) => {
                    debug!("Ignored stale load #{} (latest #{})", generation, latest);
                }
                Err(e) => {
                    error!("Failed to load work sessions for {}: {}", ticket.month(), e);
                    self.last_error = Some(CalendarError::Load {
                        month: ticket.month(),
                        source: e,
                    });
                }
            }
        }

        self.recompute();
    }

    fn recompute(&mut self) {
        let base = self.sync.visible_events();
        self.filtered = self.filter.apply(base, self.user.role);
    }

    /// Events to render after specialty filtering.
    pub fn events(&self) -> &[CalendarEvent] {
        &self.filtered
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary::from_events(&self.filtered)
    }

    pub fn last_error(&self) -> Option<&CalendarError> {
        self.last_error.as_ref()
    }

    pub fn specialties(&self) -> &[Specialty] {
        self.specialties.as_deref().unwrap_or(&[])
    }

    pub fn selected_specialty(&self) -> Option<Uuid> {
        self.filter.selected()
    }

    pub fn scope(&self) -> EventScope {
        self.scope
    }

    pub fn view(&self) -> ViewMode {
        self.sync.view()
    }

    pub fn visible_date(&self) -> NaiveDate {
        self.sync.visible_date()
    }

    pub fn visible_month(&self) -> MonthKey {
        self.sync.visible_month()
    }

    pub fn synchronizer(&self) -> &ViewSynchronizer<W> {
        &self.sync
    }

    pub fn widget_mut(&mut self) -> &mut W {
        self.sync.widget_mut()
    }
}

fn default_scope(user: &SessionUser) -> EventScope {
    match user.role {
        UserRole::Admin | UserRole::Receptionist => EventScope::All,
        UserRole::Doctor | UserRole::Technician | UserRole::Patient => EventScope::Mine,
    }
}
