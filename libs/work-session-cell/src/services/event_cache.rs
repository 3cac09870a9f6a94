//! Single-month cache of calendar events.
//!
//! The cache holds at most one month of events together with the
//! [`MonthKey`] they were fetched for. Every load is stamped with a
//! generation number when it is issued; a response is applied only when its
//! generation is still the latest one, so a slow request for a month the
//! user has already navigated away from can never overwrite newer data.

use tracing::{debug, warn};

use shared_models::AppError;

use crate::models::{events_from_sessions, CalendarEvent, DateRange, EventScope, MonthKey};
use crate::services::source::WorkSessionSource;

/// Handle for one issued load; hand it back to [`EventCache::finish_load`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
    month: MonthKey,
}

impl LoadTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn month(&self) -> MonthKey {
        self.month
    }

    pub fn range(&self) -> DateRange {
        self.month.range()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied { month: MonthKey, count: usize },
    /// A newer load (or an invalidation) superseded this one; the response was dropped.
    Stale { generation: u64, latest: u64 },
}

#[derive(Debug, Default)]
pub struct EventCache {
    events: Vec<CalendarEvent>,
    month: Option<MonthKey>,
    pending: Option<MonthKey>,
    issued: u64,
}

impl EventCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_load(&mut self, month: MonthKey) -> LoadTicket {
        self.issued += 1;
        self.pending = Some(month);
        debug!("Issued load #{} for {}", self.issued, month);

        LoadTicket {
            generation: self.issued,
            month,
        }
    }

    /// Apply the response for `ticket`.
    ///
    /// A failed load for the latest ticket leaves the previous contents in
    /// place and hands the error back; a stale response is dropped whether
    /// it succeeded or not.
    pub fn finish_load<E>(
        &mut self,
        ticket: LoadTicket,
        result: Result<Vec<CalendarEvent>, E>,
    ) -> Result<LoadOutcome, E> {
        if ticket.generation != self.issued {
            debug!(
                "Dropping stale load #{} for {} (latest #{})",
                ticket.generation, ticket.month, self.issued
            );
            return Ok(LoadOutcome::Stale {
                generation: ticket.generation,
                latest: self.issued,
            });
        }

        self.pending = None;
        let events = result?;

        let count = events.len();
        self.events = events;
        self.month = Some(ticket.month);
        debug!("Cached {} events for {}", count, ticket.month);

        Ok(LoadOutcome::Applied {
            month: ticket.month,
            count,
        })
    }

    /// Fetch `month` from `source` and store it.
    pub async fn load<S>(
        &mut self,
        source: &S,
        scope: EventScope,
        month: MonthKey,
    ) -> Result<LoadOutcome, AppError>
    where
        S: WorkSessionSource + ?Sized,
    {
        let ticket = self.begin_load(month);
        let result = source.fetch(scope, ticket.range()).await.map(events_from_sessions);

        if let Err(e) = &result {
            warn!("Loading work sessions for {} failed: {}", month, e);
        }

        self.finish_load(ticket, result)
    }

    /// Drop all cached events and supersede any load still in flight.
    pub fn invalidate(&mut self) {
        self.issued += 1;
        self.events.clear();
        self.month = None;
        self.pending = None;
    }

    /// Supersede the load in flight, if any; cached events stay as they are.
    pub fn cancel_pending(&mut self) {
        if let Some(month) = self.pending.take() {
            self.issued += 1;
            debug!("Cancelled pending load for {} (now #{})", month, self.issued);
        }
    }

    pub fn month(&self) -> Option<MonthKey> {
        self.month
    }

    pub fn pending_month(&self) -> Option<MonthKey> {
        self.pending
    }

    pub fn is_valid_for(&self, month: MonthKey) -> bool {
        self.month == Some(month)
    }

    pub fn events(&self) -> &[CalendarEvent] {
        &self.events
    }

    /// Cached events, or nothing when the cache belongs to another month.
    pub fn events_for(&self, month: MonthKey) -> &[CalendarEvent] {
        if self.is_valid_for(month) {
            &self.events
        } else {
            &[]
        }
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn latest_generation(&self) -> u64 {
        self.issued
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{WorkSession, WorkSessionStatus};
    use crate::services::source::MockWorkSessionSource;
    use assert_matches::assert_matches;
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn month(y: i32, m: u32) -> MonthKey {
        MonthKey::of(NaiveDate::from_ymd_opt(y, m, 1).unwrap())
    }

    fn session_in(month: MonthKey) -> WorkSession {
        let start = month.first_day().and_hms_opt(8, 0, 0).unwrap();
        WorkSession {
            id: Uuid::new_v4(),
            start_time: start,
            end_time: start + chrono::Duration::hours(4),
            status: WorkSessionStatus::Approved,
            doctor: None,
            technician: None,
            services: vec![],
            booth: None,
        }
    }

    fn events_in(month: MonthKey, n: usize) -> Vec<CalendarEvent> {
        (0..n).map(|_| CalendarEvent::from_work_session(session_in(month))).collect()
    }

    #[test]
    fn applies_latest_load_and_tags_month() {
        let mut cache = EventCache::new();
        let march = month(2026, 3);

        let ticket = cache.begin_load(march);
        let outcome = cache.finish_load::<AppError>(ticket, Ok(events_in(march, 2))).unwrap();

        assert_eq!(outcome, LoadOutcome::Applied { month: march, count: 2 });
        assert!(cache.is_valid_for(march));
        assert_eq!(cache.events_for(march).len(), 2);
        assert!(cache.events_for(month(2026, 4)).is_empty());
    }

    #[test]
    fn out_of_order_responses_never_mix_months() {
        let mut cache = EventCache::new();
        let april = month(2026, 4);
        let may = month(2026, 5);

        let first = cache.begin_load(april);
        let second = cache.begin_load(may);

        // The newer request resolves first, then the older one arrives late.
        cache.finish_load::<AppError>(second, Ok(events_in(may, 3))).unwrap();
        let late = cache.finish_load::<AppError>(first, Ok(events_in(april, 5))).unwrap();

        assert_eq!(late, LoadOutcome::Stale { generation: 1, latest: 2 });
        assert_eq!(cache.month(), Some(may));
        assert_eq!(cache.events().len(), 3);
        assert!(cache
            .events()
            .iter()
            .all(|e| MonthKey::of(e.start.date()) == may));
    }

    #[test]
    fn failed_load_keeps_previous_contents() {
        let mut cache = EventCache::new();
        let march = month(2026, 3);

        let ticket = cache.begin_load(march);
        cache.finish_load::<AppError>(ticket, Ok(events_in(march, 1))).unwrap();

        let ticket = cache.begin_load(month(2026, 4));
        let result = cache.finish_load(ticket, Err(AppError::Network("offline".into())));

        assert_matches!(result, Err(AppError::Network(_)));
        assert_eq!(cache.month(), Some(march));
        assert_eq!(cache.events().len(), 1);
        assert_eq!(cache.pending_month(), None);
    }

    #[test]
    fn invalidate_empties_and_supersedes_in_flight_loads() {
        let mut cache = EventCache::new();
        let march = month(2026, 3);

        let ticket = cache.begin_load(march);
        cache.finish_load::<AppError>(ticket, Ok(events_in(march, 4))).unwrap();
        let in_flight = cache.begin_load(month(2026, 4));

        cache.invalidate();

        assert!(cache.events().is_empty());
        assert_eq!(cache.month(), None);

        let outcome = cache.finish_load::<AppError>(in_flight, Ok(events_in(month(2026, 4), 2))).unwrap();
        assert_matches!(outcome, LoadOutcome::Stale { .. });
        assert!(cache.events().is_empty());
    }

    #[test]
    fn cancel_pending_keeps_cached_month() {
        let mut cache = EventCache::new();
        let march = month(2026, 3);

        let ticket = cache.begin_load(march);
        cache.finish_load::<AppError>(ticket, Ok(events_in(march, 2))).unwrap();
        let in_flight = cache.begin_load(month(2026, 4));

        cache.cancel_pending();

        assert_eq!(cache.pending_month(), None);
        assert_eq!(cache.events_for(march).len(), 2);

        let outcome = cache.finish_load::<AppError>(in_flight, Ok(events_in(month(2026, 4), 1))).unwrap();
        assert_matches!(outcome, LoadOutcome::Stale { .. });
        assert_eq!(cache.month(), Some(march));
        assert_eq!(cache.events().len(), 2);
    }

    #[tokio::test]
    async fn load_requests_whole_month_range() {
        let april = month(2026, 4);
        let mut source = MockWorkSessionSource::new();
        source
            .expect_fetch()
            .withf(move |scope, range| {
                *scope == EventScope::All
                    && range.start == NaiveDate::from_ymd_opt(2026, 4, 1).unwrap()
                    && range.end == NaiveDate::from_ymd_opt(2026, 5, 1).unwrap()
            })
            .times(1)
            .returning(move |_, _| Ok(vec![session_in(april)]));

        let mut cache = EventCache::new();
        let outcome = cache.load(&source, EventScope::All, april).await.unwrap();

        assert_eq!(outcome, LoadOutcome::Applied { month: april, count: 1 });
    }
}
