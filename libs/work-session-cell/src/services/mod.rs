pub mod calendar;
pub mod event_cache;
pub mod source;
pub mod specialty_filter;
pub mod summary;
pub mod view_sync;
pub mod widget;

pub use calendar::WorkSessionCalendar;
pub use event_cache::{EventCache, LoadOutcome, LoadTicket};
pub use source::{WorkSessionService, WorkSessionSource};
pub use specialty_filter::{filter_by_specialty, FilterListener, SpecialtyFilter};
pub use summary::SessionSummary;
pub use view_sync::ViewSynchronizer;
pub use widget::{CalendarWidget, HeadlessWidget};
