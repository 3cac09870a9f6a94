use chrono::NaiveDate;

use crate::models::ViewMode;

/// The rendering calendar the synchronizer drives.
///
/// Implementations wrap whatever widget actually draws the calendar; the
/// synchronizer only needs to read and move its view and date.
pub trait CalendarWidget: Send {
    fn view(&self) -> ViewMode;

    fn change_view(&mut self, view: ViewMode);

    fn date(&self) -> NaiveDate;

    fn goto_date(&mut self, date: NaiveDate);

    fn prev(&mut self);

    fn next(&mut self);

    fn today(&mut self, today: NaiveDate);
}

/// Widget state without a renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadlessWidget {
    view: ViewMode,
    date: NaiveDate,
}

impl HeadlessWidget {
    pub fn new(view: ViewMode, date: NaiveDate) -> Self {
        Self { view, date }
    }
}

impl CalendarWidget for HeadlessWidget {
    fn view(&self) -> ViewMode {
        self.view
    }

    fn change_view(&mut self, view: ViewMode) {
        self.view = view;
    }

    fn date(&self) -> NaiveDate {
        self.date
    }

    fn goto_date(&mut self, date: NaiveDate) {
        self.date = date;
    }

    fn prev(&mut self) {
        self.date = self.view.shift(self.date, false);
    }

    fn next(&mut self) {
        self.date = self.view.shift(self.date, true);
    }

    fn today(&mut self, today: NaiveDate) {
        self.date = today;
    }
}
