//! Month-grid date picker
//!
//! The month cursor moves independently of the selected date. The picker
//! holds no appointment data; it only emits the date the user picked.

use chrono::{Datelike, Duration, Months, NaiveDate};

/// Cells in the grid: six weeks of seven days
pub const GRID_CELLS: usize = 42;

/// Predicate deciding which dates cannot be picked
pub type DisabledPredicate = Box<dyn Fn(NaiveDate) -> bool + Send + Sync>;

/// Disables every date before `today`
pub fn past_dates(today: NaiveDate) -> DisabledPredicate {
    Box::new(move |date| date < today)
}

/// One day of the month grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayCell {
    pub date: NaiveDate,
    pub is_today: bool,
    pub is_selected: bool,
    pub is_disabled: bool,
}

/// Calendar state machine
pub struct CalendarPicker {
    month: NaiveDate,
    today: NaiveDate,
    selected: Option<NaiveDate>,
    disabled: DisabledPredicate,
}

impl CalendarPicker {
    /// Opens on the month of `selected`, or of `today` when nothing is selected
    pub fn new(today: NaiveDate, selected: Option<NaiveDate>) -> Self {
        Self {
            month: first_of_month(selected.unwrap_or(today)),
            today,
            selected,
            disabled: Box::new(|_| false),
        }
    }

    /// Replaces the disabled-date predicate
    pub fn with_disabled(mut self, predicate: DisabledPredicate) -> Self {
        self.disabled = predicate;
        self
    }

    /// First day of the displayed month
    pub fn current_month(&self) -> NaiveDate {
        self.month
    }

    /// e.g. "March 2025"
    pub fn month_label(&self) -> String {
        self.month.format("%B %Y").to_string()
    }

    pub fn next_month(&mut self) {
        self.month = self.month + Months::new(1);
    }

    pub fn previous_month(&mut self) {
        self.month = self.month - Months::new(1);
    }

    /// Moves the cursor to the month containing `date`
    pub fn show_month(&mut self, date: NaiveDate) {
        self.month = first_of_month(date);
    }

    pub fn selected(&self) -> Option<NaiveDate> {
        self.selected
    }

    pub fn is_disabled(&self, date: NaiveDate) -> bool {
        (self.disabled)(date)
    }

    /// Picks `date`, returning it unless it is disabled
    pub fn select(&mut self, date: NaiveDate) -> Option<NaiveDate> {
        if self.is_disabled(date) {
            return None;
        }
        self.selected = Some(date);
        Some(date)
    }

    /// The 6x7 grid, Sunday first, with blanks before the 1st and after the last day
    pub fn cells(&self) -> Vec<Option<DayCell>> {
        let lead = self.month.weekday().num_days_from_sunday() as usize;
        let mut cells = vec![None; GRID_CELLS];

        let mut date = self.month;
        let mut slot = lead;
        while date.month() == self.month.month() && slot < GRID_CELLS {
            cells[slot] = Some(DayCell {
                date,
                is_today: date == self.today,
                is_selected: self.selected == Some(date),
                is_disabled: self.is_disabled(date),
            });
            date += Duration::days(1);
            slot += 1;
        }

        cells
    }

    /// The grid split into weeks
    pub fn weeks(&self) -> Vec<Vec<Option<DayCell>>> {
        self.cells().chunks(7).map(<[_]>::to_vec).collect()
    }
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_grid_pads_to_weekday() {
        // March 2025 starts on a Saturday
        let picker = CalendarPicker::new(ymd(2025, 3, 14), None);
        let cells = picker.cells();

        assert_eq!(cells.len(), GRID_CELLS);
        assert!(cells[..6].iter().all(Option::is_none));
        assert_eq!(cells[6].unwrap().date, ymd(2025, 3, 1));
        assert_eq!(cells[36].unwrap().date, ymd(2025, 3, 31));
        assert!(cells[37..].iter().all(Option::is_none));
        assert!(cells[19].unwrap().is_today);
        assert_eq!(picker.weeks().len(), 6);
    }

    #[test]
    fn test_past_dates_are_disabled() {
        let today = ymd(2025, 3, 14);
        let mut picker = CalendarPicker::new(today, Some(today)).with_disabled(past_dates(today));

        assert!(picker.is_disabled(ymd(2025, 3, 13)));
        assert_eq!(picker.select(ymd(2025, 3, 13)), None);
        assert_eq!(picker.selected(), Some(today));

        assert_eq!(picker.select(ymd(2025, 3, 20)), Some(ymd(2025, 3, 20)));
        let selected: Vec<_> = picker
            .cells()
            .into_iter()
            .flatten()
            .filter(|cell| cell.is_selected)
            .collect();
        assert_eq!(selected.len(), 1);
    }

    #[test]
    fn test_month_navigation_is_independent_of_selection() {
        let mut picker = CalendarPicker::new(ymd(2025, 1, 31), Some(ymd(2025, 1, 31)));
        picker.next_month();
        assert_eq!(picker.current_month(), ymd(2025, 2, 1));
        assert_eq!(picker.month_label(), "February 2025");
        picker.previous_month();
        picker.previous_month();
        assert_eq!(picker.current_month(), ymd(2024, 12, 1));
        assert_eq!(picker.selected(), Some(ymd(2025, 1, 31)));
    }
}
