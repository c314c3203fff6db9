//! Series → calendar cells.

use super::{CalendarCell, CalendarView, Direction};
use crate::domain::price_history::{PricePoint, PriceSeries};
use crate::shared::{Clock, Window};
use chrono::{Datelike, Days, Local, NaiveDate, TimeZone};
use rust_decimal::Decimal;

/// Projects a price series onto week and year grids.
///
/// Dates are calendar dates in `tz`, so the user's timezone decides which
/// point lands on which day and which cell is "today".
#[derive(Debug, Clone)]
pub struct CalendarProjector<Tz: TimeZone = Local> {
    tz: Tz,
    today: NaiveDate,
}

impl CalendarProjector<Local> {
    /// Local timezone, today taken from `clock`.
    pub fn local(clock: &dyn Clock) -> Self {
        Self {
            tz: Local,
            today: clock.today_local(),
        }
    }
}

impl<Tz: TimeZone> CalendarProjector<Tz> {
    pub fn new(tz: Tz, today: NaiveDate) -> Self {
        Self { tz, today }
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// Last 7 points, no padding.
    pub fn project_week(&self, series: &PriceSeries) -> CalendarView {
        self.project(series, Window::Week)
    }

    /// Last 365 points, front-padded so the first real cell sits in its
    /// weekday column (Sunday = column 0).
    pub fn project_year(&self, series: &PriceSeries) -> CalendarView {
        self.project(series, Window::Year)
    }

    fn project(&self, series: &PriceSeries, window: Window) -> CalendarView {
        let real = self.real_cells(series.trailing(window.days()));

        let mut cells = match (window, real.first()) {
            (Window::Year, Some(first)) => leading_padding(first.date),
            _ => Vec::new(),
        };
        let leading_padding = cells.len();

        let up_days = real.iter().filter(|c| c.direction == Direction::Up).count();
        let down_days = real
            .iter()
            .filter(|c| c.direction == Direction::Down)
            .count();
        cells.extend(real);

        CalendarView {
            window,
            cells,
            leading_padding,
            up_days,
            down_days,
        }
    }

    fn real_cells(&self, points: &[PricePoint]) -> Vec<CalendarCell> {
        let dated: Vec<(NaiveDate, Decimal)> = points
            .iter()
            .filter_map(|p| match p.date_in(&self.tz) {
                Some(date) => Some((date, p.price)),
                None => {
                    tracing::debug!(timestamp = p.timestamp, "Skipping point with unrepresentable date");
                    None
                }
            })
            .collect();

        let mut previous: Option<Decimal> = None;
        dated
            .into_iter()
            .map(|(date, price)| {
                let (direction, change_percent) = match previous {
                    None => (Direction::Neutral, None),
                    Some(prev) => (direction_between(prev, price), change_percent(prev, price)),
                };
                previous = Some(price);
                CalendarCell {
                    date,
                    price: Some(price),
                    direction,
                    change_percent,
                    is_today: date == self.today,
                }
            })
            .collect()
    }
}

fn direction_between(previous: Decimal, current: Decimal) -> Direction {
    if current >= previous {
        Direction::Up
    } else {
        Direction::Down
    }
}

/// `(current - previous) / previous * 100`; `None` when `previous` is zero.
fn change_percent(previous: Decimal, current: Decimal) -> Option<Decimal> {
    current
        .checked_sub(previous)?
        .checked_div(previous)?
        .checked_mul(Decimal::ONE_HUNDRED)
}

/// Placeholder cells for the days between the start of `first`'s week and `first`.
fn leading_padding(first: NaiveDate) -> Vec<CalendarCell> {
    let count = first.weekday().num_days_from_sunday() as u64;
    (1..=count)
        .rev()
        .filter_map(|back| first.checked_sub_days(Days::new(back)))
        .map(CalendarCell::padding)
        .collect()
}
