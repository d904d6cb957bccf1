use chrono::{Datelike, Duration, NaiveDate};

use super::types::GridDay;
use crate::core::error::{ColonyError, ColonyResult};

/// Six full weeks, always.
pub const GRID_CELLS: usize = 42;

/// Sunday-start month grid: leading days from the previous month, the month
/// itself, then trailing days until 42 cells are filled.
pub fn month_grid(year: i32, month: u32) -> ColonyResult<Vec<GridDay>> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| ColonyError::InvalidInput(format!("invalid month {year}-{month}")))?;
    let leading = i64::from(first.weekday().num_days_from_sunday());
    let start = first - Duration::days(leading);

    Ok((0..GRID_CELLS as i64)
        .map(|offset| {
            let date = start + Duration::days(offset);
            GridDay {
                date,
                in_current_month: date.month() == month && date.year() == year,
            }
        })
        .collect())
}
