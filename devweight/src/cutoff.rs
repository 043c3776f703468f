// SPDX-License-Identifier: Apache-2.0

//! Calendar arithmetic for the start of the contribution window.

use anyhow::{Context as _, Result};
use jiff::{civil::Date, tz::TimeZone, Timestamp};

/// Step a date back by whole calendar months.
///
/// The day of the month is kept where possible and otherwise clamped to the
/// last day of the target month, so the 31st of March steps back six months
/// to the 30th of September.
pub fn months_before(date: Date, months: u16) -> Result<Date> {
	let index = i32::from(date.year()) * 12 + i32::from(date.month()) - 1 - i32::from(months);

	let year = i16::try_from(index.div_euclid(12))
		.with_context(|| format!("{} months before {} is out of range", months, date))?;
	// Always within 1..=12.
	let month = (index.rem_euclid(12) + 1) as i8;

	let first = Date::new(year, month, 1)?;
	let day = date.day().min(first.days_in_month());

	Ok(Date::new(year, month, day)?)
}

/// The earliest commit time counted for a window of `months` ending at `now`.
///
/// The calculation is done in UTC and keeps the time of day from `now`.
pub fn cutoff(now: Timestamp, months: u16) -> Result<Timestamp> {
	let now = now.to_zoned(TimeZone::UTC).datetime();
	let date = months_before(now.date(), months)?;

	let start = date
		.to_datetime(now.time())
		.to_zoned(TimeZone::UTC)?
		.timestamp();

	Ok(start)
}

#[cfg(test)]
mod tests {
	use super::*;
	use jiff::civil::date;

	#[test]
	fn clamps_to_shorter_month() {
		assert_eq!(months_before(date(2024, 3, 31), 6).unwrap(), date(2023, 9, 30));
	}

	#[test]
	fn keeps_day_when_it_fits() {
		assert_eq!(months_before(date(2024, 1, 31), 6).unwrap(), date(2023, 7, 31));
		assert_eq!(months_before(date(2024, 7, 15), 6).unwrap(), date(2024, 1, 15));
	}

	#[test]
	fn clamps_to_leap_day() {
		assert_eq!(months_before(date(2024, 8, 31), 6).unwrap(), date(2024, 2, 29));
		assert_eq!(months_before(date(2023, 8, 31), 6).unwrap(), date(2023, 2, 28));
	}

	#[test]
	fn crosses_several_years() {
		assert_eq!(months_before(date(2024, 2, 10), 26).unwrap(), date(2021, 12, 10));
		assert_eq!(months_before(date(2024, 5, 5), 0).unwrap(), date(2024, 5, 5));
	}

	#[test]
	fn cutoff_keeps_time_of_day() {
		let now: Timestamp = "2024-03-31T17:45:12Z".parse().unwrap();
		let expected: Timestamp = "2023-09-30T17:45:12Z".parse().unwrap();
		assert_eq!(cutoff(now, 6).unwrap(), expected);
	}
}
