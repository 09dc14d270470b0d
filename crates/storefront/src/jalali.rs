//! Solar Hijri (Jalali) calendar dates for display.
//!
//! Marketplace timestamps are UTC; they are shown in Tehran time.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Utc};

use bazaar_core::types::contact::persian_digits;

const MONTHS: [&str; 12] = [
    "فروردین",
    "اردیبهشت",
    "خرداد",
    "تیر",
    "مرداد",
    "شهریور",
    "مهر",
    "آبان",
    "آذر",
    "دی",
    "بهمن",
    "اسفند",
];

/// Tehran is UTC+03:30 with no daylight saving time.
const TEHRAN_OFFSET_SECS: i32 = 3 * 3600 + 30 * 60;

/// A date in the Jalali calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JalaliDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl JalaliDate {
    /// Convert a Gregorian calendar date.
    #[must_use]
    pub fn from_gregorian(date: NaiveDate) -> Self {
        const MONTH_OFFSETS: [i32; 12] = [0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334];

        let gy = date.year();
        let gm = date.month();
        let gd = i32::try_from(date.day()).unwrap_or(1);
        let gy2 = if gm > 2 { gy + 1 } else { gy };
        let month_offset = MONTH_OFFSETS
            .get(usize::try_from(gm).unwrap_or(1).saturating_sub(1))
            .copied()
            .unwrap_or(0);

        let mut days = 355_666 + 365 * gy + (gy2 + 3) / 4 - (gy2 + 99) / 100
            + (gy2 + 399) / 400
            + gd
            + month_offset;

        let mut year = -1595 + 33 * (days / 12_053);
        days %= 12_053;
        year += 4 * (days / 1461);
        days %= 1461;
        if days > 365 {
            year += (days - 1) / 365;
            days = (days - 1) % 365;
        }

        let (month, day) = if days < 186 {
            (1 + days / 31, 1 + days % 31)
        } else {
            (7 + (days - 186) / 30, 1 + (days - 186) % 30)
        };

        Self {
            year,
            month: u32::try_from(month).unwrap_or(1),
            day: u32::try_from(day).unwrap_or(1),
        }
    }

    /// The Tehran calendar date of a UTC timestamp.
    #[must_use]
    pub fn from_utc(timestamp: DateTime<Utc>) -> Self {
        let local = FixedOffset::east_opt(TEHRAN_OFFSET_SECS)
            .map_or_else(|| timestamp.date_naive(), |tz| timestamp.with_timezone(&tz).date_naive());
        Self::from_gregorian(local)
    }

    #[must_use]
    pub fn month_name(&self) -> &'static str {
        usize::try_from(self.month)
            .ok()
            .and_then(|m| MONTHS.get(m.wrapping_sub(1)))
            .copied()
            .unwrap_or("")
    }

    /// Numeric form with Persian digits, e.g. `۱۴۰۳/۱/۱`.
    #[must_use]
    pub fn short(&self) -> String {
        persian_digits(&format!("{}/{}/{}", self.year, self.month, self.day))
    }

    /// Long form with Persian digits, e.g. `۱ فروردین ۱۴۰۳`.
    #[must_use]
    pub fn long(&self) -> String {
        format!(
            "{} {} {}",
            persian_digits(&self.day.to_string()),
            self.month_name(),
            persian_digits(&self.year.to_string())
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn jalali(y: i32, m: u32, d: u32) -> JalaliDate {
        JalaliDate::from_gregorian(NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    #[test]
    fn test_nowruz_dates() {
        let expected = JalaliDate { year: 1403, month: 1, day: 1 };
        assert_eq!(jalali(2024, 3, 20), expected);
        assert_eq!(jalali(2025, 3, 21), JalaliDate { year: 1404, month: 1, day: 1 });
        assert_eq!(jalali(2024, 3, 19), JalaliDate { year: 1402, month: 12, day: 29 });
    }

    #[test]
    fn test_known_dates() {
        assert_eq!(jalali(1979, 2, 11), JalaliDate { year: 1357, month: 11, day: 22 });
        assert_eq!(jalali(2000, 1, 1), JalaliDate { year: 1378, month: 10, day: 11 });
        assert_eq!(jalali(2025, 10, 19), JalaliDate { year: 1404, month: 7, day: 27 });
    }

    #[test]
    fn test_formats() {
        let date = jalali(2024, 3, 20);
        assert_eq!(date.short(), "۱۴۰۳/۱/۱");
        assert_eq!(date.long(), "۱ فروردین ۱۴۰۳");
    }

    #[test]
    fn test_utc_timestamps_use_tehran_day() {
        // 21:00 UTC on 19 March is 00:30 on 20 March in Tehran.
        let late = Utc.with_ymd_and_hms(2024, 3, 19, 21, 0, 0).unwrap();
        assert_eq!(JalaliDate::from_utc(late), JalaliDate { year: 1403, month: 1, day: 1 });
    }
}
