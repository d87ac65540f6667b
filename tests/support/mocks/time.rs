// tests/support/mocks/time.rs
use chrono::NaiveDate;
use once_cell::sync::Lazy;

static LAUNCH_DAY: Lazy<NaiveDate> = Lazy::new(|| {
    NaiveDate::parse_from_str("2024-01-15", "%Y-%m-%d")
        .expect("invalid date in tests/support/mocks/time.rs")
});

/// Fixed date used as a slug source.
pub fn launch_day() -> NaiveDate {
    *LAUNCH_DAY
}
