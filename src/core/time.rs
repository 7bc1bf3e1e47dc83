use time::{format_description::well_known::Rfc3339, Duration, OffsetDateTime, PrimitiveDateTime};

pub(crate) fn primitive_now_utc() -> PrimitiveDateTime {
    let now = OffsetDateTime::now_utc();
    PrimitiveDateTime::new(now.date(), now.time())
}

pub(crate) fn format_primitive(value: PrimitiveDateTime) -> String {
    value.assume_utc().format(&Rfc3339).unwrap_or_else(|_| value.assume_utc().to_string())
}

/// Start of the window reaching back `weeks` whole weeks from `now`.
pub(crate) fn weeks_back(now: PrimitiveDateTime, weeks: i64) -> PrimitiveDateTime {
    now - Duration::weeks(weeks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::{Date, Month, Time};

    fn datetime(year: i32, month: Month, day: u8) -> PrimitiveDateTime {
        let date = Date::from_calendar_date(year, month, day).unwrap();
        PrimitiveDateTime::new(date, Time::from_hms(10, 20, 30).unwrap())
    }

    #[test]
    fn format_primitive_outputs_utc_z() {
        assert_eq!(format_primitive(datetime(2025, Month::January, 2)), "2025-01-02T10:20:30Z");
    }

    #[test]
    fn weeks_back_crosses_month_boundaries() {
        let now = datetime(2025, Month::March, 3);
        assert_eq!(weeks_back(now, 5), datetime(2025, Month::January, 27));
    }
}
