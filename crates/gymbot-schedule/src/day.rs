use chrono::Weekday;

/// Parse a day slot value ("Monday", "monday", "Mon") into a weekday.
pub fn parse_day(value: &str) -> Option<Weekday> {
    value.trim().parse::<Weekday>().ok()
}

/// Full English name, as spoken back to the user.
pub fn day_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}
