// File: ./src/model/display.rs
use crate::model::item::{ConferenceInstance, DateField};
use chrono::{DateTime, Local, Utc};

pub const PASSED_LABEL: &str = "Deadline passed";
pub const PLACEHOLDER_LABEL: &str = "TBD";

const MS_PER_SECOND: i64 = 1000;
const MS_PER_MINUTE: i64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;
const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;

/// Time remaining until `deadline`, as `DDd HHh MMm SSs`.
///
/// Returns an empty string for a missing or malformed deadline and
/// [`PASSED_LABEL`] once the deadline is at or before `now`.
pub fn countdown(deadline: Option<&DateField>, now: DateTime<Utc>) -> String {
    let Some(field) = deadline else {
        return String::new();
    };
    let Some(at) = field.instant() else {
        return String::new();
    };

    let diff = (at - now).num_milliseconds();
    if diff <= 0 {
        return PASSED_LABEL.to_string();
    }

    let days = diff / MS_PER_DAY;
    let hours = (diff / MS_PER_HOUR) % 24;
    let minutes = (diff / MS_PER_MINUTE) % 60;
    let seconds = (diff / MS_PER_SECOND) % 60;

    format!(
        "{:02}d {:02}h {:02}m {:02}s",
        days, hours, minutes, seconds
    )
}

/// `MM/DD/YYYY` in local time, or the placeholder when absent or unparseable.
pub fn format_card_date(field: Option<&DateField>) -> String {
    field
        .and_then(DateField::instant)
        .map(|dt| dt.with_timezone(&Local).format("%m/%d/%Y").to_string())
        .unwrap_or_else(|| PLACEHOLDER_LABEL.to_string())
}

pub trait ConferenceDisplay {
    fn title(&self) -> String;
    fn countdown(&self, now: DateTime<Utc>) -> String;
    fn countdown_label(&self, now: DateTime<Utc>) -> String;
    fn date_label(&self) -> String;
    fn deadline_label(&self) -> String;
    fn notification_label(&self) -> String;
}

impl ConferenceDisplay for ConferenceInstance {
    fn title(&self) -> String {
        match self.year {
            Some(y) => format!("{} {}", self.name, y),
            None => self.name.clone(),
        }
    }

    fn countdown(&self, now: DateTime<Utc>) -> String {
        countdown(self.deadline.as_ref(), now)
    }

    fn countdown_label(&self, now: DateTime<Utc>) -> String {
        let text = self.countdown(now);
        if text.is_empty() {
            PLACEHOLDER_LABEL.to_string()
        } else {
            text
        }
    }

    fn date_label(&self) -> String {
        format_card_date(self.date.as_ref())
    }

    fn deadline_label(&self) -> String {
        format_card_date(self.deadline.as_ref())
    }

    fn notification_label(&self) -> String {
        format_card_date(self.notification_date.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_countdown_boundaries() {
        let now = Utc::now();
        let past = DateField::from_instant(now - Duration::seconds(1));
        let exact = DateField::from_instant(now);
        let later = DateField::from_instant(now + Duration::seconds(90061));

        assert_eq!(countdown(Some(&past), now), PASSED_LABEL);
        assert_eq!(countdown(Some(&exact), now), PASSED_LABEL);
        assert_eq!(countdown(Some(&later), now), "01d 01h 01m 01s");
        assert_eq!(countdown(None, now), "");
    }

    #[test]
    fn test_countdown_malformed_is_empty() {
        let now = Utc::now();
        assert_eq!(countdown(Some(&DateField::parse("TBA")), now), "");
    }

    #[test]
    fn test_countdown_wide_day_field() {
        let now = Utc::now();
        let far = DateField::from_instant(now + Duration::days(123) + Duration::seconds(5));
        assert_eq!(countdown(Some(&far), now), "123d 00h 00m 05s");
    }

    #[test]
    fn test_countdown_sub_second_remaining() {
        let now = Utc::now();
        let soon = DateField::from_instant(now + Duration::milliseconds(400));
        assert_eq!(countdown(Some(&soon), now), "00d 00h 00m 00s");
    }

    #[test]
    fn test_card_labels_fall_back() {
        let mut c = ConferenceInstance::new("PLDI", Some(2026));
        c.date = Some(DateField::parse("June, somewhere"));
        assert_eq!(c.title(), "PLDI 2026");
        assert_eq!(c.date_label(), PLACEHOLDER_LABEL);
        assert_eq!(c.deadline_label(), PLACEHOLDER_LABEL);
        assert_eq!(c.notification_label(), PLACEHOLDER_LABEL);
        assert_eq!(c.countdown_label(Utc::now()), PLACEHOLDER_LABEL);
    }

    #[test]
    fn test_card_date_format() {
        let field = DateField::parse("2025-07-04 12:00");
        assert_eq!(format_card_date(Some(&field)), "07/04/2025");
    }
}
