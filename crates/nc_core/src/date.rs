use chrono::{NaiveDate, Utc};

/// Today's calendar date in UTC, `YYYY-MM-DD`.
pub fn today_utc() -> String {
    Utc::now().date_naive().format("%Y-%m-%d").to_string()
}

pub fn podcast_filename(date: &str) -> String {
    format!("daily-news-{}.mp3", date)
}

pub fn is_valid_date(date: &str) -> bool {
    date.len() == 10 && NaiveDate::parse_from_str(date, "%Y-%m-%d").is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_podcast_filename() {
        assert_eq!(podcast_filename("2024-03-05"), "daily-news-2024-03-05.mp3");
    }

    #[test]
    fn test_today_is_a_calendar_date() {
        let today = today_utc();
        assert!(is_valid_date(&today), "unexpected date {}", today);
    }

    #[test]
    fn test_is_valid_date() {
        assert!(is_valid_date("2024-02-29"));
        assert!(!is_valid_date("2023-02-29"));
        assert!(!is_valid_date("2024-3-5"));
        assert!(!is_valid_date("yesterday"));
    }
}
