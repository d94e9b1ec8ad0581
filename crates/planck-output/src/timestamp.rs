// ─────────────────────────────────────────────────────────────────────
// Planck Epoch Lab — Run Timestamps
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! `YYYYMMDD_HHMMSS` stamps (local time) used in output file names.

use chrono::{DateTime, Local, TimeZone};

pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

pub fn format_timestamp<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format(TIMESTAMP_FORMAT).to_string()
}

pub fn timestamp_now() -> String {
    format_timestamp(&Local::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    #[test]
    fn test_known_instants() {
        let at = NaiveDate::from_ymd_opt(2025, 8, 28)
            .and_then(|d| d.and_hms_opt(20, 21, 32))
            .unwrap()
            .and_utc();
        assert_eq!(format_timestamp(&at), "20250828_202132");

        let leap = Utc.with_ymd_and_hms(2000, 2, 29, 0, 0, 0).unwrap();
        assert_eq!(format_timestamp(&leap), "20000229_000000");
    }

    #[test]
    fn test_now_shape() {
        let ts = timestamp_now();
        assert_eq!(ts.len(), 15);
        assert_eq!(&ts[8..9], "_");
        assert!(ts.chars().filter(|c| *c != '_').all(|c| c.is_ascii_digit()));
    }
}
