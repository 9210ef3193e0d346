use chrono_tz::Tz;

use crate::models::TimeZoneEntry;

pub const TIME_ZONES: [TimeZoneEntry; 4] = [
    TimeZoneEntry {
        city_id: "new-york",
        label: "New York",
        iana_name: "America/New_York",
    },
    TimeZoneEntry {
        city_id: "london",
        label: "London",
        iana_name: "Europe/London",
    },
    TimeZoneEntry {
        city_id: "beijing",
        label: "Beijing",
        iana_name: "Asia/Shanghai",
    },
    TimeZoneEntry {
        city_id: "tokyo",
        label: "Tokyo",
        iana_name: "Asia/Tokyo",
    },
];

impl TimeZoneEntry {
    pub fn tz(&self) -> Option<Tz> {
        self.iana_name.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_zone_resolves() {
        for zone in &TIME_ZONES {
            assert!(zone.tz().is_some(), "{} did not parse", zone.iana_name);
        }
    }

    #[test]
    fn city_ids_are_unique() {
        for (i, a) in TIME_ZONES.iter().enumerate() {
            for b in &TIME_ZONES[i + 1..] {
                assert_ne!(a.city_id, b.city_id);
            }
        }
    }
}
