use chrono::{DateTime, Timelike, Utc};
use chrono_tz::Tz;

use crate::models::{ClockFace, Hand, HandRole};
use crate::zones::TIME_ZONES;

// ─── Errors ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClockError {
    #[error("no clock face registered for {0}")]
    MissingFace(&'static str),
    #[error("clock face for {city} has no {role} hand")]
    MissingHand { city: &'static str, role: &'static str },
    #[error("unknown time zone {0}")]
    UnknownZone(&'static str),
}

// ─── Angles ─────────────────────────────────────────────────────────────────

/// Hand rotations in degrees, 0 at 12 o'clock, increasing clockwise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandAngles {
    pub hour: f64,
    pub minute: f64,
    pub second: f64,
}

impl HandAngles {
    pub fn from_hms(hours: u32, minutes: u32, seconds: u32) -> Self {
        let h = f64::from(hours % 12);
        let m = f64::from(minutes);
        let s = f64::from(seconds);
        Self {
            hour: (h + m / 60.0) / 12.0 * 360.0,
            minute: (m + s / 60.0) / 60.0 * 360.0,
            second: s / 60.0 * 360.0,
        }
    }

    pub fn for_role(&self, role: HandRole) -> f64 {
        match role {
            HandRole::Hour => self.hour,
            HandRole::Minute => self.minute,
            HandRole::Second => self.second,
        }
    }
}

/// 24-hour wall-clock components of `now` in `tz`.
pub fn wall_clock(now: DateTime<Utc>, tz: Tz) -> (u32, u32, u32) {
    let local = now.with_timezone(&tz);
    (local.hour(), local.minute(), local.second())
}

pub fn digital_readout(hours: u32, minutes: u32) -> String {
    format!("{hours:02}:{minutes:02}")
}

/// End point of a hand of `length` rotated `degrees` clockwise from 12, on
/// a plane with +y pointing up.
pub fn hand_tip(degrees: f64, length: f64) -> (f64, f64) {
    let rad = degrees.to_radians();
    (length * rad.sin(), length * rad.cos())
}

// ─── Faces ──────────────────────────────────────────────────────────────────

/// Appends the hour, minute and second hands. Call once per face.
pub fn create_clock(face: &mut ClockFace) {
    for role in HandRole::ALL {
        face.hands.push(Hand { role, rotation: 0.0 });
    }
}

/// Registry of clock faces keyed by city id, built once at startup.
#[derive(Debug, Clone, Default)]
pub struct ClockBoard {
    faces: Vec<(&'static str, ClockFace)>,
}

impl ClockBoard {
    /// One face per configured time zone, each with its hands attached.
    pub fn new() -> Self {
        let mut board = Self::default();
        for zone in &TIME_ZONES {
            let mut face = ClockFace::default();
            create_clock(&mut face);
            board.insert(zone.city_id, face);
        }
        board
    }

    pub fn insert(&mut self, city_id: &'static str, face: ClockFace) {
        match self.faces.iter_mut().find(|(id, _)| *id == city_id) {
            Some((_, existing)) => *existing = face,
            None => self.faces.push((city_id, face)),
        }
    }

    pub fn face(&self, city_id: &str) -> Option<&ClockFace> {
        self.faces
            .iter()
            .find(|(id, _)| *id == city_id)
            .map(|(_, f)| f)
    }

    fn face_mut(&mut self, city_id: &str) -> Option<&mut ClockFace> {
        self.faces
            .iter_mut()
            .find(|(id, _)| *id == city_id)
            .map(|(_, f)| f)
    }
}

/// Writes current hand rotations and the digital readout for every zone.
///
/// A zone whose face or hands are missing is reported and skipped; the
/// remaining zones are still updated.
pub fn update_clocks(board: &mut ClockBoard, now: DateTime<Utc>) -> Vec<ClockError> {
    let mut errors = Vec::new();

    for zone in &TIME_ZONES {
        let Some(tz) = zone.tz() else {
            errors.push(ClockError::UnknownZone(zone.iana_name));
            continue;
        };
        let Some(face) = board.face_mut(zone.city_id) else {
            errors.push(ClockError::MissingFace(zone.city_id));
            continue;
        };

        let (h, m, s) = wall_clock(now, tz);
        let angles = HandAngles::from_hms(h, m, s);

        for role in HandRole::ALL {
            let mut found = false;
            for hand in face.hands.iter_mut().filter(|hand| hand.role == role) {
                hand.rotation = angles.for_role(role);
                found = true;
            }
            if !found {
                errors.push(ClockError::MissingHand {
                    city: zone.city_id,
                    role: role.as_str(),
                });
            }
        }

        face.digital = digital_readout(h, m);
    }

    for err in &errors {
        tracing::warn!(error = %err, "clock update skipped");
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    fn rotation(face: &ClockFace, role: HandRole) -> f64 {
        face.hands.iter().find(|h| h.role == role).unwrap().rotation
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!((actual - expected).abs() < 1e-9, "{actual} != {expected}");
    }

    #[test]
    fn angles_at_known_times() {
        let a = HandAngles::from_hms(0, 0, 0);
        assert_eq!((a.hour, a.minute, a.second), (0.0, 0.0, 0.0));

        let a = HandAngles::from_hms(15, 30, 0);
        assert_close(a.hour, 105.0);
        assert_close(a.minute, 180.0);
        assert_close(a.second, 0.0);

        let a = HandAngles::from_hms(12, 0, 45);
        assert_close(a.hour, 0.0);
        assert_close(a.minute, 4.5);
        assert_close(a.second, 270.0);
    }

    #[test]
    fn angles_stay_in_range_and_grow_with_seconds() {
        for h in 0..24 {
            for m in 0..60 {
                let mut prev: Option<HandAngles> = None;
                for s in 0..60 {
                    let a = HandAngles::from_hms(h, m, s);
                    for deg in [a.hour, a.minute, a.second] {
                        assert!((0.0..360.0).contains(&deg), "{h}:{m}:{s} -> {deg}");
                    }
                    if let Some(p) = prev {
                        assert!(a.second > p.second);
                        assert!(a.minute > p.minute);
                        assert_eq!(a.hour, p.hour);
                    }
                    prev = Some(a);
                }
            }
        }
    }

    #[test]
    fn readout_is_zero_padded() {
        assert_eq!(digital_readout(7, 5), "07:05");
        assert_eq!(digital_readout(23, 59), "23:59");
    }

    #[test]
    fn hand_tips_point_clockwise_from_twelve() {
        let (x, y) = hand_tip(0.0, 1.0);
        assert_close(x, 0.0);
        assert_close(y, 1.0);
        let (x, y) = hand_tip(90.0, 0.5);
        assert_close(x, 0.5);
        assert_close(y, 0.0);
        let (x, y) = hand_tip(180.0, 1.0);
        assert_close(x, 0.0);
        assert_close(y, -1.0);
    }

    #[test]
    fn create_clock_duplicates_when_called_twice() {
        let mut face = ClockFace::default();
        create_clock(&mut face);
        assert_eq!(face.hands.len(), 3);
        create_clock(&mut face);
        assert_eq!(face.hands.len(), 6);
    }

    #[test]
    fn update_writes_zone_local_time() {
        let mut board = ClockBoard::new();
        // 12:00 UTC in January: London 12:00, New York 07:00, Beijing 20:00, Tokyo 21:00.
        let errors = update_clocks(&mut board, at(2025, 1, 15, 12, 0, 30));
        assert!(errors.is_empty());

        assert_eq!(board.face("london").unwrap().digital, "12:00");
        assert_eq!(board.face("new-york").unwrap().digital, "07:00");
        assert_eq!(board.face("beijing").unwrap().digital, "20:00");
        assert_eq!(board.face("tokyo").unwrap().digital, "21:00");

        let tokyo = board.face("tokyo").unwrap();
        assert_close(rotation(tokyo, HandRole::Hour), 270.0);
        assert_close(rotation(tokyo, HandRole::Minute), 3.0);
        assert_close(rotation(tokyo, HandRole::Second), 180.0);
    }

    #[test]
    fn update_follows_daylight_saving() {
        let mut board = ClockBoard::new();
        update_clocks(&mut board, at(2025, 7, 15, 12, 0, 0));
        assert_eq!(board.face("london").unwrap().digital, "13:00");
        assert_eq!(board.face("new-york").unwrap().digital, "08:00");
    }

    #[test]
    fn missing_face_is_reported_and_others_still_update() {
        let mut board = ClockBoard::default();
        let mut face = ClockFace::default();
        create_clock(&mut face);
        board.insert("london", face);

        let errors = update_clocks(&mut board, at(2025, 1, 15, 9, 41, 0));
        assert_eq!(errors.len(), 3);
        assert!(errors.contains(&ClockError::MissingFace("tokyo")));
        assert_eq!(board.face("london").unwrap().digital, "09:41");
    }

    #[test]
    fn missing_hand_is_reported() {
        let mut board = ClockBoard::new();
        board.insert(
            "beijing",
            ClockFace {
                hands: vec![Hand { role: HandRole::Hour, rotation: 0.0 }],
                digital: String::new(),
            },
        );
        let errors = update_clocks(&mut board, at(2025, 1, 15, 0, 0, 0));
        assert_eq!(
            errors,
            vec![
                ClockError::MissingHand { city: "beijing", role: "minute" },
                ClockError::MissingHand { city: "beijing", role: "second" },
            ]
        );
        assert_eq!(board.face("beijing").unwrap().digital, "08:00");
    }
}
