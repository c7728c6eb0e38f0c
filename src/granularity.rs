//! Mapping from host timeframe/compression pairs to OANDA candle granularities.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeFrame {
    Ticks,
    MicroSeconds,
    Seconds,
    Minutes,
    Days,
    Weeks,
    Months,
    Years,
}

const GRANULARITIES: &[(TimeFrame, u32, &str)] = &[
    (TimeFrame::Seconds, 5, "S5"),
    (TimeFrame::Seconds, 10, "S10"),
    (TimeFrame::Seconds, 15, "S15"),
    (TimeFrame::Seconds, 30, "S30"),
    (TimeFrame::Minutes, 1, "M1"),
    (TimeFrame::Minutes, 2, "M2"),
    (TimeFrame::Minutes, 4, "M4"),
    (TimeFrame::Minutes, 5, "M5"),
    (TimeFrame::Minutes, 10, "M10"),
    (TimeFrame::Minutes, 15, "M15"),
    (TimeFrame::Minutes, 30, "M30"),
    (TimeFrame::Minutes, 60, "H1"),
    (TimeFrame::Minutes, 120, "H2"),
    (TimeFrame::Minutes, 180, "H3"),
    (TimeFrame::Minutes, 240, "H4"),
    (TimeFrame::Minutes, 360, "H6"),
    (TimeFrame::Minutes, 480, "H8"),
    (TimeFrame::Minutes, 720, "H12"),
    (TimeFrame::Days, 1, "D"),
    (TimeFrame::Weeks, 1, "W"),
    (TimeFrame::Months, 1, "M"),
];

/// Returns the OANDA code, or `None` when the pair has no candle equivalent.
pub fn lookup(timeframe: TimeFrame, compression: u32) -> Option<&'static str> {
    GRANULARITIES
        .iter()
        .find(|(tf, comp, _)| *tf == timeframe && *comp == compression)
        .map(|(_, _, code)| *code)
}

/// Every supported pair with its code.
pub fn supported() -> impl Iterator<Item = (TimeFrame, u32, &'static str)> {
    GRANULARITIES.iter().copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_pairs() {
        assert_eq!(lookup(TimeFrame::Seconds, 5), Some("S5"));
        assert_eq!(lookup(TimeFrame::Minutes, 1), Some("M1"));
        assert_eq!(lookup(TimeFrame::Minutes, 2), Some("M2"));
        assert_eq!(lookup(TimeFrame::Minutes, 60), Some("H1"));
        assert_eq!(lookup(TimeFrame::Minutes, 720), Some("H12"));
        assert_eq!(lookup(TimeFrame::Days, 1), Some("D"));
        assert_eq!(lookup(TimeFrame::Weeks, 1), Some("W"));
        assert_eq!(lookup(TimeFrame::Months, 1), Some("M"));
    }

    #[test]
    fn test_unmapped_pairs() {
        assert_eq!(lookup(TimeFrame::Minutes, 3), None);
        assert_eq!(lookup(TimeFrame::Seconds, 1), None);
        assert_eq!(lookup(TimeFrame::Days, 2), None);
        assert_eq!(lookup(TimeFrame::Ticks, 1), None);
        assert_eq!(lookup(TimeFrame::Years, 1), None);
        assert_eq!(lookup(TimeFrame::Minutes, 0), None);
    }

    #[test]
    fn test_full_table() {
        use TimeFrame::*;
        let expected = [
            (Seconds, 5, "S5"),
            (Seconds, 10, "S10"),
            (Seconds, 15, "S15"),
            (Seconds, 30, "S30"),
            (Minutes, 1, "M1"),
            (Minutes, 2, "M2"),
            (Minutes, 4, "M4"),
            (Minutes, 5, "M5"),
            (Minutes, 10, "M10"),
            (Minutes, 15, "M15"),
            (Minutes, 30, "M30"),
            (Minutes, 60, "H1"),
            (Minutes, 120, "H2"),
            (Minutes, 180, "H3"),
            (Minutes, 240, "H4"),
            (Minutes, 360, "H6"),
            (Minutes, 480, "H8"),
            (Minutes, 720, "H12"),
            (Days, 1, "D"),
            (Weeks, 1, "W"),
            (Months, 1, "M"),
        ];

        for (tf, comp, code) in expected {
            assert_eq!(lookup(tf, comp), Some(code), "{:?}/{}", tf, comp);
        }
        assert_eq!(supported().collect::<Vec<_>>(), expected.to_vec());
    }

    #[test]
    fn test_timeframe_deserialize() {
        let tf: TimeFrame = serde_yaml::from_str("minutes").unwrap();
        assert_eq!(tf, TimeFrame::Minutes);
        let tf: TimeFrame = serde_yaml::from_str("microseconds").unwrap();
        assert_eq!(tf, TimeFrame::MicroSeconds);
    }
}
