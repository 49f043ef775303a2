use crate::Direction;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::{fmt, str::FromStr};

/// A classified gesture. Produced once per trigger press/release.
///
/// Displayed (and parsed) as `up`, `up+right`, `UD_REPEAT` or `LR_REPEAT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gesture {
    Simple(Direction),
    /// First two segments of a multi-segment stroke. The directions always differ.
    Compound(Direction, Direction),
    UpDownRepeat,
    LeftRightRepeat,
}

const UD_REPEAT: &str = "UD_REPEAT";
const LR_REPEAT: &str = "LR_REPEAT";

impl Gesture {
    /// Builds a compound gesture, or None for the degenerate same-direction pair
    pub fn compound(first: Direction, second: Direction) -> Option<Self> {
        if first == second {
            None
        } else {
            Some(Gesture::Compound(first, second))
        }
    }

    /// Every gesture a recognizer can produce: 4 simple, 12 compound and 2 repeats
    pub fn all() -> Vec<Gesture> {
        let mut gestures = Vec::with_capacity(18);
        for d in Direction::ALL.iter() {
            gestures.push(Gesture::Simple(*d));
        }
        for first in Direction::ALL.iter() {
            for second in Direction::ALL.iter() {
                if let Some(g) = Gesture::compound(*first, *second) {
                    gestures.push(g);
                }
            }
        }
        gestures.push(Gesture::UpDownRepeat);
        gestures.push(Gesture::LeftRightRepeat);
        gestures
    }

    /// Arrow glyphs for showing the gesture to the user
    pub fn arrows(&self) -> String {
        match self {
            Gesture::Simple(d) => d.arrow().to_string(),
            Gesture::Compound(a, b) => format!("{}{}", a.arrow(), b.arrow()),
            Gesture::UpDownRepeat => "↕".to_owned(),
            Gesture::LeftRightRepeat => "↔".to_owned(),
        }
    }
}

impl fmt::Display for Gesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gesture::Simple(d) => write!(f, "{}", d),
            Gesture::Compound(a, b) => write!(f, "{}+{}", a, b),
            Gesture::UpDownRepeat => f.write_str(UD_REPEAT),
            Gesture::LeftRightRepeat => f.write_str(LR_REPEAT),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseGestureError(String);

impl fmt::Display for ParseGestureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid gesture: {:?}", self.0)
    }
}

impl std::error::Error for ParseGestureError {}

impl FromStr for Gesture {
    type Err = ParseGestureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseGestureError(s.to_owned());
        match s {
            UD_REPEAT => return Ok(Gesture::UpDownRepeat),
            LR_REPEAT => return Ok(Gesture::LeftRightRepeat),
            _ => {}
        }

        let mut parts = s.split('+');
        let first = parts.next().ok_or_else(err)?.parse().map_err(|_| err())?;
        match (parts.next(), parts.next()) {
            (None, _) => Ok(Gesture::Simple(first)),
            (Some(second), None) => {
                let second = second.parse().map_err(|_| err())?;
                Gesture::compound(first, second).ok_or_else(err)
            }
            (Some(_), Some(_)) => Err(err()),
        }
    }
}

impl Serialize for Gesture {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Gesture {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}
