use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a launch goes. The numeric id (1-7) is the wire and storage form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum Destination {
    Mars = 1,
    Moon = 2,
    Pluto = 3,
    AsteroidBelt = 4,
    Europa = 5,
    Titan = 6,
    Ganymede = 7,
}

impl Destination {
    pub const ALL: [Destination; 7] = [
        Destination::Mars,
        Destination::Moon,
        Destination::Pluto,
        Destination::AsteroidBelt,
        Destination::Europa,
        Destination::Titan,
        Destination::Ganymede,
    ];

    pub fn id(self) -> u8 {
        self as u8
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Destination::Mars => "Mars",
            Destination::Moon => "Moon",
            Destination::Pluto => "Pluto",
            Destination::AsteroidBelt => "Asteroid Belt",
            Destination::Europa => "Europa",
            Destination::Titan => "Titan",
            Destination::Ganymede => "Ganymede",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("destination id {0} is outside the range 1-7")]
pub struct InvalidDestination(pub i64);

impl TryFrom<u8> for Destination {
    type Error = InvalidDestination;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Destination::ALL
            .iter()
            .copied()
            .find(|d| d.id() == value)
            .ok_or(InvalidDestination(value as i64))
    }
}

// Postgres SMALLINT columns decode as i16.
impl TryFrom<i16> for Destination {
    type Error = InvalidDestination;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .map_err(|_| InvalidDestination(value as i64))
            .and_then(Destination::try_from)
    }
}

impl From<Destination> for u8 {
    fn from(value: Destination) -> Self {
        value.id()
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}
