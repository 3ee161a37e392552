//! Domain types for bus seat selection and trip booking.
//!
//! Value objects shared by the seating rules, the seat-selection reducer and
//! the trip repository.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use seatmap_core::environment::RandomSource;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// ============================================================================
// Seats
// ============================================================================

/// 1-based seat number as printed on the bus
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SeatNumber(u32);

impl SeatNumber {
    /// Creates a seat number; bounds are checked against a layout, not here
    #[must_use]
    pub const fn new(number: u32) -> Self {
        Self(number)
    }

    /// Returns the raw number
    #[must_use]
    pub const fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for SeatNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for SeatNumber {
    fn from(number: u32) -> Self {
        Self(number)
    }
}

/// Passenger gender used by the adjacency rule
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    /// Male passenger
    #[default]
    Male,
    /// Female passenger
    Female,
}

impl Gender {
    /// The other gender
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Male => Self::Female,
            Self::Female => Self::Male,
        }
    }

    /// Stable lowercase name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a gender string is not recognised
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown gender '{0}' (expected male or female)")]
pub struct ParseGenderError(String);

impl FromStr for Gender {
    type Err = ParseGenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" | "m" => Ok(Self::Male),
            "female" | "f" => Ok(Self::Female),
            _ => Err(ParseGenderError(s.to_string())),
        }
    }
}

/// A single seat on the chart
///
/// Occupancy is fixed once the chart is generated. An occupied seat may have
/// no recorded gender; such a seat never causes an adjacency conflict.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seat {
    /// Seat number (1-based)
    pub number: SeatNumber,
    /// Whether a passenger already holds this seat
    pub occupied: bool,
    /// Gender of the seated passenger, if known
    pub occupant_gender: Option<Gender>,
}

impl Seat {
    /// An empty seat
    #[must_use]
    pub const fn free(number: SeatNumber) -> Self {
        Self {
            number,
            occupied: false,
            occupant_gender: None,
        }
    }

    /// A seat held by a passenger of the given gender
    #[must_use]
    pub const fn occupied_by(number: SeatNumber, gender: Gender) -> Self {
        Self {
            number,
            occupied: true,
            occupant_gender: Some(gender),
        }
    }

    /// Whether the seat is still free
    #[must_use]
    pub const fn is_free(&self) -> bool {
        !self.occupied
    }
}

/// Accepted selection forwarded to the booking flow
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatHandoff {
    /// Selected seat
    pub seat: SeatNumber,
    /// Gender the passenger declared when selecting
    pub gender: Gender,
    /// When the selection was confirmed
    pub confirmed_at: DateTime<Utc>,
}

// ============================================================================
// Trips
// ============================================================================

/// Unique identifier for a booked trip
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TripId(Uuid);

impl TripId {
    /// Create a `TripId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Build a v4 identifier from sixteen random bytes
    #[must_use]
    pub fn from_random_bytes(bytes: [u8; 16]) -> Self {
        Self(uuid::Builder::from_random_bytes(bytes).into_uuid())
    }

    /// Get the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for TripId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of booking
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TripKind {
    /// Intercity bus
    Bus,
    /// Domestic flight
    Flight,
    /// Hotel stay
    Hotel,
}

impl TripKind {
    /// Stable lowercase label (metrics, logs)
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bus => "bus",
            Self::Flight => "flight",
            Self::Hotel => "hotel",
        }
    }
}

impl fmt::Display for TripKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Represents money in minor units (kuruş) to avoid floating-point errors
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Money(u64);

impl Money {
    /// Creates a `Money` value from minor units
    #[must_use]
    pub const fn from_minor(minor: u64) -> Self {
        Self(minor)
    }

    /// Creates a `Money` value from whole lira with overflow checking
    #[must_use]
    pub const fn checked_from_major(major: u64) -> Option<Self> {
        match major.checked_mul(100) {
            Some(minor) => Some(Self(minor)),
            None => None,
        }
    }

    /// Returns the amount in minor units
    #[must_use]
    pub const fn minor(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02} TL", self.0 / 100, self.0 % 100)
    }
}

/// Passenger booking reference
///
/// Six characters from `A-Z0-9`, generated on the device.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Pnr(String);

impl Pnr {
    /// Length of every PNR
    pub const LENGTH: usize = 6;

    /// Characters a PNR is drawn from
    pub const ALPHABET: &'static [u8; 36] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

    /// Draw a fresh code from the random source
    #[must_use]
    pub fn generate<R: RandomSource + ?Sized>(rng: &mut R) -> Self {
        let code = (0..Self::LENGTH)
            .map(|_| {
                // ALPHABET has 36 entries
                let index = rng.next_below(36) as usize;
                char::from(Self::ALPHABET[index])
            })
            .collect();
        Self(code)
    }

    /// Returns the code
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Pnr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Error returned when a string is not a well-formed PNR
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid PNR '{0}': expected {len} characters from A-Z0-9", len = Pnr::LENGTH)]
pub struct ParsePnrError(String);

impl FromStr for Pnr {
    type Err = ParsePnrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_uppercase();
        let well_formed = code.len() == Self::LENGTH
            && code.bytes().all(|b| Self::ALPHABET.contains(&b));
        if well_formed {
            Ok(Self(code))
        } else {
            Err(ParsePnrError(s.to_string()))
        }
    }
}

impl TryFrom<String> for Pnr {
    type Error = ParsePnrError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Pnr> for String {
    fn from(pnr: Pnr) -> Self {
        pnr.0
    }
}

/// Where and when a trip goes
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Itinerary {
    /// Operating company (bus line, airline, hotel name)
    pub company: String,
    /// Departure city (hotel city for stays)
    pub origin: String,
    /// Arrival city (hotel city for stays)
    pub destination: String,
    /// Travel date
    pub date: NaiveDate,
    /// Departure time
    pub time: NaiveTime,
    /// Price paid
    pub price: Money,
    /// Free-text duration such as `"11h 30m"`
    pub duration: Option<String>,
}

/// Passenger name as entered on the booking form
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passenger {
    /// Given name
    pub name: String,
    /// Family name
    pub surname: String,
}

impl Passenger {
    /// Creates a passenger
    #[must_use]
    pub fn new(name: impl Into<String>, surname: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            surname: surname.into(),
        }
    }

    /// `"Name Surname"`, trimmed
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.name.trim(), self.surname.trim())
            .trim()
            .to_string()
    }
}

/// Check-in/check-out pair for hotel stays
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stay {
    /// Arrival date
    pub check_in: NaiveDate,
    /// Departure date
    pub check_out: NaiveDate,
}

impl Stay {
    /// Number of nights; zero or negative stays are rejected at booking time
    #[must_use]
    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).num_days()
    }
}

/// Booking request handed to the trip repository
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTrip {
    /// Kind of booking
    pub kind: TripKind,
    /// Route, date and price
    pub itinerary: Itinerary,
    /// Passenger on the ticket
    pub passenger: Passenger,
    /// Seat on the vehicle, when one was selected
    pub seat: Option<SeatNumber>,
    /// Hotel stay dates
    pub stay: Option<Stay>,
    /// Number of guests (hotels) or travellers
    pub guest_count: u32,
}

impl NewTrip {
    /// A booking for one traveller with no seat or stay
    #[must_use]
    pub fn new(kind: TripKind, itinerary: Itinerary, passenger: Passenger) -> Self {
        Self {
            kind,
            itinerary,
            passenger,
            seat: None,
            stay: None,
            guest_count: 1,
        }
    }

    /// Attach a seat number
    #[must_use]
    pub fn with_seat(mut self, seat: SeatNumber) -> Self {
        self.seat = Some(seat);
        self
    }

    /// Attach hotel stay dates
    #[must_use]
    pub fn with_stay(mut self, stay: Stay) -> Self {
        self.stay = Some(stay);
        self
    }

    /// Set the guest count
    #[must_use]
    pub fn with_guests(mut self, guest_count: u32) -> Self {
        self.guest_count = guest_count;
        self
    }
}

/// A booked trip as listed under "my trips"
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trip {
    /// Identifier
    pub id: TripId,
    /// Booking reference shown to the passenger
    pub pnr: Pnr,
    /// When the booking was stored
    pub booked_at: DateTime<Utc>,
    /// Kind of booking
    pub kind: TripKind,
    /// Route, date and price
    pub itinerary: Itinerary,
    /// Passenger on the ticket
    pub passenger: Passenger,
    /// Seat on the vehicle, when one was selected
    pub seat: Option<SeatNumber>,
    /// Hotel stay dates
    pub stay: Option<Stay>,
    /// Number of guests (hotels) or travellers
    pub guest_count: u32,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn gender_parses_loosely() {
        assert_eq!("Male".parse::<Gender>().unwrap(), Gender::Male);
        assert_eq!(" f ".parse::<Gender>().unwrap(), Gender::Female);
        assert!("other".parse::<Gender>().is_err());
        assert_eq!(Gender::Male.opposite(), Gender::Female);
    }

    #[test]
    fn pnr_validation() {
        assert_eq!("ab12cd".parse::<Pnr>().unwrap().as_str(), "AB12CD");
        assert!("AB12C".parse::<Pnr>().is_err());
        assert!("AB-2CD".parse::<Pnr>().is_err());
    }

    #[test]
    fn pnr_serde_rejects_malformed_codes() {
        let ok: Pnr = serde_json::from_str("\"XK42QZ\"").unwrap();
        assert_eq!(ok.to_string(), "XK42QZ");
        assert!(serde_json::from_str::<Pnr>("\"nope\"").is_err());
    }

    #[test]
    fn generated_pnr_is_well_formed() {
        let mut rng = seatmap_testing::ScriptedRandom::new([0.0, 0.99, 0.5, 0.75, 0.1, 0.72]);
        let pnr = Pnr::generate(&mut rng);
        assert_eq!(pnr.as_str(), "A9S1DZ");
        assert!(pnr.as_str().parse::<Pnr>().is_ok());
    }

    #[test]
    fn money_display() {
        assert_eq!(Money::from_minor(45_050).to_string(), "450.50 TL");
        assert_eq!(Money::checked_from_major(u64::MAX), None);
    }

    #[test]
    fn passenger_full_name_trims() {
        assert_eq!(Passenger::new(" Ayşe ", "").full_name(), "Ayşe");
        assert_eq!(Passenger::new("Ali", "Kaya").full_name(), "Ali Kaya");
    }

    #[test]
    fn trip_id_from_random_bytes_is_v4() {
        let id = TripId::from_random_bytes([7; 16]);
        assert_eq!(id.as_uuid().get_version_num(), 4);
    }
}
