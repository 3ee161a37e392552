//! Bus Seat Selection Demo
//!
//! Plays one pass through the booking flow in the terminal:
//! - Sample a seating chart and print it in 2+1 layout
//! - Try an occupied seat and a gender-conflicting seat
//! - Hold and confirm a valid seat
//! - Book it and list the trip history
//!
//! # Usage
//!
//! ```bash
//! SEATMAP_SEED=42 cargo run --bin demo
//! ```

use bus_booking::{
    BookingSession, Config, Gender, Itinerary, Money, Passenger, SeatError, SeatNumber,
    SeatSelectionAction, SeatSelectionState, SeatSelectionStore,
    layout::SeatPosition, metrics, rules,
};
use chrono::{NaiveDate, NaiveTime};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,bus_booking=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!("\n🚌 ============================================");
    println!("   Bus Seat Selection - Live Demo");
    println!("============================================\n");

    // Load configuration
    let config = Config::from_env();
    config.validate()?;
    metrics::register_booking_metrics();

    let mut session = BookingSession::from_config(config);
    let passenger = Passenger::new("Ayşe", "Yılmaz");
    println!("👤 Signing in as {}", passenger.full_name());
    session.sign_in(passenger);

    // ========== Seat Map ==========

    let mut store = session.begin_seat_selection()?;
    store.send(SeatSelectionAction::ChooseGender {
        gender: Gender::Female,
    })?;

    println!("\n1️⃣  Seat map (female passenger)\n");
    store.state(|s| print_chart(s));

    // ========== Rejections ==========

    println!("\n2️⃣  Trying seats that should be refused...");

    let (occupied, conflicting) = store.state(|s| {
        let occupied = s.chart.seats().iter().find(|seat| seat.occupied).map(|seat| seat.number);
        let conflicting = s
            .chart
            .layout()
            .seats()
            .find(|seat| {
                matches!(
                    rules::try_select(&s.chart, *seat, s.chosen_gender),
                    Err(SeatError::GenderConflict { .. })
                )
            });
        (occupied, conflicting)
    });

    for seat in [occupied, conflicting].into_iter().flatten() {
        attempt(&mut store, seat)?;
    }
    let past_the_end = SeatNumber::new(store.state(|s| s.chart.layout().size()) + 1);
    attempt(&mut store, past_the_end)?;

    // ========== Selection ==========

    println!("\n3️⃣  Picking the first seat that is allowed...");

    let first_allowed =
        store.state(|s| rules::assignable_seats(&s.chart, s.chosen_gender).first().copied());
    let Some(seat) = first_allowed else {
        println!("   ✗ The bus is full for this passenger");
        return Ok(());
    };
    attempt(&mut store, seat)?;

    store.send(SeatSelectionAction::ConfirmSelection)?;
    let handoff = store.state(|s| s.handoff);
    if let Some(handoff) = handoff {
        println!("   ✓ Seat {} confirmed at {}", handoff.seat, handoff.confirmed_at);
    }

    // ========== Booking ==========

    println!("\n4️⃣  Booking the trip...");

    let itinerary = Itinerary {
        company: "Anadolu Ekspres".to_string(),
        origin: "İstanbul".to_string(),
        destination: "Ankara".to_string(),
        date: NaiveDate::from_ymd_opt(2025, 3, 14).ok_or("invalid demo date")?,
        time: NaiveTime::from_hms_opt(9, 30, 0).ok_or("invalid demo time")?,
        price: Money::from_minor(45_000),
        duration: Some("6h 0m".to_string()),
    };
    let trip = session.book_bus_trip(handoff, itinerary)?;
    println!(
        "   ✓ PNR {} - {} → {}, seat {}, {}",
        trip.pnr,
        trip.itinerary.origin,
        trip.itinerary.destination,
        trip.seat.map_or_else(|| "-".to_string(), |s| s.to_string()),
        trip.itinerary.price,
    );

    println!("\n5️⃣  My trips:\n");
    println!("{}", serde_json::to_string_pretty(&session.trips())?);

    // ========== Sign Out ==========

    session.sign_out();
    println!("\n👋 Signed out, {} trips remembered", session.trips().len());

    println!("\n✅ Demo complete\n");
    Ok(())
}

fn attempt(store: &mut SeatSelectionStore, seat: SeatNumber) -> Result<(), Box<dyn std::error::Error>> {
    store.send(SeatSelectionAction::SelectSeat { seat })?;
    let (selected, error) = store.state(|s| (s.selected_seat, s.last_error));
    match error {
        Some(error) => println!("   ✗ Seat {seat}: {error} [{}]", error.code()),
        None if selected == Some(seat) => println!("   ✓ Seat {seat} held"),
        None => println!("   ? Seat {seat}: no change"),
    }
    Ok(())
}

/// Print the chart as rows of `single | aisle | pair`
///
/// `M`/`F` mark sold seats, `X` a sold seat with unknown gender, `!` a free
/// seat refused for the chosen gender.
fn print_chart(state: &SeatSelectionState) {
    let layout = state.chart.layout();
    let cell = |seat: SeatNumber| -> String {
        let Ok(entry) = state.chart.seat(seat) else {
            return "     ".to_string();
        };
        let mark = match (entry.occupied, entry.occupant_gender) {
            (true, Some(Gender::Male)) => "M",
            (true, Some(Gender::Female)) => "F",
            (true, None) => "X",
            (false, _) if rules::try_select(&state.chart, seat, state.chosen_gender).is_ok() => " ",
            (false, _) => "!",
        };
        format!("[{:>2}{mark}]", seat.value())
    };

    for row in 0..layout.rows() {
        let first = row * 3 + 1;
        let mut line = String::new();
        for number in first..first + 3 {
            let seat = SeatNumber::new(number);
            if SeatPosition::of(seat) == SeatPosition::PairLeft {
                line.push_str("   ");
            }
            line.push_str(&cell(seat));
        }
        println!("   {line}");
    }

    println!(
        "\n   {} free, {} sold, {} open to a {} passenger",
        state.chart.available_count(),
        state.chart.occupied_count(),
        rules::assignable_seats(&state.chart, state.chosen_gender).len(),
        state.chosen_gender,
    );
}
