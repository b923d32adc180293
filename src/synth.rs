//! Synthetic dataset generation: position-conditioned player statistics for a
//! fictional league season. Deterministic under a seeded RNG.

use std::ops::RangeInclusive;

use tinyrand::Rand;

use crate::data::{PlayerRecord, Position};

const CLUBS: [&str; 20] = [
    "Manchester City",
    "Arsenal",
    "Liverpool",
    "Aston Villa",
    "Tottenham",
    "Manchester United",
    "Newcastle United",
    "West Ham United",
    "Chelsea",
    "Brighton",
    "Brentford",
    "Crystal Palace",
    "Wolverhampton",
    "Bournemouth",
    "Fulham",
    "Everton",
    "Nottingham Forest",
    "Luton",
    "Sheffield United",
    "Burnley",
];

const FIRST_NAMES: [&str; 24] = [
    "James", "Michael", "John", "David", "Daniel", "Thomas", "Jack", "Harry", "William", "Oliver",
    "Charlie", "George", "Liam", "Ethan", "Noah", "Mohamed", "Kevin", "Bruno", "Marcus", "Virgil",
    "Rodri", "Erling", "Gabriel", "Martin",
];

const LAST_NAMES: [&str; 22] = [
    "Smith",
    "Johnson",
    "Williams",
    "Brown",
    "Jones",
    "Garcia",
    "Miller",
    "Davis",
    "Rodriguez",
    "Martinez",
    "Kane",
    "Salah",
    "De Bruyne",
    "Fernandes",
    "van Dijk",
    "Haaland",
    "Silva",
    "Jesus",
    "Saka",
    "Rice",
    "Odegaard",
    "Dias",
];

// cumulative weights over goalkeeper/defender/midfielder/forward
const POSITION_CUMULATIVE: [(Position, f64); 4] = [
    (Position::Goalkeeper, 0.15),
    (Position::Defender, 0.45),
    (Position::Midfielder, 0.75),
    (Position::Forward, 1.0),
];

#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub clubs: Vec<String>,
    pub squad_sizes: RangeInclusive<u32>,
    pub rating_range: RangeInclusive<f64>,
}
impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            clubs: CLUBS.iter().map(ToString::to_string).collect(),
            squad_sizes: 15..=25,
            rating_range: 60.0..=90.0,
        }
    }
}

/// Generates a full league's worth of players and shuffles the batch so clubs
/// interleave the way a real export would.
pub fn generate(config: &GeneratorConfig, rand: &mut impl Rand) -> Vec<PlayerRecord> {
    let mut records = vec![];
    for club in &config.clubs {
        let squad_size =
            int_between(rand, *config.squad_sizes.start(), *config.squad_sizes.end());
        for _ in 0..squad_size {
            let position = sample_position(rand);
            records.push(generate_player(config, club, position, rand));
        }
    }
    shuffle(&mut records, rand);
    records
}

fn generate_player(
    config: &GeneratorConfig,
    club: &str,
    position: Position,
    rand: &mut impl Rand,
) -> PlayerRecord {
    let rating = uniform(
        rand,
        *config.rating_range.start(),
        *config.rating_range.end(),
    );
    let (goals, assists, passes_completed, pass_accuracy, shot_accuracy, tackles_won) =
        match position {
            Position::Goalkeeper => (
                int_between(rand, 0, 2),
                int_between(rand, 0, 3),
                int_between(rand, 50, 300),
                uniform(rand, 70.0, 95.0),
                uniform(rand, 40.0, 70.0),
                int_between(rand, 20, 100),
            ),
            Position::Defender => (
                int_between(rand, 0, 5),
                int_between(rand, 0, 5),
                int_between(rand, 100, 500),
                uniform(rand, 80.0, 95.0),
                uniform(rand, 50.0, 75.0),
                int_between(rand, 50, 200),
            ),
            Position::Midfielder => (
                int_between(rand, 2, 15),
                int_between(rand, 3, 20),
                int_between(rand, 200, 700),
                uniform(rand, 85.0, 95.0),
                uniform(rand, 60.0, 85.0),
                int_between(rand, 30, 150),
            ),
            Position::Forward => (
                int_between(rand, 5, 30),
                int_between(rand, 3, 15),
                int_between(rand, 50, 300),
                uniform(rand, 70.0, 85.0),
                uniform(rand, 70.0, 90.0),
                int_between(rand, 10, 50),
            ),
        };
    PlayerRecord {
        name: generate_name(rand),
        club: club.to_string(),
        position,
        rating: Some(round1(rating)),
        goals,
        assists,
        passes_completed,
        pass_accuracy: round1(pass_accuracy),
        shot_accuracy: round1(shot_accuracy),
        tackles_won,
    }
}

fn generate_name(rand: &mut impl Rand) -> String {
    let first = FIRST_NAMES[(rand.next_u64() % FIRST_NAMES.len() as u64) as usize];
    let last = LAST_NAMES[(rand.next_u64() % LAST_NAMES.len() as u64) as usize];
    format!("{first} {last}")
}

fn sample_position(rand: &mut impl Rand) -> Position {
    let draw = random_f64(rand);
    for (position, cumulative) in POSITION_CUMULATIVE {
        if draw < cumulative {
            return position;
        }
    }
    Position::Forward
}

fn shuffle(records: &mut [PlayerRecord], rand: &mut impl Rand) {
    for index in (1..records.len()).rev() {
        let other = (rand.next_u64() % (index as u64 + 1)) as usize;
        records.swap(index, other);
    }
}

fn random_f64(rand: &mut impl Rand) -> f64 {
    rand.next_u64() as f64 / u64::MAX as f64
}

fn uniform(rand: &mut impl Rand, lo: f64, hi: f64) -> f64 {
    lo + random_f64(rand) * (hi - lo)
}

fn int_between(rand: &mut impl Rand, lo: u32, hi: u32) -> u32 {
    lo + (rand.next_u64() % (hi - lo + 1) as u64) as u32
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
