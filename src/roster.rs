//! Sample roster generation for rehearsals and demos.

use std::collections::HashSet;

use rand::Rng;
use rand::distr::Alphanumeric;
use rand::seq::IndexedRandom;

use crate::checkin::Attendee;

const FIRST_NAMES: &[&str] = &[
    "Amit", "Neha", "Rohan", "Priya", "Siddharth", "Ananya", "Rahul", "Simran", "Karan", "Isha",
];
const LAST_NAMES: &[&str] = &["Sharma", "Kumar", "Verma", "Singh", "Gupta", "Patel"];
const TOKEN_LEN: usize = 10;

/// Build `count` random attendees with ids `1..=count`, unique tokens, and
/// a random paid flag. Everyone starts as not scanned.
pub fn generate<R: Rng>(rng: &mut R, count: u32) -> Vec<Attendee> {
    let mut tokens = HashSet::new();

    (1..=count)
        .map(|id| {
            let first = FIRST_NAMES.choose(rng).copied().unwrap_or("Guest");
            let last = LAST_NAMES.choose(rng).copied().unwrap_or("Attendee");
            let name = format!("{first} {last}");
            let email = format!("{}@example.com", name.replace(' ', ".").to_lowercase());

            let token = loop {
                let candidate = random_token(rng);
                if tokens.insert(candidate.clone()) {
                    break candidate;
                }
            };

            Attendee::new(id, name, email, token, rng.random_bool(0.5))
        })
        .collect()
}

fn random_token<R: Rng>(rng: &mut R) -> String {
    rng.sample_iter(&Alphanumeric)
        .take(TOKEN_LEN)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkin::Presence;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn ids_are_sequential_and_tokens_unique() {
        let mut rng = StdRng::seed_from_u64(7);
        let attendees = generate(&mut rng, 200);

        assert_eq!(attendees.len(), 200);
        assert!(attendees.iter().enumerate().all(|(i, a)| a.id == i as u32 + 1));

        let tokens: HashSet<_> = attendees.iter().map(|a| a.token.as_str()).collect();
        assert_eq!(tokens.len(), 200);
    }

    #[test]
    fn attendees_start_fresh() {
        let mut rng = StdRng::seed_from_u64(11);
        for a in generate(&mut rng, 20) {
            assert_eq!(a.status, Presence::NotScanned);
            assert_eq!(a.token.len(), TOKEN_LEN);
            assert!(a.token.chars().all(|c| c.is_ascii_alphanumeric()));
            assert!(a.lunch_token.is_none());
            assert_eq!(a.email, format!("{}@example.com", a.name.replace(' ', ".").to_lowercase()));
        }
    }

    #[test]
    fn zero_count_is_empty() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(generate(&mut rng, 0).is_empty());
    }
}
