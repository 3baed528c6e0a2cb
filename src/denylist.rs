use std::collections::HashSet;

// Seed sets stand in for real mortality and incarceration feeds. A
// production deployment swaps this module for an external source; the
// assessor only ever does membership tests.
const DECEASED_SEED: &[&str] = &["1234567890", "9876543210"];
const INCARCERATED_SEED: &[&str] = &["1518983506"];

/// The two static denylists, built once per run and read-only after.
#[derive(Debug)]
pub struct Denylists {
    deceased: HashSet<String>,
    incarcerated: HashSet<String>,
}

impl Denylists {
    pub fn seeded() -> Self {
        Self {
            deceased: seed_set(DECEASED_SEED),
            incarcerated: seed_set(INCARCERATED_SEED),
        }
    }

    pub fn is_deceased(&self, npi: &str) -> bool {
        self.deceased.contains(npi)
    }

    pub fn is_incarcerated(&self, npi: &str) -> bool {
        self.incarcerated.contains(npi)
    }
}

fn seed_set(seed: &[&str]) -> HashSet<String> {
    seed.iter().map(|npi| npi.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_sets_answer_membership() {
        let denylists = Denylists::seeded();

        assert!(denylists.is_deceased("1234567890"));
        assert!(denylists.is_deceased("9876543210"));
        assert!(!denylists.is_deceased("1518983506"));

        assert!(denylists.is_incarcerated("1518983506"));
        assert!(!denylists.is_incarcerated("1234567890"));
    }
}
