use rand::Rng;

const ID_MIN: i64 = 1 << 30;
const ID_MAX: i64 = 1 << 31;

/// Random identifier for models and decks, drawn from `[2^30, 2^31)`.
pub fn generate_unique_id() -> i64 {
    rand::rng().random_range(ID_MIN..ID_MAX)
}

/// Monotonic ids for note and card rows.
#[derive(Debug)]
pub struct IdSequence {
    next: i64,
}

impl IdSequence {
    pub fn starting_at(start: i64) -> Self {
        Self { next: start }
    }

    pub fn next_id(&mut self) -> i64 {
        let id = self.next;
        self.next += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_stay_in_range() {
        for _ in 0..1000 {
            let id = generate_unique_id();
            assert!((ID_MIN..ID_MAX).contains(&id));
        }
    }

    #[test]
    fn test_id_sequence_increments() {
        let mut ids = IdSequence::starting_at(100);
        assert_eq!(ids.next_id(), 100);
        assert_eq!(ids.next_id(), 101);
        assert_eq!(ids.next_id(), 102);
    }
}
