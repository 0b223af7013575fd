//! ID generation utilities.

use ulid::Ulid;
use uuid::Uuid;

/// ID generator for stored rows and vote submissions.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    _private: (),
}

impl IdGenerator {
    /// Create a new ID generator.
    #[must_use]
    pub const fn new() -> Self {
        Self { _private: () }
    }

    /// Generate a new ULID-based row ID.
    ///
    /// ULIDs sort by creation time, so audit rows listed by id come back
    /// in submission order.
    #[must_use]
    pub fn generate(&self) -> String {
        Ulid::new().to_string().to_lowercase()
    }

    /// Generate an identifier grouping the rows of one logical submission.
    #[must_use]
    pub fn generate_submission_id(&self) -> String {
        Uuid::now_v7().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_ulid() {
        let id_gen = IdGenerator::new();
        let id1 = id_gen.generate();
        let id2 = id_gen.generate();

        assert_eq!(id1.len(), 26);
        assert_ne!(id1, id2);
        assert_eq!(id1, id1.to_lowercase());
    }

    #[test]
    fn test_generate_submission_id() {
        let id_gen = IdGenerator::new();
        let s1 = id_gen.generate_submission_id();
        let s2 = id_gen.generate_submission_id();

        assert_eq!(s1.len(), 36);
        assert_ne!(s1, s2);
    }
}
