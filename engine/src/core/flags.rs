//! Named bit flags.
//!
//! A flag set maps up to 32 names to bits, in the order they are declared. Physics uses the
//! `"PhysicsContacts"` set to turn a body's contact group and mask names into bitmasks.

use dashmap::DashMap;
use log::warn;

/// Maximum number of flags a single set can hold.
pub const MAX_FLAGS: usize = 32;

/// A resolved set of names. Names that are not part of the set are listed in `unresolved`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FlagBits {
    pub bits: u32,
    pub unresolved: Vec<String>,
}

impl FlagBits {
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty()
    }
}

/// Registry of flag sets, readable concurrently from tasks.
#[derive(Debug, Default)]
pub struct FlagRegistry {
    sets: DashMap<String, Vec<String>>,
}

impl FlagRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Define (or redefine) a flag set. Names past the 32nd are ignored with a warning.
    pub fn define<I, S>(&self, set: &str, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut flags: Vec<String> = names.into_iter().map(Into::into).collect();
        if flags.len() > MAX_FLAGS {
            warn!(
                "flag set `{set}` declares {} flags, only the first {MAX_FLAGS} are kept",
                flags.len()
            );
            flags.truncate(MAX_FLAGS);
        }
        self.sets.insert(set.to_string(), flags);
    }

    pub fn contains_set(&self, set: &str) -> bool {
        self.sets.contains_key(set)
    }

    /// Bit for a single flag name.
    pub fn bit(&self, set: &str, name: &str) -> Option<u32> {
        let flags = self.sets.get(set)?;
        flags
            .iter()
            .position(|flag| flag == name)
            .map(|index| 1 << index)
    }

    /// OR together the bits for `names`. An unknown set leaves every name unresolved.
    pub fn bitset<S: AsRef<str>>(&self, set: &str, names: &[S]) -> FlagBits {
        let mut result = FlagBits::default();
        for name in names {
            match self.bit(set, name.as_ref()) {
                Some(bit) => result.bits |= bit,
                None => result.unresolved.push(name.as_ref().to_string()),
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bits_follow_declaration_order() {
        // Given
        let flags = FlagRegistry::new();
        flags.define("PhysicsContacts", ["Player", "Enemy", "Pickup"]);

        // When
        let bits = flags.bitset("PhysicsContacts", &["Pickup", "Player"]);

        // Then
        assert_eq!(bits.bits, 0b101);
        assert!(bits.is_complete());
    }

    #[test]
    fn unknown_names_are_reported() {
        // Given
        let flags = FlagRegistry::new();
        flags.define("PhysicsContacts", ["Player"]);

        // When
        let bits = flags.bitset("PhysicsContacts", &["Player", "Ghost"]);
        let missing_set = flags.bitset("Audio", &["Music"]);

        // Then
        assert_eq!(bits.bits, 1);
        assert_eq!(bits.unresolved, vec!["Ghost".to_string()]);
        assert_eq!(missing_set.bits, 0);
        assert_eq!(missing_set.unresolved, vec!["Music".to_string()]);
    }

    #[test]
    fn sets_are_capped_at_thirty_two_flags() {
        let flags = FlagRegistry::new();
        flags.define("Big", (0..40).map(|i| format!("f{i}")));

        assert_eq!(flags.bit("Big", "f31"), Some(1 << 31));
        assert_eq!(flags.bit("Big", "f32"), None);
    }
}
