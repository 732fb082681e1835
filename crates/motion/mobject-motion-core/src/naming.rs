//! Unique-prefix reservation registry.
//!
//! Mobjects and stages claim name prefixes so their cloned data-blocks
//! never collide with other instances in the same host file. A reservation
//! blocks any candidate that is a prefix of an existing entry, which keeps
//! `STG0` from aliasing `STG00.MOB01`-style descendants.

use log::debug;

/// Persistent set of reserved name prefixes.
#[derive(Clone, Debug, Default)]
pub struct PrefixRegistry {
    reserved: Vec<String>,
}

impl PrefixRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve and return `base` plus the first free two-digit counter.
    pub fn reserve(&mut self, base: &str) -> String {
        let mut counter = 0u32;
        let mut prefix = format!("{base}{counter:02}");
        while self.is_reserved(&prefix) {
            counter += 1;
            prefix = format!("{base}{counter:02}");
        }
        self.reserved.push(prefix.clone());
        debug!("reserved prefix {prefix}");
        prefix
    }

    /// Drop every reservation starting with `prefix`, releasing an object
    /// and all of its descendants at once.
    pub fn release(&mut self, prefix: &str) {
        self.reserved.retain(|r| !r.starts_with(prefix));
    }

    fn is_reserved(&self, candidate: &str) -> bool {
        self.reserved.iter().any(|r| r.starts_with(candidate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserve_counts_up_with_zero_padding() {
        let mut reg = PrefixRegistry::new();
        assert_eq!(reg.reserve("STG"), "STG00");
        assert_eq!(reg.reserve("STG"), "STG01");
        assert_eq!(reg.reserve("STG00.MOB"), "STG00.MOB00");
    }

    #[test]
    fn candidate_blocked_by_longer_reservation() {
        let mut reg = PrefixRegistry::new();
        reg.reserve("STG00.MOB");
        // "STG00.MOB00" is reserved, so the bare stage counter must skip
        // past anything it is a prefix of.
        assert_eq!(reg.reserve("STG"), "STG01");
    }

    #[test]
    fn release_removes_by_prefix() {
        let mut reg = PrefixRegistry::new();
        reg.reserve("STG");
        reg.reserve("STG00.MOB");
        reg.reserve("STG00.MOB");
        reg.release("STG00");
        assert_eq!(reg.reserve("STG"), "STG00");
        assert_eq!(reg.reserve("STG00.MOB"), "STG00.MOB00");
    }
}
