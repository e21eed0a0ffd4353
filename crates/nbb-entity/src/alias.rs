use crate::error::{EntityError, EntityResult};

/// Upper bound on alias indirection while resolving a key.
pub const MAX_ALIAS_HOPS: usize = 8;

/// Static alias declarations for one entity type.
///
/// Maps an alternate name to the canonical attribute key. Tables are declared
/// as `const` items next to the entity type and never change at runtime.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AliasTable {
    entries: &'static [(&'static str, &'static str)],
}

impl AliasTable {
    /// Declare a table from `(alias, canonical)` pairs.
    pub const fn new(entries: &'static [(&'static str, &'static str)]) -> Self {
        Self { entries }
    }

    /// A table with no aliases.
    pub const fn empty() -> Self {
        Self { entries: &[] }
    }

    /// Single-hop lookup: the canonical key for `name`, if it is an alias.
    pub fn lookup(&self, name: &str) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(alias, _)| *alias == name)
            .map(|(_, canonical)| *canonical)
    }

    /// Whether `name` is declared as an alias.
    pub fn is_alias(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// Number of declared aliases.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the table declares no aliases.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(alias, canonical)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.entries.iter().copied()
    }

    /// Check that every alias chain ends within [`MAX_ALIAS_HOPS`].
    ///
    /// Returns the first alias whose chain cycles or runs too long.
    pub fn validate(&self) -> EntityResult<()> {
        for (alias, _) in self.entries {
            let mut current = *alias;
            let mut hops = 0;
            while let Some(next) = self.lookup(current) {
                hops += 1;
                if hops > MAX_ALIAS_HOPS {
                    return Err(EntityError::AliasCycle {
                        alias: (*alias).to_string(),
                        hops: MAX_ALIAS_HOPS,
                    });
                }
                current = next;
            }
        }
        Ok(())
    }
}

impl Default for AliasTable {
    fn default() -> Self {
        Self::empty()
    }
}
