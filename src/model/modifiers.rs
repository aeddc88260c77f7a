use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::ops::BitOr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Modifier {
    Public,
    Private,
    Protected,
    Static,
    Final,
    Abstract,
    Strict,
}

impl Modifier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Modifier::Public => "public",
            Modifier::Private => "private",
            Modifier::Protected => "protected",
            Modifier::Static => "static",
            Modifier::Final => "final",
            Modifier::Abstract => "abstract",
            Modifier::Strict => "strictfp",
        }
    }

    /// Map a source keyword to its flag. Keywords without a flag
    /// (`synchronized`, `native`, `default`, `sealed`, ...) yield `None`.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "public" => Some(Modifier::Public),
            "private" => Some(Modifier::Private),
            "protected" => Some(Modifier::Protected),
            "static" => Some(Modifier::Static),
            "final" => Some(Modifier::Final),
            "abstract" => Some(Modifier::Abstract),
            "strictfp" => Some(Modifier::Strict),
            _ => None,
        }
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Set of modifiers on a declaration. Union is order independent and
/// inserting the same modifier twice is a no-op.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModifierSet(BTreeSet<Modifier>);

impl ModifierSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, modifier: Modifier) {
        self.0.insert(modifier);
    }

    pub fn union(&self, other: &ModifierSet) -> ModifierSet {
        ModifierSet(self.0.union(&other.0).copied().collect())
    }

    pub fn contains(&self, modifier: Modifier) -> bool {
        self.0.contains(&modifier)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = Modifier> + '_ {
        self.0.iter().copied()
    }
}

impl From<Modifier> for ModifierSet {
    fn from(modifier: Modifier) -> Self {
        std::iter::once(modifier).collect()
    }
}

impl FromIterator<Modifier> for ModifierSet {
    fn from_iter<I: IntoIterator<Item = Modifier>>(iter: I) -> Self {
        ModifierSet(iter.into_iter().collect())
    }
}

impl Extend<Modifier> for ModifierSet {
    fn extend<I: IntoIterator<Item = Modifier>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl BitOr for ModifierSet {
    type Output = ModifierSet;

    fn bitor(self, rhs: ModifierSet) -> ModifierSet {
        self.union(&rhs)
    }
}

impl BitOr<Modifier> for ModifierSet {
    type Output = ModifierSet;

    fn bitor(mut self, rhs: Modifier) -> ModifierSet {
        self.insert(rhs);
        self
    }
}

impl fmt::Display for ModifierSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let words: Vec<_> = self.iter().map(|m| m.as_str()).collect();
        f.write_str(&words.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_union_is_order_independent() {
        let a = ModifierSet::from(Modifier::Public) | Modifier::Final;
        let b = ModifierSet::from(Modifier::Final) | Modifier::Public;
        assert_eq!(a, b);
        assert_eq!(a.len(), 2);
    }

    #[test]
    fn test_repeated_modifier_is_idempotent() {
        let set: ModifierSet = [Modifier::Static, Modifier::Static].into_iter().collect();
        assert_eq!(set, ModifierSet::from(Modifier::Static));
    }

    #[test]
    fn test_unknown_keywords_have_no_flag() {
        assert_eq!(Modifier::from_keyword("strictfp"), Some(Modifier::Strict));
        assert_eq!(Modifier::from_keyword("synchronized"), None);
        assert_eq!(Modifier::from_keyword("sealed"), None);
    }

    #[test]
    fn test_display_lists_in_stable_order() {
        let set: ModifierSet = [Modifier::Final, Modifier::Public].into_iter().collect();
        assert_eq!(set.to_string(), "public final");
    }
}
