//! Target-side semantics of the specially forwarded operators that have no
//! counterpart in `std::ops`.

use regex::Regex;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::ops::{Range, RangeFrom, RangeInclusive, RangeTo, RangeToInclusive};
use std::sync::Arc;

/// Absence predicate. Only genuinely optional values report `true`.
pub trait Nullable {
    fn is_nil(&self) -> bool {
        false
    }
}

impl<T> Nullable for Option<T> {
    fn is_nil(&self) -> bool {
        self.is_none()
    }
}

impl<T: Nullable + ?Sized> Nullable for Box<T> {
    fn is_nil(&self) -> bool {
        (**self).is_nil()
    }
}

impl<T: Nullable + ?Sized> Nullable for Arc<T> {
    fn is_nil(&self) -> bool {
        (**self).is_nil()
    }
}

macro_rules! never_nil {
    ($($ty:ty),* $(,)?) => {
        $(impl Nullable for $ty {})*
    };
}

never_nil!(
    bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
    str, String, &str, Regex,
);

impl<T> Nullable for [T] {}
impl<T> Nullable for Vec<T> {}
impl<T> Nullable for VecDeque<T> {}
impl<T> Nullable for BTreeSet<T> {}
impl<T> Nullable for HashSet<T> {}
impl<K, V> Nullable for BTreeMap<K, V> {}
impl<K, V> Nullable for HashMap<K, V> {}
impl<Idx> Nullable for Range<Idx> {}
impl<Idx> Nullable for RangeInclusive<Idx> {}
impl<Idx> Nullable for RangeFrom<Idx> {}

/// Case membership: whether `other` belongs to the case described by `self`.
///
/// Ranges test containment, patterns test for a match, and plain values fall
/// back to equality.
pub trait CaseEq<Rhs: ?Sized = Self> {
    fn case_eq(&self, other: &Rhs) -> bool;
}

impl<Idx: PartialOrd> CaseEq<Idx> for Range<Idx> {
    fn case_eq(&self, other: &Idx) -> bool {
        self.contains(other)
    }
}

impl<Idx: PartialOrd> CaseEq<Idx> for RangeInclusive<Idx> {
    fn case_eq(&self, other: &Idx) -> bool {
        self.contains(other)
    }
}

impl<Idx: PartialOrd> CaseEq<Idx> for RangeFrom<Idx> {
    fn case_eq(&self, other: &Idx) -> bool {
        self.contains(other)
    }
}

impl<Idx: PartialOrd> CaseEq<Idx> for RangeTo<Idx> {
    fn case_eq(&self, other: &Idx) -> bool {
        self.contains(other)
    }
}

impl<Idx: PartialOrd> CaseEq<Idx> for RangeToInclusive<Idx> {
    fn case_eq(&self, other: &Idx) -> bool {
        self.contains(other)
    }
}

impl CaseEq<str> for Regex {
    fn case_eq(&self, other: &str) -> bool {
        self.is_match(other)
    }
}

impl CaseEq<String> for Regex {
    fn case_eq(&self, other: &String) -> bool {
        self.is_match(other)
    }
}

macro_rules! case_eq_by_equality {
    ($($ty:ty),* $(,)?) => {
        $(impl CaseEq for $ty {
            fn case_eq(&self, other: &Self) -> bool {
                self == other
            }
        })*
    };
}

case_eq_by_equality!(
    bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
    String, &str,
);

/// Pattern match returning the character offset of the first match.
pub trait PatternMatch<P: ?Sized> {
    fn pattern_match(&self, pattern: &P) -> Option<usize>;
}

impl PatternMatch<Regex> for str {
    fn pattern_match(&self, pattern: &Regex) -> Option<usize> {
        pattern
            .find(self)
            .map(|found| self[..found.start()].chars().count())
    }
}

impl PatternMatch<Regex> for String {
    fn pattern_match(&self, pattern: &Regex) -> Option<usize> {
        self.as_str().pattern_match(pattern)
    }
}

impl PatternMatch<Regex> for &str {
    fn pattern_match(&self, pattern: &Regex) -> Option<usize> {
        (**self).pattern_match(pattern)
    }
}

impl PatternMatch<str> for Regex {
    fn pattern_match(&self, subject: &str) -> Option<usize> {
        subject.pattern_match(self)
    }
}

impl PatternMatch<String> for Regex {
    fn pattern_match(&self, subject: &String) -> Option<usize> {
        subject.as_str().pattern_match(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_is_nil() {
        assert!(None::<i32>.is_nil());
        assert!(!Some(1).is_nil());
    }

    #[test]
    fn test_values_are_never_nil() {
        assert!(!false.is_nil());
        assert!(!0u8.is_nil());
        assert!(!String::new().is_nil());
        assert!(!Vec::<i32>::new().is_nil());
        assert!(!(1..3).is_nil());
    }

    #[test]
    fn test_boxed_nil() {
        assert!(Box::new(None::<i32>).is_nil());
        assert!(Arc::new(None::<i32>).is_nil());
        assert!(!Arc::new(Some(1)).is_nil());
    }

    #[test]
    fn test_range_case_eq() {
        assert!((1..3).case_eq(&2));
        assert!(!(1..3).case_eq(&3));
        assert!((1..=3).case_eq(&3));
        assert!(!(1..=3).case_eq(&4));
        assert!((10..).case_eq(&100));
        assert!((..10).case_eq(&9));
        assert!((..=10).case_eq(&10));
    }

    #[test]
    fn test_regex_case_eq() {
        let pattern = Regex::new("^ob").unwrap();
        assert!(pattern.case_eq("object"));
        assert!(!pattern.case_eq(&"subject".to_string()));
    }

    #[test]
    fn test_equality_case_eq() {
        assert!(42i32.case_eq(&42));
        assert!(!42i64.case_eq(&43));
        assert!("object".to_string().case_eq(&"object".to_string()));
    }

    #[test]
    fn test_pattern_match() {
        assert_eq!("object".pattern_match(&Regex::new("bje").unwrap()), Some(1));
        assert_eq!("object".pattern_match(&Regex::new("aje").unwrap()), None);
    }

    #[test]
    fn test_pattern_match_counts_characters() {
        let subject = "héllo wörld".to_string();
        assert_eq!(subject.pattern_match(&Regex::new("w").unwrap()), Some(6));
    }

    #[test]
    fn test_regex_pattern_match() {
        let pattern = Regex::new("bje").unwrap();
        assert_eq!(pattern.pattern_match("object"), Some(1));
        assert_eq!(pattern.pattern_match(&"object".to_string()), Some(1));
    }
}
