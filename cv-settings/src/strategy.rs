//! Strategy codes select one alternative out of an ordered, named set.
//!
//! A strategy code is stored as text in the form `index:name0;name1;...;nameN`.
//! The whole list is persisted so that a settings file documents its own choices,
//! but only the index carries the selection. Decoding is strict: the list must
//! match the alternatives the caller expects and the name at the selected index
//! must agree, otherwise nothing is selected.

/// An enumeration selectable through a strategy code.
///
/// Implemented by the `strategies!` macro for every fieldless selection enum in this crate.
pub trait Strategy: Copy + Sized + 'static {
    /// The ordered alternative names, as they appear in a strategy code.
    const NAMES: &'static [&'static str];
    /// Every variant, in the same order as [`Strategy::NAMES`].
    const ALL: &'static [Self];

    /// The position of this variant in the alternative list.
    fn index(self) -> usize;

    fn name(self) -> &'static str {
        Self::NAMES[self.index()]
    }

    /// Encodes this variant as a complete strategy code.
    fn code(self) -> String {
        encode(self.index(), Self::NAMES)
    }
}

macro_rules! strategies {
    ($(#[$meta:meta])* $vis:vis enum $name:ident { $($(#[$variant_meta:meta])* $variant:ident => $label:literal,)+ }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis enum $name {
            $($(#[$variant_meta])* $variant,)+
        }

        impl $crate::strategy::Strategy for $name {
            const NAMES: &'static [&'static str] = &[$($label,)+];
            const ALL: &'static [Self] = &[$(Self::$variant,)+];

            fn index(self) -> usize {
                self as usize
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str($crate::strategy::Strategy::name(*self))
            }
        }
    };
}

/// Decodes `raw` against the `expected` alternatives and returns the selected index.
///
/// Returns `None` unless `raw` has exactly one `:`, the part before it is a
/// non-negative integer, the part after it lists exactly `expected.len()`
/// alternatives separated by `;`, the index is in range and the alternative at
/// that index is the one `expected` names there.
pub fn decode(raw: &str, expected: &[&str]) -> Option<usize> {
    let mut parts = raw.split(':');
    let (index, names) = match (parts.next(), parts.next(), parts.next()) {
        (Some(index), Some(names), None) => (index, names),
        _ => return None,
    };
    let index: usize = index.parse().ok()?;
    let names: Vec<&str> = names.split(';').collect();
    if names.len() != expected.len() || index >= names.len() {
        return None;
    }
    (names[index] == expected[index]).then_some(index)
}

/// Decodes `raw` into the strategy enum `S`.
pub fn select<S: Strategy>(raw: &str) -> Option<S> {
    decode(raw, S::NAMES).map(|index| S::ALL[index])
}

/// Builds the strategy code selecting `index` out of `names`.
pub fn encode(index: usize, names: &[&str]) -> String {
    format!("{}:{}", index, names.join(";"))
}

/// The alternative names listed by `raw`, or `None` when `raw` has no `:`.
pub fn alternatives(raw: &str) -> Option<Vec<&str>> {
    raw.split_once(':')
        .map(|(_, names)| names.split(';').collect())
}

/// The name `raw` points at, without checking it against any expected list.
pub fn selected_name(raw: &str) -> Option<&str> {
    let (index, names) = raw.split_once(':')?;
    let index: usize = index.parse().ok()?;
    names.split(';').nth(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;

    const DETECTORS: &[&str] = &[
        "Dense", "Fast", "GFTT", "MSER", "ORB", "SIFT", "Star", "SURF", "BRISK",
    ];

    strategies! {
        enum Fruit {
            Apple => "apple",
            Pear => "pear",
            Plum => "plum",
        }
    }

    #[test]
    fn decode_detector_codes() {
        for (raw, expected) in [
            ("0:Dense;Fast;GFTT;MSER;ORB;SIFT;Star;SURF;BRISK", Some(0)),
            ("4:Dense;Fast;GFTT;MSER;ORB;SIFT;Star;SURF;BRISK", Some(4)),
            ("8:Dense;Fast;GFTT;MSER;ORB;SIFT;Star;SURF;BRISK", Some(8)),
            ("9:Dense;Fast;GFTT;MSER;ORB;SIFT;Star;SURF;BRISK", None),
            ("-1:Dense;Fast;GFTT;MSER;ORB;SIFT;Star;SURF;BRISK", None),
            ("x:Dense;Fast;GFTT;MSER;ORB;SIFT;Star;SURF;BRISK", None),
            ("4", None),
            ("4:Dense;Fast:GFTT;MSER;ORB;SIFT;Star;SURF;BRISK", None),
            ("4:Dense;Fast;GFTT;MSER;ORB;SIFT;Star;SURF", None),
            ("4:Dense;Fast;GFTT;MSER;ORB;SIFT;Star;SURF;BRISK;AKAZE", None),
            ("4:Dense;Fast;GFTT;MSER;SIFT;ORB;Star;SURF;BRISK", None),
            ("", None),
        ] {
            assert_eq!(decode(raw, DETECTORS), expected);
        }
    }

    #[test]
    fn mismatch_elsewhere_in_the_list_is_tolerated() {
        // Only the selected position is checked against the expected names.
        assert_eq!(
            decode("0:Dense;Fast;GFTT;MSER;ORB;SIFT;Star;SURF;FREAK", DETECTORS),
            Some(0)
        );
    }

    #[quickcheck]
    fn encoded_indexes_decode(index: usize) -> bool {
        let index = index % DETECTORS.len();
        decode(&encode(index, DETECTORS), DETECTORS) == Some(index)
    }

    #[quickcheck]
    fn decoded_indexes_are_in_range(raw: String) -> bool {
        decode(&raw, DETECTORS).map_or(true, |index| index < DETECTORS.len())
    }

    #[test]
    fn select_maps_to_variants() {
        assert_eq!(select::<Fruit>("2:apple;pear;plum"), Some(Fruit::Plum));
        assert_eq!(select::<Fruit>("2:apple;pear;peach"), None);
        assert_eq!(Fruit::Pear.code(), "1:apple;pear;plum");
        assert_eq!(Fruit::Apple.to_string(), "apple");
    }

    #[test]
    fn selected_name_ignores_the_catalog() {
        assert_eq!(selected_name("1:a;b;c"), Some("b"));
        assert_eq!(selected_name("3:a;b;c"), None);
        assert_eq!(selected_name("a;b;c"), None);
    }

    #[test]
    fn alternatives_split_after_the_index() {
        assert_eq!(alternatives("1:a;b"), Some(vec!["a", "b"]));
        assert_eq!(alternatives("a;b"), None);
    }
}
