//! Character classes and the character-property predicates reserved by the
//! grammar language (`<alpha>`, `<digit>`, and so on).

/// A set of Unicode scalar values stored as sorted, non-overlapping
/// inclusive ranges. Compact for the common case of a handful of
/// single-character or contiguous-range entries in a `[...]` class.
#[derive(Debug, Clone, Default)]
pub struct CharClass {
    ranges: Vec<(u32, u32)>,
}

impl CharClass {
    pub fn new() -> Self {
        CharClass { ranges: Vec::new() }
    }

    pub fn push_char(&mut self, c: char) {
        self.push_range(c as u32, c as u32);
    }

    pub fn push_range(&mut self, lo: u32, hi: u32) {
        self.ranges.push((lo.min(hi), lo.max(hi)));
    }

    pub fn contains(&self, c: char) -> bool {
        let v = c as u32;
        self.ranges.iter().any(|&(lo, hi)| v >= lo && v <= hi)
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}

/// Character-property predicate names reserved by the grammar language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharProperty {
    Alnum,
    Alpha,
    Ascii,
    Control,
    DDigit,
    Digit,
    Graph,
    Lower,
    Print,
    Punct,
    Space,
    Upper,
    WordChar,
    XDigit,
}

impl CharProperty {
    /// Parses a reserved identifier into the predicate it names, or `None`
    /// if the identifier is an ordinary rule name.
    pub fn from_ident(ident: &str) -> Option<Self> {
        Some(match ident {
            "alnum" => CharProperty::Alnum,
            "alpha" => CharProperty::Alpha,
            "ascii" => CharProperty::Ascii,
            "control" => CharProperty::Control,
            "ddigit" => CharProperty::DDigit,
            "digit" => CharProperty::Digit,
            "graph" => CharProperty::Graph,
            "lower" => CharProperty::Lower,
            "print" => CharProperty::Print,
            "punct" => CharProperty::Punct,
            "space" => CharProperty::Space,
            "upper" => CharProperty::Upper,
            "wordchar" => CharProperty::WordChar,
            "xdigit" => CharProperty::XDigit,
            _ => return None,
        })
    }

    pub fn matches(self, c: char) -> bool {
        match self {
            CharProperty::Alnum => c.is_alphanumeric(),
            CharProperty::Alpha => c.is_alphabetic(),
            CharProperty::Ascii => c.is_ascii(),
            CharProperty::Control => c.is_control(),
            CharProperty::DDigit => c.is_ascii_digit(),
            CharProperty::Digit => c.is_numeric(),
            CharProperty::Graph => c.is_ascii_graphic(),
            CharProperty::Lower => c.is_lowercase(),
            CharProperty::Print => !c.is_control(),
            CharProperty::Punct => c.is_ascii_punctuation(),
            CharProperty::Space => c.is_whitespace(),
            CharProperty::Upper => c.is_uppercase(),
            CharProperty::WordChar => c.is_alphanumeric() || c == '_',
            CharProperty::XDigit => c.is_ascii_hexdigit(),
        }
    }

    /// The runtime function name this predicate mangles to in emitted code.
    pub fn runtime_name(self) -> &'static str {
        match self {
            CharProperty::Alnum => "is_alnum",
            CharProperty::Alpha => "is_alpha",
            CharProperty::Ascii => "is_ascii",
            CharProperty::Control => "is_control",
            CharProperty::DDigit => "is_ddigit",
            CharProperty::Digit => "is_digit",
            CharProperty::Graph => "is_graph",
            CharProperty::Lower => "is_lower",
            CharProperty::Print => "is_print",
            CharProperty::Punct => "is_punct",
            CharProperty::Space => "is_space",
            CharProperty::Upper => "is_upper",
            CharProperty::WordChar => "is_wordchar",
            CharProperty::XDigit => "is_xdigit",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_contains_pushed_ranges() {
        let mut class = CharClass::new();
        class.push_range('a' as u32, 'z' as u32);
        assert!(class.contains('m'));
        assert!(!class.contains('M'));
    }

    #[test]
    fn property_lookup_is_case_sensitive_and_exact() {
        assert_eq!(CharProperty::from_ident("digit"), Some(CharProperty::Digit));
        assert_eq!(CharProperty::from_ident("Digit"), None);
        assert_eq!(CharProperty::from_ident("rule_name"), None);
    }
}
