//! Common types used by the grammar engine

use strum_macros::{Display, EnumString};

/// URI schemes the parser knows how to look inside
#[derive(Debug, Clone, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Scheme {
    Sip,
    Sips,
    Tel,
    /// Any other absolute URI scheme (only checked for shape)
    #[strum(default)]
    Other(String),
}

/// Represents a range within the source text
/// This avoids copying data during parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextRange {
    pub start: usize,
    pub end: usize,
}

impl TextRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Get the string slice this range represents
    pub fn as_str<'a>(&self, text: &'a str) -> &'a str {
        &text[self.start..self.end]
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scheme_parsing() {
        assert_eq!("sip".parse::<Scheme>().unwrap(), Scheme::Sip);
        assert_eq!("SIPS".parse::<Scheme>().unwrap(), Scheme::Sips);
        assert_eq!("tel".parse::<Scheme>().unwrap(), Scheme::Tel);
        assert_eq!(
            "urn".parse::<Scheme>().unwrap(),
            Scheme::Other("urn".to_string())
        );
    }

    #[test]
    fn test_text_range() {
        let text = "Call-ID: abc";
        let range = TextRange::new(0, 7);
        assert_eq!(range.as_str(text), "Call-ID");
        assert_eq!(range.len(), 7);
        assert!(!range.is_empty());
    }
}
