//! String and iterable helpers

use encoding_rs::ISO_8859_15;

use crate::HutiError;

/// Remove one trailing newline and/or ANSI escape codes.
pub fn strip(text: &str, ansi: bool, newline: bool) -> String {
    let text = if newline { text.strip_suffix('\n').unwrap_or(text) } else { text };
    if ansi {
        console::strip_ansi_codes(text).into_owned()
    } else {
        text.to_string()
    }
}

/// Split `text` into consecutive character pairs. A trailing odd character
/// is dropped.
pub fn split_pairs(text: &str) -> Vec<(char, char)> {
    let chars: Vec<char> = text.chars().collect();
    chars.chunks_exact(2).map(|pair| (pair[0], pair[1])).collect()
}

/// Hex encoding of `chars` in Latin-9 (ISO-8859-15).
pub fn to_latin9(chars: &str) -> Result<String, HutiError> {
    let (bytes, _, unmappable) = ISO_8859_15.encode(chars);
    if unmappable {
        return Err(HutiError::InvalidArgument(format!("not representable in latin9: {chars}")));
    }
    Ok(bytes.iter().map(|b| format!("{b:02x}")).collect())
}

/// Decode Latin-9 hex, e.g. `"f1"` into `"ñ"`.
pub fn from_latin9(hex: &str) -> Result<String, HutiError> {
    if !hex.is_ascii() {
        return Err(HutiError::InvalidArgument(format!("non-hex characters: {hex}")));
    }
    if hex.len() % 2 != 0 {
        return Err(HutiError::InvalidArgument(format!("odd-length hex: {hex}")));
    }
    let bytes = split_pairs(hex)
        .into_iter()
        .map(|(hi, lo)| {
            let pair: String = [hi, lo].iter().collect();
            u8::from_str_radix(&pair, 16)
                .map_err(|_| HutiError::InvalidArgument(format!("invalid hex pair: {pair}")))
        })
        .collect::<Result<Vec<u8>, _>>()?;
    let (decoded, _) = ISO_8859_15.decode_without_bom_handling(&bytes);
    Ok(decoded.into_owned())
}

/// Split `text` on `separator`, dropping empty parts.
pub fn toiter<'a>(text: &'a str, separator: &str) -> Vec<&'a str> {
    text.split(separator).filter(|part| !part.is_empty()).collect()
}

/// Whether every item of `origin` is in `destination`.
pub fn allin<T: PartialEq>(origin: &[T], destination: &[T]) -> bool {
    origin.iter().all(|item| destination.contains(item))
}

/// First item of `origin` found in `destination`.
pub fn anyin<'a, T: PartialEq>(origin: &'a [T], destination: &[T]) -> Option<&'a T> {
    origin.iter().find(|item| destination.contains(item))
}

/// First item satisfying `apply`.
pub fn firstfound<I, F>(data: I, mut apply: F) -> Option<I::Item>
where
    I: IntoIterator,
    F: FnMut(&I::Item) -> bool,
{
    data.into_iter().find(|item| apply(item))
}

/// Spreadsheet-style column counter: `A`, `B`, ..., `Z`, `AA`, `AB`, ...
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LetterCounter {
    // Least significant letter first, 0 = 'A'.
    digits: Vec<u8>,
}

impl Default for LetterCounter {
    fn default() -> Self {
        Self { digits: vec![0] }
    }
}

impl LetterCounter {
    /// Start counting at `start` (uppercase ASCII letters only).
    pub fn new(start: &str) -> Result<Self, HutiError> {
        if start.is_empty() || !start.bytes().all(|b| b.is_ascii_uppercase()) {
            return Err(HutiError::InvalidArgument(format!("invalid counter start: {start:?}")));
        }
        Ok(Self { digits: start.bytes().rev().map(|b| b - b'A').collect() })
    }

    pub fn current(&self) -> String {
        self.digits.iter().rev().map(|d| char::from(b'A' + d)).collect()
    }

    /// Advance by one and return the new value.
    pub fn increment(&mut self) -> String {
        let mut carry = true;
        for digit in self.digits.iter_mut() {
            if *digit < 25 {
                *digit += 1;
                carry = false;
                break;
            }
            *digit = 0;
        }
        if carry {
            self.digits.push(0);
        }
        self.current()
    }
}

impl Iterator for LetterCounter {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        Some(self.increment())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const JOSE: &str = "José Antonio Puértolas Montañés";
    const JOSE_HEX: &str = "4a6f73e920416e746f6e696f205075e972746f6c6173204d6f6e7461f1e973";

    #[test]
    fn test_strip_newline_and_ansi() {
        assert_eq!(strip("line\n", false, true), "line");
        assert_eq!(strip("line\n\n", false, true), "line\n");
        assert_eq!(strip("line\n", false, false), "line\n");
        assert_eq!(strip("\u{1b}[31mred\u{1b}[0m\n", true, true), "red");
    }

    #[test]
    fn test_split_pairs() {
        assert_eq!(split_pairs("123456"), vec![('1', '2'), ('3', '4'), ('5', '6')]);
        assert_eq!(split_pairs("123"), vec![('1', '2')]);
    }

    #[test]
    fn test_latin9() {
        assert_eq!(to_latin9("ñ").unwrap(), "f1");
        assert_eq!(to_latin9(JOSE).unwrap(), JOSE_HEX);
        assert_eq!(from_latin9("f1").unwrap(), "ñ");
        assert_eq!(from_latin9(JOSE_HEX).unwrap(), JOSE);
        assert_eq!(from_latin9("a4").unwrap(), "€");
        assert!(from_latin9("f").is_err());
        assert!(from_latin9("zz").is_err());
        assert!(to_latin9("🚀").is_err());
    }

    #[test]
    fn test_from_latin9_rejects_non_ascii_input() {
        assert!(from_latin9("é").is_err());
        assert!(from_latin9("f1é").is_err());
        assert!(from_latin9("ñ1").is_err());
    }

    #[test]
    fn test_toiter() {
        assert_eq!(toiter("test1", " "), vec!["test1"]);
        assert_eq!(toiter("test1 test2", " "), vec!["test1", "test2"]);
        assert_eq!(toiter("test1.test2", "."), vec!["test1", "test2"]);
    }

    #[test]
    fn test_allin_anyin() {
        let destination = ["bool", "dict", "int"];
        assert!(allin(&["bool", "int"], &destination));
        assert!(!allin(&["tuple", "int"], &destination));
        assert_eq!(anyin(&["tuple", "int"], &destination), Some(&"int"));
        assert_eq!(anyin(&["tuple"], &destination), None);
    }

    #[test]
    fn test_firstfound() {
        assert_eq!(firstfound([1, 2, 3], |x| *x == 2), Some(2));
        assert_eq!(firstfound([1, 2, 3], |x| *x == 4), None);
    }

    #[test]
    fn test_letter_counter() {
        let mut counter = LetterCounter::new("Z").unwrap();
        assert_eq!(counter.increment(), "AA");

        let mut counter = LetterCounter::new("BWDLQZZ").unwrap();
        assert_eq!(counter.increment(), "BWDLRAA");
        assert_eq!(counter.increment(), "BWDLRAB");

        let mut counter = LetterCounter::default();
        assert_eq!(counter.by_ref().take(3).collect::<Vec<_>>(), vec!["B", "C", "D"]);
        assert_eq!(LetterCounter::new("ZZ").unwrap().increment(), "AAA");
        assert!(LetterCounter::new("a1").is_err());
    }
}
