// Copyright (c) 2026 rezky_nightky

use std::collections::HashSet;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Charset(u32);

impl Charset {
    pub const ENGLISH_LETTERS: Charset = Charset(0x1);
    pub const ENGLISH_DIGITS: Charset = Charset(0x2);
    pub const ENGLISH_PUNCTUATION: Charset = Charset(0x4);
    pub const KATAKANA: Charset = Charset(0x8);
    pub const BINARY: Charset = Charset(0x100);
    pub const HEX: Charset = Charset(0x200);
    pub const BRAILLE: Charset = Charset(0x800);
    pub const BLOCKS: Charset = Charset(0x8000);
    pub const DNA: Charset = Charset(0x40000);

    pub const ASCII: Charset = Charset(0x7);
    pub const MATRIX: Charset = Charset(0x108);

    pub fn contains(self, other: Charset) -> bool {
        (self.0 & other.0) != 0
    }
}

/// Alphabets must be longer than this many chars.
pub const MIN_ALPHABET_EXCLUSIVE: usize = 5;
/// Alphabets must be shorter than this many chars.
pub const MAX_ALPHABET_EXCLUSIVE: usize = 200;

pub fn is_valid_alphabet(chars: &[char]) -> bool {
    chars.len() > MIN_ALPHABET_EXCLUSIVE && chars.len() < MAX_ALPHABET_EXCLUSIVE
}

pub fn charset_from_str(spec: &str) -> Result<Charset, String> {
    let spec = spec.trim().to_ascii_lowercase();
    match spec.as_str() {
        "matrix" | "default" => Ok(Charset::MATRIX),
        "ascii" => Ok(Charset::ASCII),
        "english" => Ok(Charset::ENGLISH_LETTERS),
        "digits" | "dec" | "decimal" => Ok(Charset::ENGLISH_DIGITS),
        "hex" | "hexadecimal" => Ok(Charset::HEX),
        "katakana" => Ok(Charset::KATAKANA),
        "blocks" => Ok(Charset::BLOCKS),
        "braille" => Ok(Charset::BRAILLE),
        "dna" => Ok(Charset::DNA),
        "hacker" => Ok(Charset(
            Charset::ENGLISH_LETTERS.0 | Charset::HEX.0 | Charset::ENGLISH_PUNCTUATION.0,
        )),
        _ => Err(format!(
            "unsupported charset: {} (see --list-charsets)",
            spec
        )),
    }
}

fn push_range(out: &mut Vec<char>, start: u32, end: u32) {
    for v in start..=end {
        if let Some(ch) = char::from_u32(v) {
            out.push(ch);
        }
    }
}

pub fn build_chars(charset: Charset) -> Vec<char> {
    let mut out: Vec<char> = Vec::new();

    if charset.contains(Charset::BINARY) {
        push_range(&mut out, 0x30, 0x31);
    }
    if charset.contains(Charset::HEX) {
        push_range(&mut out, 0x30, 0x39);
        push_range(&mut out, 0x41, 0x46);
    }
    if charset.contains(Charset::ENGLISH_LETTERS) {
        push_range(&mut out, 0x41, 0x5A);
        push_range(&mut out, 0x61, 0x7A);
    }
    if charset.contains(Charset::ENGLISH_DIGITS) {
        push_range(&mut out, 0x30, 0x39);
    }
    if charset.contains(Charset::ENGLISH_PUNCTUATION) {
        push_range(&mut out, 0x21, 0x2F);
        push_range(&mut out, 0x3A, 0x40);
        push_range(&mut out, 0x5B, 0x60);
        push_range(&mut out, 0x7B, 0x7E);
    }
    if charset.contains(Charset::KATAKANA) {
        // Half-width forms, one cell each.
        push_range(&mut out, 0xFF66, 0xFF9D);
    }
    if charset.contains(Charset::BRAILLE) {
        // Six-dot patterns only.
        push_range(&mut out, 0x2800, 0x283F);
    }
    if charset.contains(Charset::BLOCKS) {
        push_range(&mut out, 0x2580, 0x259F);
    }
    if charset.contains(Charset::DNA) {
        out.extend("ACGTacgt".chars());
    }

    let mut seen = HashSet::new();
    out.retain(|c| seen.insert(*c));
    out
}

/// The alphabet used when none (or an invalid one) is configured.
pub fn default_alphabet() -> Vec<char> {
    build_chars(Charset::MATRIX)
}

pub fn print_list_charsets() {
    println!("AVAILABLE CHARSET PRESETS:");
    println!("NOTE: Use only the VALUE (left side) with --charset.");
    println!();
    println!("VALUE        DESCRIPTION");
    println!("matrix       0 and 1 + half-width katakana (default)");
    println!("ascii        Letters + digits + punctuation");
    println!("english      Letters only");
    println!("digits       Digits only (aliases: dec, decimal)");
    println!("hex          0-9 and A-F (alias: hexadecimal)");
    println!("katakana     Katakana");
    println!("blocks       Block elements");
    println!("braille      Braille");
    println!("dna          DNA bases (ACGT, both cases)");
    println!("hacker       Letters + hex + punctuation (combo)");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_alphabet_is_binary_plus_katakana_and_valid() {
        let a = default_alphabet();
        assert_eq!(&a[..2], &['0', '1']);
        assert!(a.contains(&'ｱ'));
        assert!(is_valid_alphabet(&a));
    }

    #[test]
    fn alphabet_bounds_are_exclusive() {
        let five: Vec<char> = "abcde".chars().collect();
        let six: Vec<char> = "abcdef".chars().collect();
        assert!(!is_valid_alphabet(&five));
        assert!(is_valid_alphabet(&six));
        assert!(!is_valid_alphabet(&['x'; 200]));
        assert!(is_valid_alphabet(&['x'; 199]));
    }

    #[test]
    fn every_preset_builds_a_valid_alphabet() {
        for name in [
            "matrix", "ascii", "english", "digits", "hex", "katakana", "blocks", "braille",
            "dna", "hacker",
        ] {
            let cs = charset_from_str(name).unwrap();
            let chars = build_chars(cs);
            assert!(is_valid_alphabet(&chars), "{}", name);
        }
    }

    #[test]
    fn combined_presets_hold_each_glyph_once() {
        let hacker = build_chars(charset_from_str("hacker").unwrap());
        let mut sorted = hacker.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), hacker.len());
        assert_eq!(hacker.iter().filter(|&&c| c == 'A').count(), 1);
        assert_eq!(hacker.len(), 52 + 10 + 32);
    }

    #[test]
    fn unknown_charset_is_rejected() {
        assert!(charset_from_str("klingon").is_err());
    }
}
