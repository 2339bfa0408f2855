//! Symbol alphabets used as list markers in practical exam answers.
//!
//! Every family that can label a blank or form a symbol list lives here:
//! Korean consonant jamo (ㄱ ㄴ ㄷ …), circled digits (① ② …), Korean
//! ordinal letters (가 나 다 …) and plain numbers. Each family knows its
//! code points, the 1-based position of a member and the canonical ordering
//! used when a symbol list is compared as a set.

use serde::{Deserialize, Serialize};

/// The 14 basic consonants in dictionary order
const BASIC_JAMO: [char; 14] = [
  'ㄱ', 'ㄴ', 'ㄷ', 'ㄹ', 'ㅁ', 'ㅂ', 'ㅅ', 'ㅇ', 'ㅈ', 'ㅊ', 'ㅋ', 'ㅌ', 'ㅍ', 'ㅎ',
];

/// Ordinal letters used as blank labels, in order
const KOREAN_ORDINALS: [char; 14] = [
  '가', '나', '다', '라', '마', '바', '사', '아', '자', '차', '카', '타', '파', '하',
];

/// Conjoining choseong U+1100..=U+1112 mapped to compatibility jamo.
/// Some IMEs emit these while composing.
const CHOSEONG_TO_COMPAT: [char; 19] = [
  'ㄱ', 'ㄲ', 'ㄴ', 'ㄷ', 'ㄸ', 'ㄹ', 'ㅁ', 'ㅂ', 'ㅃ', 'ㅅ', 'ㅆ', 'ㅇ', 'ㅈ', 'ㅉ', 'ㅊ', 'ㅋ', 'ㅌ',
  'ㅍ', 'ㅎ',
];

const CIRCLED_FIRST: u32 = 0x2460; // ①
const CIRCLED_LAST: u32 = 0x2473; // ⑳
const JAMO_FIRST: char = '\u{3131}'; // ㄱ
const JAMO_LAST: char = '\u{314E}'; // ㅎ

/// A family of list-marker glyphs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolAlphabet {
  /// ㄱ ㄴ ㄷ … (compatibility consonant jamo)
  KoreanJamo,
  /// ① … ⑳
  Circled,
  /// 가 나 다 …
  KoreanOrdinal,
  /// 1 2 3 …
  Numeric,
}

/// One list symbol, identified by family and value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol {
  pub alphabet: SymbolAlphabet,
  /// Code point for glyph families, numeric value for `Numeric`
  pub value: u32,
}

impl SymbolAlphabet {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::KoreanJamo => "korean_jamo",
      Self::Circled => "circled",
      Self::KoreanOrdinal => "korean_ordinal",
      Self::Numeric => "number",
    }
  }

  /// Whether `ch` is a single-glyph member of this family
  pub fn contains(&self, ch: char) -> bool {
    match self {
      Self::KoreanJamo => (JAMO_FIRST..=JAMO_LAST).contains(&ch),
      Self::Circled => (CIRCLED_FIRST..=CIRCLED_LAST).contains(&(ch as u32)),
      Self::KoreanOrdinal => KOREAN_ORDINALS.contains(&ch),
      Self::Numeric => ch.is_ascii_digit(),
    }
  }

  /// Family of a single glyph symbol (jamo, circled digit or ordinal letter)
  pub fn of_glyph(ch: char) -> Option<Self> {
    [Self::KoreanJamo, Self::Circled, Self::KoreanOrdinal]
      .into_iter()
      .find(|alphabet| alphabet.contains(ch))
  }

  /// Jamo and circled digits are never part of ordinary words
  pub fn is_list_symbol(ch: char) -> bool {
    Self::KoreanJamo.contains(ch) || Self::Circled.contains(ch)
  }

  /// Map a conjoining choseong to its compatibility jamo
  pub fn compatibility_jamo(ch: char) -> Option<char> {
    let offset = (ch as u32).checked_sub(0x1100)?;
    CHOSEONG_TO_COMPAT.get(offset as usize).copied()
  }

  /// 1-based position of a glyph within its family.
  ///
  /// This is what makes `가`, `①` and `ㄱ` interchangeable as labels: all
  /// three are position 1. Jamo outside the 14 basic consonants have no
  /// position.
  pub fn position(&self, ch: char) -> Option<u32> {
    match self {
      Self::KoreanJamo => BASIC_JAMO.iter().position(|&c| c == ch).map(|i| i as u32 + 1),
      Self::Circled => self.contains(ch).then(|| ch as u32 - CIRCLED_FIRST + 1),
      Self::KoreanOrdinal => KOREAN_ORDINALS.iter().position(|&c| c == ch).map(|i| i as u32 + 1),
      Self::Numeric => ch.to_digit(10),
    }
  }

  /// Glyph at a 1-based position
  pub fn glyph(&self, position: u32) -> Option<String> {
    let idx = position.checked_sub(1)? as usize;
    match self {
      Self::KoreanJamo => BASIC_JAMO.get(idx).map(|c| c.to_string()),
      Self::Circled => (position <= 20)
        .then(|| char::from_u32(CIRCLED_FIRST + position - 1))
        .flatten()
        .map(|c| c.to_string()),
      Self::KoreanOrdinal => KOREAN_ORDINALS.get(idx).map(|c| c.to_string()),
      Self::Numeric => Some(position.to_string()),
    }
  }
}

impl Symbol {
  pub fn glyph(alphabet: SymbolAlphabet, ch: char) -> Self {
    Self {
      alphabet,
      value: ch as u32,
    }
  }

  pub fn number(value: u32) -> Self {
    Self {
      alphabet: SymbolAlphabet::Numeric,
      value,
    }
  }

  /// Comparison key. Circled digits compare equal to the plain number they
  /// show, the same identity `normalize` gives them (`①` → `1`).
  pub fn key(&self) -> (SymbolAlphabet, u32) {
    match self.alphabet {
      SymbolAlphabet::Circled => (SymbolAlphabet::Numeric, self.value - CIRCLED_FIRST + 1),
      other => (other, self.value),
    }
  }

  pub fn render(&self) -> String {
    match self.alphabet {
      SymbolAlphabet::Numeric => self.value.to_string(),
      _ => char::from_u32(self.value).map(String::from).unwrap_or_default(),
    }
  }
}
