//! Natural-language number parsing.
//!
//! Accepts, in order of precedence:
//! 1. plain integers (`"33"`, `"-4"`)
//! 2. digits with an ordinal suffix (`"1st"`, `"33rd"`)
//! 3. English cardinal and ordinal words (`"thirty-three"`, `"thirty third"`,
//!    `"one hundred and five"`, `"two thousandth"`)

/// Class of a number word, used to reject sequences like "three three".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Word {
    Zero,
    Unit(i64),
    Teen(i64),
    Tens(i64),
    Hundred,
    Scale(i64),
}

const CARDINALS: &[(&str, Word)] = &[
    ("zero", Word::Zero),
    ("one", Word::Unit(1)),
    ("two", Word::Unit(2)),
    ("three", Word::Unit(3)),
    ("four", Word::Unit(4)),
    ("five", Word::Unit(5)),
    ("six", Word::Unit(6)),
    ("seven", Word::Unit(7)),
    ("eight", Word::Unit(8)),
    ("nine", Word::Unit(9)),
    ("ten", Word::Teen(10)),
    ("eleven", Word::Teen(11)),
    ("twelve", Word::Teen(12)),
    ("thirteen", Word::Teen(13)),
    ("fourteen", Word::Teen(14)),
    ("fifteen", Word::Teen(15)),
    ("sixteen", Word::Teen(16)),
    ("seventeen", Word::Teen(17)),
    ("eighteen", Word::Teen(18)),
    ("nineteen", Word::Teen(19)),
    ("twenty", Word::Tens(20)),
    ("thirty", Word::Tens(30)),
    ("forty", Word::Tens(40)),
    ("fifty", Word::Tens(50)),
    ("sixty", Word::Tens(60)),
    ("seventy", Word::Tens(70)),
    ("eighty", Word::Tens(80)),
    ("ninety", Word::Tens(90)),
    ("hundred", Word::Hundred),
    ("thousand", Word::Scale(1_000)),
    ("million", Word::Scale(1_000_000)),
    ("billion", Word::Scale(1_000_000_000)),
];

const ORDINALS: &[(&str, Word)] = &[
    ("zeroth", Word::Zero),
    ("first", Word::Unit(1)),
    ("second", Word::Unit(2)),
    ("third", Word::Unit(3)),
    ("fourth", Word::Unit(4)),
    ("fifth", Word::Unit(5)),
    ("sixth", Word::Unit(6)),
    ("seventh", Word::Unit(7)),
    ("eighth", Word::Unit(8)),
    ("ninth", Word::Unit(9)),
    ("tenth", Word::Teen(10)),
    ("eleventh", Word::Teen(11)),
    ("twelfth", Word::Teen(12)),
    ("thirteenth", Word::Teen(13)),
    ("fourteenth", Word::Teen(14)),
    ("fifteenth", Word::Teen(15)),
    ("sixteenth", Word::Teen(16)),
    ("seventeenth", Word::Teen(17)),
    ("eighteenth", Word::Teen(18)),
    ("nineteenth", Word::Teen(19)),
    ("twentieth", Word::Tens(20)),
    ("thirtieth", Word::Tens(30)),
    ("fortieth", Word::Tens(40)),
    ("fiftieth", Word::Tens(50)),
    ("sixtieth", Word::Tens(60)),
    ("seventieth", Word::Tens(70)),
    ("eightieth", Word::Tens(80)),
    ("ninetieth", Word::Tens(90)),
    ("hundredth", Word::Hundred),
    ("thousandth", Word::Scale(1_000)),
    ("millionth", Word::Scale(1_000_000)),
    ("billionth", Word::Scale(1_000_000_000)),
];

const ORDINAL_SUFFIXES: &[&str] = &["st", "nd", "rd", "th"];

/// Parse a number from digits, an ordinal, or English number words.
///
/// Returns `None` if the input is not recognized as a number.
///
/// # Example
///
/// ```
/// use assistant_webhook::parser::parse_number;
///
/// assert_eq!(parse_number("33rd"), Some(33));
/// assert_eq!(parse_number("thirty third"), Some(33));
/// assert_eq!(parse_number("thirty-three"), Some(33));
/// assert_eq!(parse_number("lots"), None);
/// ```
pub fn parse_number(input: &str) -> Option<i64> {
    let trimmed = input.trim();
    if let Ok(n) = trimmed.parse::<i64>() {
        return Some(n);
    }
    parse_ordinal_suffix(trimmed).or_else(|| parse_words(trimmed))
}

fn parse_ordinal_suffix(input: &str) -> Option<i64> {
    let lower = input.to_ascii_lowercase();
    ORDINAL_SUFFIXES.iter().find_map(|suffix| {
        let digits = lower.strip_suffix(suffix)?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok()
    })
}

fn lookup(token: &str) -> Option<(Word, bool)> {
    if let Some((_, word)) = CARDINALS.iter().find(|(name, _)| *name == token) {
        return Some((*word, false));
    }
    ORDINALS
        .iter()
        .find(|(name, _)| *name == token)
        .map(|(_, word)| (*word, true))
}

/// Whether `next` may directly follow `last` in a well-formed number.
fn follows(last: Option<Word>, next: Word) -> bool {
    use Word::*;

    match (last, next) {
        (None, _) => true,
        (Some(Zero), _) | (Some(_), Zero) => false,
        (Some(Unit(_)) | Some(Teen(_)), Unit(_) | Teen(_) | Tens(_)) => false,
        (Some(Unit(_)) | Some(Teen(_)), Hundred | Scale(_)) => true,
        (Some(Tens(_)), Unit(_) | Scale(_)) => true,
        (Some(Tens(_)), _) => false,
        (Some(Hundred), Hundred) => false,
        (Some(Hundred), _) => true,
        (Some(Scale(_)), Hundred) => false,
        (Some(Scale(_)), _) => true,
    }
}

fn parse_words(input: &str) -> Option<i64> {
    let lower = input.to_lowercase();
    let tokens: Vec<&str> = lower
        .split(|c: char| c == '-' || c.is_whitespace())
        .filter(|t| !t.is_empty() && *t != "and")
        .collect();
    if tokens.is_empty() {
        return None;
    }

    let mut total: i64 = 0;
    let mut current: i64 = 0;
    let mut last: Option<Word> = None;
    let mut last_scale: Option<i64> = None;
    // A group is the run of words between scales; it holds at most one hundred.
    let mut group_hundred = false;

    for (i, token) in tokens.iter().enumerate() {
        let (word, ordinal) = lookup(token)?;
        // Ordinal words only close a number: "third thousand" is not one.
        if ordinal && i + 1 != tokens.len() {
            return None;
        }
        if !follows(last, word) {
            return None;
        }

        match word {
            Word::Zero => {}
            Word::Unit(n) | Word::Teen(n) | Word::Tens(n) => current += n,
            Word::Hundred => {
                if group_hundred {
                    return None;
                }
                current = current.max(1) * 100;
                group_hundred = true;
            }
            Word::Scale(n) => {
                if last_scale.is_some_and(|prev| n >= prev) {
                    return None;
                }
                total += current.max(1) * n;
                current = 0;
                last_scale = Some(n);
                group_hundred = false;
            }
        }
        last = Some(word);
    }

    Some(total + current)
}
