//! Splits an argument string into a preamble and `prefix/value` groups.
//!
//! A prefix only counts when it follows a whitespace character (space, tab,
//! newline), so `t/` never matches inside `bt/` or `pt/`.

use super::{ParseError, ParseResult};
use std::collections::HashMap;
use std::fmt::{Display, Formatter};

/// Field marker such as `n/` or `pt/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Prefix(&'static str);

impl Prefix {
    pub const fn new(marker: &'static str) -> Self {
        Self(marker)
    }

    pub fn as_str(self) -> &'static str {
        self.0
    }
}

impl Display for Prefix {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}

pub const PREFIX_NAME: Prefix = Prefix::new("n/");
pub const PREFIX_GENDER: Prefix = Prefix::new("g/");
pub const PREFIX_BIRTHDATE: Prefix = Prefix::new("b/");
pub const PREFIX_BLOOD_TYPE: Prefix = Prefix::new("bt/");
pub const PREFIX_PHONE: Prefix = Prefix::new("p/");
pub const PREFIX_EMAIL: Prefix = Prefix::new("e/");
pub const PREFIX_ADDRESS: Prefix = Prefix::new("a/");
pub const PREFIX_REMARK: Prefix = Prefix::new("r/");
pub const PREFIX_TAG: Prefix = Prefix::new("t/");

pub const PREFIX_START: Prefix = Prefix::new("s/");
pub const PREFIX_END: Prefix = Prefix::new("e/");
pub const PREFIX_PATIENT: Prefix = Prefix::new("pt/");
pub const PREFIX_DESCRIPTION: Prefix = Prefix::new("d/");

/// Tokenized arguments of one command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgumentMultimap {
    preamble: String,
    values: HashMap<Prefix, Vec<String>>,
}

impl ArgumentMultimap {
    /// Text before the first recognised prefix, trimmed.
    pub fn preamble(&self) -> &str {
        &self.preamble
    }

    /// Last value given for `prefix`.
    pub fn value(&self, prefix: Prefix) -> Option<&str> {
        self.values
            .get(&prefix)
            .and_then(|values| values.last())
            .map(String::as_str)
    }

    /// Every value given for `prefix`, in input order.
    pub fn all_values(&self, prefix: Prefix) -> &[String] {
        self.values.get(&prefix).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, prefix: Prefix) -> bool {
        self.values.contains_key(&prefix)
    }

    pub fn contains_all(&self, prefixes: &[Prefix]) -> bool {
        prefixes.iter().all(|prefix| self.contains(*prefix))
    }

    /// Rejects any of `prefixes` given more than once.
    ///
    /// # Errors
    /// - `DuplicatePrefix` listing every repeated prefix.
    pub fn verify_no_duplicate(&self, prefixes: &[Prefix]) -> ParseResult<()> {
        let repeated: Vec<&'static str> = prefixes
            .iter()
            .filter(|prefix| self.all_values(**prefix).len() > 1)
            .map(|prefix| prefix.as_str())
            .collect();
        if repeated.is_empty() {
            Ok(())
        } else {
            Err(ParseError::DuplicatePrefix(repeated))
        }
    }
}

/// Tokenizes `args` against the prefixes a command recognises.
pub fn tokenize(args: &str, prefixes: &[Prefix]) -> ArgumentMultimap {
    let padded = format!(" {args}");
    let mut positions: Vec<(usize, Prefix)> = Vec::new();
    let mut after_whitespace = false;
    for (at, ch) in padded.char_indices() {
        if after_whitespace {
            let rest = &padded[at..];
            if let Some(prefix) = prefixes.iter().find(|prefix| rest.starts_with(prefix.as_str())) {
                positions.push((at, *prefix));
            }
        }
        after_whitespace = ch.is_whitespace();
    }

    let preamble_end = positions.first().map_or(padded.len(), |(at, _)| *at);
    let mut multimap = ArgumentMultimap {
        preamble: padded[..preamble_end].trim().to_string(),
        values: HashMap::new(),
    };

    for (slot, (at, prefix)) in positions.iter().enumerate() {
        let value_start = at + prefix.as_str().len();
        let value_end = positions
            .get(slot + 1)
            .map_or(padded.len(), |(next, _)| *next);
        let value = padded[value_start..value_end].trim().to_string();
        multimap.values.entry(*prefix).or_default().push(value);
    }
    multimap
}
