//! Patient record and its validated field types.
//!
//! # Responsibility
//! - Validate every patient attribute at construction time.
//! - Define patient identity (same name, ignoring case and spacing).
//!
//! # Invariants
//! - A `Patient` can only hold validated field values.
//! - Two patients with the same identity never coexist in one book.

use super::tag::{format_tags, TagSet};
use super::{Identity, ValidationError};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt::{Display, Formatter};

pub const BIRTHDATE_FORMAT: &str = "%Y-%m-%d";

static NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\p{Alphabetic}\p{N}][\p{Alphabetic}\p{N} ]*$").expect("valid name regex"));
static PHONE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{3,}$").expect("valid phone regex"));
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[A-Za-z0-9](?:[A-Za-z0-9+_.\-]*[A-Za-z0-9])?@(?:[A-Za-z0-9](?:[A-Za-z0-9\-]*[A-Za-z0-9])?\.)*[A-Za-z0-9](?:[A-Za-z0-9\-]*[A-Za-z0-9])?$",
    )
    .expect("valid email regex")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Name(String);

impl Name {
    pub fn new(value: &str) -> Result<Self, ValidationError> {
        let trimmed = value.trim();
        if !NAME_RE.is_match(trimmed) {
            return Err(ValidationError::InvalidName(value.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lowercased, single-spaced form used for identity comparison and lookup.
    pub fn identity_key(&self) -> String {
        identity_key(&self.0)
    }
}

/// Normalizes free text the same way `Name::identity_key` does.
pub fn identity_key(text: &str) -> String {
    text.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "m" | "male" => Ok(Self::Male),
            "f" | "female" => Ok(Self::Female),
            "other" => Ok(Self::Other),
            _ => Err(ValidationError::InvalidGender(value.to_string())),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
            Self::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Birthdate(NaiveDate);

impl Birthdate {
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        NaiveDate::parse_from_str(value.trim(), BIRTHDATE_FORMAT)
            .map(Self)
            .map_err(|_| ValidationError::InvalidBirthdate(value.to_string()))
    }
}

impl Display for Birthdate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format(BIRTHDATE_FORMAT))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BloodType {
    APositive,
    ANegative,
    BPositive,
    BNegative,
    AbPositive,
    AbNegative,
    OPositive,
    ONegative,
}

impl BloodType {
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        match value.trim().to_ascii_uppercase().as_str() {
            "A+" => Ok(Self::APositive),
            "A-" => Ok(Self::ANegative),
            "B+" => Ok(Self::BPositive),
            "B-" => Ok(Self::BNegative),
            "AB+" => Ok(Self::AbPositive),
            "AB-" => Ok(Self::AbNegative),
            "O+" => Ok(Self::OPositive),
            "O-" => Ok(Self::ONegative),
            _ => Err(ValidationError::InvalidBloodType(value.to_string())),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::APositive => "A+",
            Self::ANegative => "A-",
            Self::BPositive => "B+",
            Self::BNegative => "B-",
            Self::AbPositive => "AB+",
            Self::AbNegative => "AB-",
            Self::OPositive => "O+",
            Self::ONegative => "O-",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Phone(String);

impl Phone {
    pub fn new(value: &str) -> Result<Self, ValidationError> {
        let trimmed = value.trim();
        if !PHONE_RE.is_match(trimmed) {
            return Err(ValidationError::InvalidPhone(value.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email(String);

impl Email {
    pub fn new(value: &str) -> Result<Self, ValidationError> {
        let trimmed = value.trim();
        let domain_ok = trimmed
            .rsplit_once('@')
            .and_then(|(_, domain)| domain.rsplit('.').next())
            .is_some_and(|last_label| last_label.chars().count() >= 2);
        if !EMAIL_RE.is_match(trimmed) || !domain_ok {
            return Err(ValidationError::InvalidEmail(value.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address(String);

impl Address {
    pub fn new(value: &str) -> Result<Self, ValidationError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::BlankAddress);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Free-text remark; empty means "no remark".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Remark(String);

impl Remark {
    pub fn new(value: &str) -> Self {
        Self(value.trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Patient record.
///
/// Identity is the name only; every other attribute may change without the
/// patient becoming a different logical entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patient {
    pub name: Name,
    pub gender: Gender,
    pub birthdate: Birthdate,
    pub blood_type: BloodType,
    pub phone: Phone,
    pub email: Email,
    pub address: Address,
    pub remark: Remark,
    pub tags: TagSet,
}

impl Identity for Patient {
    fn same_identity(&self, other: &Self) -> bool {
        self.name.identity_key() == other.name.identity_key()
    }
}

impl Display for Patient {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}; Gender: {}; Birthdate: {}; Blood type: {}; Phone: {}; Email: {}; Address: {}",
            self.name.as_str(),
            self.gender.as_str(),
            self.birthdate,
            self.blood_type.as_str(),
            self.phone.as_str(),
            self.email.as_str(),
            self.address.as_str()
        )?;
        if !self.remark.is_empty() {
            write!(f, "; Remark: {}", self.remark.as_str())?;
        }
        if !self.tags.is_empty() {
            write!(f, "; Tags: {}", format_tags(&self.tags))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Address, BloodType, Email, Gender, Name, Phone};
    use crate::model::ValidationError;

    #[test]
    fn name_accepts_words_and_rejects_symbols() {
        assert_eq!(Name::new("  Alex Yeoh ").unwrap().as_str(), "Alex Yeoh");
        assert!(Name::new("").is_err());
        assert!(Name::new("Alex*").is_err());
        assert!(Name::new(" leading space is trimmed").is_ok());
    }

    #[test]
    fn identity_key_ignores_case_and_spacing() {
        let first = Name::new("Alex   Yeoh").unwrap();
        let second = Name::new("alex yeoh").unwrap();
        assert_eq!(first.identity_key(), second.identity_key());
    }

    #[test]
    fn phone_requires_three_digits() {
        assert!(Phone::new("911").is_ok());
        assert_eq!(
            Phone::new("91").unwrap_err(),
            ValidationError::InvalidPhone("91".to_string())
        );
        assert!(Phone::new("9a11").is_err());
    }

    #[test]
    fn email_validates_local_part_and_domain() {
        assert!(Email::new("alexyeoh@example.com").is_ok());
        assert!(Email::new("a+b_c.d@mail.example.org").is_ok());
        assert!(Email::new("-alex@example.com").is_err());
        assert!(Email::new("alex@example.c").is_err());
        assert!(Email::new("alex.example.com").is_err());
    }

    #[test]
    fn enums_parse_case_insensitively() {
        assert_eq!(Gender::parse("F").unwrap(), Gender::Female);
        assert_eq!(BloodType::parse("ab-").unwrap(), BloodType::AbNegative);
        assert!(BloodType::parse("C+").is_err());
    }

    #[test]
    fn address_rejects_blank() {
        assert_eq!(Address::new("  ").unwrap_err(), ValidationError::BlankAddress);
    }
}
