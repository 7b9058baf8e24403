//! Public tracking numbers.
//!
//! A tracking number is `HK`, the creation date as `YYMMDD`, and six random
//! characters from `[A-Z0-9]`, e.g. `HK250314Q7ZP0B`. It is the only handle a
//! customer has on their order, so lookups accept any casing and surrounding
//! whitespace.

use core::fmt;

use chrono::NaiveDate;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Fixed prefix of every tracking number.
pub const PREFIX: &str = "HK";

/// Characters the random suffix is drawn from.
const SUFFIX_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

const DATE_LEN: usize = 6;
const SUFFIX_LEN: usize = 6;

/// Errors that can occur when parsing a [`TrackingNumber`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TrackingNumberError {
    #[error("tracking number must be {expected} characters")]
    InvalidLength { expected: usize },
    #[error("tracking number must start with {PREFIX}")]
    MissingPrefix,
    #[error("tracking number date part must be six digits")]
    InvalidDate,
    #[error("tracking number suffix must be uppercase letters or digits")]
    InvalidSuffix,
}

/// A validated tracking number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackingNumber(String);

impl TrackingNumber {
    /// Total length of a tracking number.
    pub const LENGTH: usize = PREFIX.len() + DATE_LEN + SUFFIX_LEN;

    /// Generate a tracking number for `date` using `rng` for the suffix.
    pub fn generate<R: Rng + ?Sized>(date: NaiveDate, rng: &mut R) -> Self {
        let mut value = String::with_capacity(Self::LENGTH);
        value.push_str(PREFIX);
        value.push_str(&date.format("%y%m%d").to_string());
        for _ in 0..SUFFIX_LEN {
            let idx = rng.random_range(0..SUFFIX_ALPHABET.len());
            if let Some(&byte) = SUFFIX_ALPHABET.get(idx) {
                value.push(char::from(byte));
            }
        }
        Self(value)
    }

    /// Generate a tracking number for the current UTC date.
    #[must_use]
    pub fn generate_now() -> Self {
        Self::generate(chrono::Utc::now().date_naive(), &mut rand::rng())
    }

    /// Normalize user input for lookup: trim and uppercase.
    #[must_use]
    pub fn normalize(input: &str) -> String {
        input.trim().to_uppercase()
    }

    /// Parse and validate a tracking number. Input is normalized first.
    ///
    /// # Errors
    ///
    /// Returns an error if the normalized input does not match
    /// `HK` + six digits + six uppercase letters or digits.
    pub fn parse(input: &str) -> Result<Self, TrackingNumberError> {
        let value = Self::normalize(input);

        if value.len() != Self::LENGTH || !value.is_ascii() {
            return Err(TrackingNumberError::InvalidLength {
                expected: Self::LENGTH,
            });
        }

        let rest = value
            .strip_prefix(PREFIX)
            .ok_or(TrackingNumberError::MissingPrefix)?;
        let (date, suffix) = rest.split_at(DATE_LEN);

        if !date.bytes().all(|b| b.is_ascii_digit()) {
            return Err(TrackingNumberError::InvalidDate);
        }
        if !suffix
            .bytes()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
        {
            return Err(TrackingNumberError::InvalidSuffix);
        }

        Ok(Self(value))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for TrackingNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for TrackingNumber {
    type Err = TrackingNumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for TrackingNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for TrackingNumber {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for TrackingNumber {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self(s))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for TrackingNumber {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}
