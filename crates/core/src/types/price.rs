//! Type-safe price representation.
//!
//! Prices are stored as an integer number of minor currency units (cents),
//! which keeps arithmetic exact. `rust_decimal` is used only at the display
//! boundary.

use std::iter::Sum;
use std::ops::{Add, AddAssign};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A price in minor currency units (e.g., cents for USD).
///
/// Serializes transparently as the underlying integer.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Price(i64);

impl Price {
    /// The zero price.
    pub const ZERO: Self = Self(0);

    /// Create a price from an amount of minor currency units.
    #[must_use]
    pub const fn from_minor_units(units: i64) -> Self {
        Self(units)
    }

    /// Get the amount in minor currency units.
    #[must_use]
    pub const fn as_minor_units(&self) -> i64 {
        self.0
    }

    /// Multiply by a line quantity, saturating on overflow.
    #[must_use]
    pub const fn times(&self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(quantity as i64))
    }

    /// Format for display (e.g., "$19.99").
    #[must_use]
    pub fn display(&self) -> String {
        format!("${}", Decimal::new(self.0, 2))
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Price {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

#[cfg(feature = "postgres")]
impl ::sqlx::Type<::sqlx::Postgres> for Price {
    fn type_info() -> ::sqlx::postgres::PgTypeInfo {
        <i64 as ::sqlx::Type<::sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &::sqlx::postgres::PgTypeInfo) -> bool {
        <i64 as ::sqlx::Type<::sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> ::sqlx::Decode<'r, ::sqlx::Postgres> for Price {
    fn decode(
        value: ::sqlx::postgres::PgValueRef<'r>,
    ) -> ::core::result::Result<Self, ::sqlx::error::BoxDynError> {
        let units = <i64 as ::sqlx::Decode<::sqlx::Postgres>>::decode(value)?;
        Ok(Self(units))
    }
}

#[cfg(feature = "postgres")]
impl ::sqlx::Encode<'_, ::sqlx::Postgres> for Price {
    fn encode_by_ref(
        &self,
        buf: &mut ::sqlx::postgres::PgArgumentBuffer,
    ) -> ::std::result::Result<::sqlx::encode::IsNull, ::sqlx::error::BoxDynError> {
        <i64 as ::sqlx::Encode<::sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_formats_cents() {
        assert_eq!(Price::from_minor_units(1999).display(), "$19.99");
        assert_eq!(Price::from_minor_units(50).display(), "$0.50");
        assert_eq!(Price::ZERO.display(), "$0.00");
    }

    #[test]
    fn test_times_quantity() {
        let price = Price::from_minor_units(100);
        assert_eq!(price.times(3), Price::from_minor_units(300));
        assert_eq!(price.times(0), Price::ZERO);
    }

    #[test]
    fn test_sum_of_line_totals() {
        let total: Price = [
            Price::from_minor_units(100),
            Price::from_minor_units(200),
        ]
        .into_iter()
        .sum();
        assert_eq!(total, Price::from_minor_units(300));
    }

    #[test]
    fn test_serde_transparent() {
        let price = Price::from_minor_units(250);
        assert_eq!(serde_json::to_string(&price).expect("serialize"), "250");
    }
}
