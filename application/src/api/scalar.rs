//! GraphQL scalar definitions.

use std::{fmt, marker::PhantomData, str::FromStr};

use derive_more::{AsRef, Display, From, Into};
use juniper::{
    GraphQLScalar, GraphQLType, InputValue, ParseScalarResult,
    ParseScalarValue, ScalarToken, ScalarValue, Value,
};

/// Helper type to use in `#[graphql(with = ..)]` attribute.
///
/// Uses [`FromStr`]/[`Display`] impls of `As` type to convert the target type
/// to/from GraphQL scalar.
///
/// Target type must implement [`TryFrom`] and [`AsRef`] for `As` type.
///
/// [`Display`]: fmt::Display
#[derive(Debug)]
pub struct Via<As>(PhantomData<As>);

impl<As> Via<As> {
    /// Convert the target type into scalar [`Value`] by using [`Display`] impl
    /// of `As` type.
    ///
    /// [`Display`]: fmt::Display
    pub fn to_output<T, S>(value: &T) -> Value<S>
    where
        As: fmt::Display,
        T: AsRef<As>,
        S: ScalarValue,
    {
        Value::from(value.as_ref().to_string())
    }

    /// Constructs the target type from scalar [`Value`] by using [`FromStr`]
    /// impl of `As` type.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the input value is not a string;
    /// - the input value cannot be parsed into `As` type;
    /// - the parsed value cannot be converted into the target type.
    #[expect(clippy::missing_panics_doc, reason = "infallible")]
    pub fn from_input<T, S>(input: &InputValue<S>) -> Result<T, String>
    where
        As: FromStr + fmt::Display,
        As::Err: fmt::Display,
        T: TryFrom<As> + GraphQLType<S, TypeInfo = ()>,
        T::Error: fmt::Display,
        S: ScalarValue,
    {
        let s = input.as_string_value().ok_or_else(|| {
            format!(
                "Cannot parse input scalar `{}`: expected string input \
                 value, found: {input}",
                T::name(&()).expect("always has a name"),
            )
        })?;
        s.parse::<As>()
            .map_err(|e| {
                format!(
                    "Cannot parse input scalar `{}` from \"{s}\" string: {e}",
                    T::name(&()).expect("always has a name"),
                )
            })?
            .try_into()
            .map_err(|e| {
                format!(
                    "Cannot parse input scalar `{}`: {e}",
                    T::name(&()).expect("always has a name"),
                )
            })
    }

    /// Parse the provided [`ScalarToken`].
    ///
    /// # Errors
    ///
    /// Returns an error if the token cannot be parsed as [`String`].
    pub fn parse_token<S: ScalarValue>(
        value: ScalarToken<'_>,
    ) -> ParseScalarResult<S> {
        <String as ParseScalarValue<S>>::from_str(value)
    }
}

/// Arbitrary precision decimal number.
///
/// Accepted either as a string or as a number, and always returned as a
/// string to preserve its precision.
#[derive(AsRef, Clone, Copy, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(with = Self, parse_token(String, i32, f64))]
pub struct Decimal(rust_decimal::Decimal);

impl Decimal {
    /// Converts this [`Decimal`] into scalar [`Value`].
    fn to_output<S: ScalarValue>(&self) -> Value<S> {
        Value::scalar(self.0.to_string())
    }

    /// Constructs a [`Decimal`] from scalar [`Value`].
    fn from_input<S: ScalarValue>(
        input: &InputValue<S>,
    ) -> Result<Self, String> {
        if let Some(s) = input.as_string_value() {
            return s.trim().parse().map(Self).map_err(|e| {
                format!(
                    "Cannot parse input scalar `Decimal` from \"{s}\" \
                     string: {e}",
                )
            });
        }
        if let Some(i) = input.as_int_value() {
            return Ok(Self(i.into()));
        }
        input
            .as_float_value()
            .ok_or_else(|| {
                format!(
                    "Cannot parse input scalar `Decimal`: expected string or \
                     number input value, found: {input}",
                )
            })
            .and_then(|f| {
                rust_decimal::Decimal::try_from(f).map(Self).map_err(|e| {
                    format!("Cannot parse input scalar `Decimal`: {e}")
                })
            })
    }
}

#[cfg(test)]
mod spec {
    use juniper::{DefaultScalarValue, InputValue};

    use super::Decimal;

    fn parse(input: InputValue) -> Result<Decimal, String> {
        Decimal::from_input::<DefaultScalarValue>(&input)
    }

    #[test]
    fn accepts_strings_and_numbers() {
        for (input, expected) in [
            (InputValue::scalar("7.5"), "7.5"),
            (InputValue::scalar(" 10 "), "10"),
            (InputValue::scalar(3), "3"),
            (InputValue::scalar(2.25), "2.25"),
        ] {
            let decimal = parse(input).expect("valid `Decimal`");
            assert_eq!(decimal.to_string(), expected);
        }
    }

    #[test]
    fn rejects_non_numeric_input() {
        assert!(parse(InputValue::scalar("five")).is_err());
        assert!(parse(InputValue::scalar(true)).is_err());
        assert!(parse(InputValue::Null).is_err());
    }
}
