//! Hex quantity codec shared by the sidecar wire types.
//!
//! Integers ("quantities") are encoded as `0x`-prefixed lowercase hex with no leading zeros, and
//! zero is always `0x0`.

use alloy_primitives::U256;
use serde::{
    Deserialize,
    Deserializer,
    Serializer,
    de,
};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuantityError {
    #[error("quantity {0:?} is missing the 0x prefix")]
    MissingPrefix(String),
    #[error("quantity has no digits")]
    Empty,
    #[error("quantity {0:?} contains a non-hex digit")]
    InvalidDigit(String),
    #[error("quantity {value:?} does not fit in {bits} bits")]
    Overflow { value: String, bits: u32 },
}

/// An unsigned integer with a canonical hex quantity encoding.
pub trait Quantity: Sized {
    /// Encode as `0x`-prefixed lowercase hex without leading zeros.
    fn to_quantity(&self) -> String;

    /// Decode a `0x`-prefixed hex quantity. Leading zeros are tolerated.
    fn from_quantity(value: &str) -> Result<Self, QuantityError>;
}

/// Strips the `0x` prefix and checks that what remains is a non-empty run of hex digits.
fn quantity_digits(value: &str) -> Result<&str, QuantityError> {
    let digits = value
        .strip_prefix("0x")
        .ok_or_else(|| QuantityError::MissingPrefix(value.to_string()))?;
    if digits.is_empty() {
        return Err(QuantityError::Empty);
    }
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(QuantityError::InvalidDigit(value.to_string()));
    }
    Ok(digits)
}

macro_rules! impl_primitive_quantity {
    ($($ty:ty),*) => {
        $(
            impl Quantity for $ty {
                fn to_quantity(&self) -> String {
                    format!("{self:#x}")
                }

                fn from_quantity(value: &str) -> Result<Self, QuantityError> {
                    let digits = quantity_digits(value)?;
                    <$ty>::from_str_radix(digits, 16).map_err(|_| QuantityError::Overflow {
                        value: value.to_string(),
                        bits: <$ty>::BITS,
                    })
                }
            }
        )*
    };
}

impl_primitive_quantity!(u8, u64, u128);

impl Quantity for U256 {
    fn to_quantity(&self) -> String {
        let encoded = hex::encode(self.to_be_bytes::<32>());
        let trimmed = encoded.trim_start_matches('0');
        if trimmed.is_empty() {
            "0x0".to_string()
        } else {
            format!("0x{trimmed}")
        }
    }

    fn from_quantity(value: &str) -> Result<Self, QuantityError> {
        let digits = quantity_digits(value)?;
        U256::from_str_radix(digits, 16).map_err(|_| QuantityError::Overflow {
            value: value.to_string(),
            bits: 256,
        })
    }
}

/// `#[serde(with = "credible_utils::hex::quantity")]` for any [`Quantity`] field.
pub mod quantity {
    use super::*;

    pub fn serialize<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Quantity,
        S: Serializer,
    {
        serializer.serialize_str(&value.to_quantity())
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<T, D::Error>
    where
        T: Quantity,
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        T::from_quantity(&value).map_err(de::Error::custom)
    }

    /// Same encoding for `Option<T>`. Pair with `skip_serializing_if = "Option::is_none"` so
    /// absent values are omitted rather than written as `null`.
    pub mod option {
        use super::*;

        pub fn serialize<T, S>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
        where
            T: Quantity,
            S: Serializer,
        {
            match value {
                Some(value) => serializer.serialize_str(&value.to_quantity()),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
        where
            T: Quantity,
            D: Deserializer<'de>,
        {
            Option::<String>::deserialize(deserializer)?
                .map(|value| T::from_quantity(&value).map_err(de::Error::custom))
                .transpose()
        }
    }

    /// Accepts either a JSON number or a hex quantity string. Peers are not consistent about
    /// counters such as `gas_used`.
    pub mod lenient_u64 {
        use super::*;

        #[derive(Deserialize)]
        #[serde(untagged)]
        enum NumberOrQuantity {
            Number(u64),
            Quantity(String),
        }

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
        where
            D: Deserializer<'de>,
        {
            match Option::<NumberOrQuantity>::deserialize(deserializer)? {
                None => Ok(None),
                Some(NumberOrQuantity::Number(value)) => Ok(Some(value)),
                Some(NumberOrQuantity::Quantity(value)) => {
                    u64::from_quantity(&value)
                        .map(Some)
                        .map_err(de::Error::custom)
                }
            }
        }
    }
}
