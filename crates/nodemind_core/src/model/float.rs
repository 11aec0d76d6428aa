//! Lossless serde adapter for `f64` snapshot fields.
//!
//! JSON has no NaN or infinity, and `serde_json` writes them as `null`,
//! which then fails to decode. Finite values stay plain numbers; the three
//! non-finite values are written as the strings `"NaN"`, `"Infinity"` and
//! `"-Infinity"`.
//!
//! Use with `#[serde(with = "crate::model::float")]`.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serializer};

const NAN: &str = "NaN";
const POS_INFINITY: &str = "Infinity";
const NEG_INFINITY: &str = "-Infinity";

pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.is_finite() {
        serializer.serialize_f64(*value)
    } else if value.is_nan() {
        serializer.serialize_str(NAN)
    } else if value.is_sign_positive() {
        serializer.serialize_str(POS_INFINITY)
    } else {
        serializer.serialize_str(NEG_INFINITY)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Repr {
    Number(f64),
    Text(String),
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    match Repr::deserialize(deserializer)? {
        Repr::Number(value) => Ok(value),
        Repr::Text(text) => match text.as_str() {
            NAN => Ok(f64::NAN),
            POS_INFINITY => Ok(f64::INFINITY),
            NEG_INFINITY => Ok(f64::NEG_INFINITY),
            other => Err(D::Error::custom(format!(
                "expected a number, `{NAN}`, `{POS_INFINITY}` or `{NEG_INFINITY}`, got `{other}`"
            ))),
        },
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize, Deserialize)]
    struct Wrapper {
        #[serde(with = "super")]
        value: f64,
    }

    fn round_trip(value: f64) -> f64 {
        let json = serde_json::to_string(&Wrapper { value }).unwrap();
        serde_json::from_str::<Wrapper>(&json).unwrap().value
    }

    #[test]
    fn finite_values_stay_plain_numbers() {
        let json = serde_json::to_string(&Wrapper { value: 12.5 }).unwrap();
        assert_eq!(json, r#"{"value":12.5}"#);
        assert_eq!(round_trip(-0.25), -0.25);
    }

    #[test]
    fn non_finite_values_survive_round_trip() {
        assert!(round_trip(f64::NAN).is_nan());
        assert_eq!(round_trip(f64::INFINITY), f64::INFINITY);
        assert_eq!(round_trip(f64::NEG_INFINITY), f64::NEG_INFINITY);
        let json = serde_json::to_string(&Wrapper { value: f64::NAN }).unwrap();
        assert_eq!(json, r#"{"value":"NaN"}"#);
    }

    #[test]
    fn unknown_text_is_rejected() {
        assert!(serde_json::from_str::<Wrapper>(r#"{"value":"big"}"#).is_err());
        assert!(serde_json::from_str::<Wrapper>(r#"{"value":null}"#).is_err());
    }
}
