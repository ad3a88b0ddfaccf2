//! Deserializers for the loosely-typed JSON the remote API emits.
//!
//! The PHP backend is inconsistent about scalars: ids arrive as numbers or
//! strings, numeric columns sometimes arrive as `"8.50"`, and absent values
//! show up as `null` or `""`. Everything here funnels those shapes into the
//! typed model.

use chrono::{NaiveDate, NaiveTime};
use serde::de::Error;
use serde::{Deserialize, Deserializer};

use crate::model::id::RecordId;
use crate::utils::dates::parse_date;

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
}

impl Scalar {
    fn into_text(self) -> String {
        match self {
            Scalar::Int(i) => i.to_string(),
            Scalar::Float(f) => f.to_string(),
            Scalar::Bool(b) => b.to_string(),
            Scalar::Text(s) => s.trim().to_string(),
        }
    }

    fn into_f64<E: Error>(self) -> Result<f64, E> {
        match self {
            Scalar::Int(i) => Ok(i as f64),
            Scalar::Float(f) => Ok(f),
            Scalar::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| E::custom(format!("expected a number, got {s:?}"))),
            Scalar::Bool(_) => Err(E::custom("expected a number, got a boolean")),
        }
    }
}

pub fn id<'de, D: Deserializer<'de>>(d: D) -> Result<RecordId, D::Error> {
    let text = Scalar::deserialize(d)?.into_text();
    if text.is_empty() {
        return Err(D::Error::custom("empty record id"));
    }
    Ok(RecordId::from(text))
}

/// `null`, `""` and `0` all mean "no reference"
pub fn opt_id<'de, D: Deserializer<'de>>(d: D) -> Result<Option<RecordId>, D::Error> {
    Ok(Option::<Scalar>::deserialize(d)?
        .map(Scalar::into_text)
        .filter(|s| !s.is_empty() && s != "0")
        .map(RecordId::from))
}

pub fn number<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    Scalar::deserialize(d)?.into_f64()
}

pub fn opt_number<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    match Option::<Scalar>::deserialize(d)? {
        None => Ok(None),
        Some(Scalar::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(v) => v.into_f64().map(Some),
    }
}

pub fn count<'de, D: Deserializer<'de>>(d: D) -> Result<i64, D::Error> {
    let n = number(d)?;
    if n.fract() != 0.0 {
        return Err(D::Error::custom(format!("expected a whole number, got {n}")));
    }
    Ok(n as i64)
}

pub fn opt_text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<Scalar>::deserialize(d)?
        .map(Scalar::into_text)
        .filter(|s| !s.is_empty()))
}

pub fn date<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDate, D::Error> {
    let text = String::deserialize(d)?;
    parse_date(&text).ok_or_else(|| D::Error::custom(format!("invalid date {text:?}")))
}

pub fn opt_date<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDate>, D::Error> {
    match opt_text(d)? {
        None => Ok(None),
        Some(text) => parse_date(&text)
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("invalid date {text:?}"))),
    }
}

pub fn opt_time<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveTime>, D::Error> {
    match opt_text(d)? {
        None => Ok(None),
        Some(text) => NaiveTime::parse_from_str(&text, "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(&text, "%H:%M"))
            .map(Some)
            .map_err(|_| D::Error::custom(format!("invalid time {text:?}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Row {
        #[serde(deserialize_with = "id")]
        id: RecordId,
        #[serde(default, deserialize_with = "opt_id")]
        manager_id: Option<RecordId>,
        #[serde(default, deserialize_with = "opt_number")]
        hours: Option<f64>,
        #[serde(default, deserialize_with = "opt_time")]
        clock_in: Option<NaiveTime>,
        #[serde(deserialize_with = "date")]
        day: NaiveDate,
    }

    #[test]
    fn numeric_and_string_ids_are_equivalent() {
        let a: Row = serde_json::from_str(r#"{"id": 7, "day": "2024-01-10"}"#).unwrap();
        let b: Row = serde_json::from_str(r#"{"id": "7", "day": "2024-01-10"}"#).unwrap();
        assert_eq!(a.id, b.id);
        assert_eq!(a.id.as_str(), "7");
    }

    #[test]
    fn blank_values_become_none() {
        let row: Row = serde_json::from_str(
            r#"{"id": 1, "manager_id": "", "hours": "", "clock_in": null, "day": "2024-01-10"}"#,
        )
        .unwrap();
        assert!(row.manager_id.is_none());
        assert!(row.hours.is_none());
        assert!(row.clock_in.is_none());
    }

    #[test]
    fn numeric_strings_and_datetime_suffixes_parse() {
        let row: Row = serde_json::from_str(
            r#"{"id": 1, "hours": "8.50", "clock_in": "09:15", "day": "2024-01-10 00:00:00"}"#,
        )
        .unwrap();
        assert_eq!(row.hours, Some(8.5));
        assert_eq!(row.clock_in, NaiveTime::from_hms_opt(9, 15, 0));
        assert_eq!(row.day, NaiveDate::from_ymd_opt(2024, 1, 10).unwrap());
    }

    #[test]
    fn garbage_dates_are_rejected() {
        let res: Result<Row, _> = serde_json::from_str(r#"{"id": 1, "day": "10/01/2024"}"#);
        assert!(res.is_err());
    }
}
