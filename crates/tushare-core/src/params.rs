//! Request parameters and the wire request envelope.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

use crate::{
    error::{Result, TransportStage, TushareError},
    value::Scalar,
};

/// Date format used by every Tushare date parameter.
pub const DATE_FORMAT: &str = "%Y%m%d";

/// Filter parameters of a query.
///
/// Only non-empty values are kept: setting an empty string or a null leaves
/// the key unset, which is how the API distinguishes "no filter".
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Params(BTreeMap<String, Scalar>);

impl Params {
    /// Creates an empty parameter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a parameter, skipping empty values.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Scalar>) -> Self {
        self.set(key, value);
        self
    }

    /// Adds a date parameter formatted as `YYYYMMDD`.
    #[must_use]
    pub fn with_date(self, key: impl Into<String>, date: NaiveDate) -> Self {
        self.with(key, date.format(DATE_FORMAT).to_string())
    }

    /// Sets a parameter in place. Empty values remove the key.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Scalar>) -> &mut Self {
        let key = key.into();
        let value = value.into();
        if is_unset(&value) {
            self.0.remove(&key);
        } else {
            self.0.insert(key, value);
        }
        self
    }

    /// Returns the value for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Scalar> {
        self.0.get(key)
    }

    /// Returns true if `key` is set.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Returns the number of set parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no parameter is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the parameter names in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.0.keys().map(String::as_str)
    }

    /// Returns an iterator over the parameters.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Scalar)> + '_ {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<Scalar>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (k, v) in iter {
            params.set(k, v);
        }
        params
    }
}

fn is_unset(value: &Scalar) -> bool {
    match value {
        Scalar::Null => true,
        Scalar::Text(s) => s.is_empty(),
        _ => false,
    }
}

/// The JSON body posted to the API.
#[derive(Clone, PartialEq, Serialize)]
pub struct RequestEnvelope {
    api_name: String,
    token: String,
    params: Params,
    fields: Vec<String>,
}

impl fmt::Debug for RequestEnvelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestEnvelope")
            .field("api_name", &self.api_name)
            .field("token", &"[REDACTED]")
            .field("params", &self.params)
            .field("fields", &self.fields)
            .finish()
    }
}

impl RequestEnvelope {
    /// Creates an envelope. An empty `fields` list requests every field.
    #[must_use]
    pub fn new(
        api_name: impl Into<String>,
        token: impl Into<String>,
        params: Params,
        fields: Vec<String>,
    ) -> Self {
        Self {
            api_name: api_name.into(),
            token: token.into(),
            params,
            fields,
        }
    }

    /// Returns the endpoint name.
    #[must_use]
    pub fn api_name(&self) -> &str {
        &self.api_name
    }

    /// Returns the filter parameters.
    #[must_use]
    pub const fn params(&self) -> &Params {
        &self.params
    }

    /// Returns the requested fields.
    #[must_use]
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Serializes the envelope to its wire form.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self)
            .map_err(|e| TushareError::transport(TransportStage::EncodeRequest, e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    #[test]
    fn test_empty_values_are_omitted() {
        let params = Params::new()
            .with("ts_code", "000001.SZ")
            .with("trade_date", "")
            .with("start_date", "20240101")
            .with("exchange", Option::<String>::None)
            .with("limit", 100);

        assert_eq!(params.len(), 3);
        assert!(params.contains("ts_code"));
        assert!(!params.contains("trade_date"));
        assert!(!params.contains("exchange"));
        assert_eq!(params.get("limit"), Some(&Scalar::Int(100)));
    }

    #[test]
    fn test_setting_empty_clears_key() {
        let mut params = Params::new().with("is_open", "1");
        params.set("is_open", "");
        assert!(params.is_empty());
    }

    #[test]
    fn test_with_date_formats_compactly() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        let params = Params::new().with_date("end_date", date);
        assert_eq!(params.get("end_date"), Some(&Scalar::from("20240305")));
    }

    #[test]
    fn test_envelope_wire_form() {
        let params: Params = [("ts_code", "000001.SZ"), ("end_date", "")]
            .into_iter()
            .collect();
        let envelope = RequestEnvelope::new(
            "daily",
            "secret",
            params,
            vec!["ts_code".to_string(), "close".to_string()],
        );

        let wire: Value = serde_json::from_slice(&envelope.to_json().unwrap()).unwrap();
        assert_eq!(
            wire,
            json!({
                "api_name": "daily",
                "token": "secret",
                "params": {"ts_code": "000001.SZ"},
                "fields": ["ts_code", "close"]
            })
        );
    }

    #[test]
    fn test_envelope_debug_redacts_token() {
        let envelope = RequestEnvelope::new("daily", "secret_token_123", Params::new(), vec![]);
        let debug = format!("{envelope:?}");
        assert!(!debug.contains("secret_token_123"));
        assert!(debug.contains("[REDACTED]"));
    }
}
