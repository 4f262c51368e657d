//! Response envelope as sent by the API.

use serde::Deserialize;
use tushare_core::{Result, Scalar, Table, TushareError};

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
struct ResponseEnvelope {
    code: i64,
    #[serde(default)]
    data: Option<ResponseData>,
    #[serde(default)]
    msg: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ResponseData {
    #[serde(default)]
    fields: Vec<String>,
    #[serde(default)]
    items: Vec<Vec<serde_json::Value>>,
}

/// Decodes a response body into a [`Table`].
///
/// A body that is not a response envelope fails with `Decode`; a non-zero
/// `code` fails with `Api` carrying the remote message verbatim.
pub(crate) fn decode(body: &[u8]) -> Result<Table> {
    let envelope: ResponseEnvelope =
        serde_json::from_slice(body).map_err(|e| TushareError::Decode(e.to_string()))?;

    if envelope.code != 0 {
        return Err(TushareError::Api {
            code: envelope.code,
            message: envelope.msg.unwrap_or_default(),
        });
    }

    let data = envelope.data.unwrap_or_default();
    let items = data
        .items
        .into_iter()
        .map(|item| item.into_iter().map(Scalar::from).collect())
        .collect();

    Ok(Table::from_items(data.fields, items))
}
