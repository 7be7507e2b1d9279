use serde::{de::Error as _, Deserialize, Deserializer};

/// A string field counts as supplied only when it is non-empty.
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Identifiers of zero are treated the same as a missing one.
pub(crate) fn non_zero(value: Option<i64>) -> Option<i64> {
    value.filter(|v| *v != 0)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IdInput {
    Number(i64),
    Text(String),
}

/// Deserializes an optional id sent either as a JSON integer or as a
/// base-10 string. An empty string counts as absent.
pub(crate) fn lenient_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<IdInput>::deserialize(deserializer)? {
        None => Ok(None),
        Some(IdInput::Number(id)) => Ok(Some(id)),
        Some(IdInput::Text(raw)) if raw.is_empty() => Ok(None),
        Some(IdInput::Text(raw)) => raw
            .parse::<i64>()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("invalid id {raw:?}"))),
    }
}
