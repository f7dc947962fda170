use serde::de::DeserializeOwned;
use serde_path_to_error::Segment;
use tplan_core::FieldPath;

/// A response body that could not be decoded into the requested type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("decode failed at `{path}`: {reason}")]
pub struct DecodeFailure {
    pub path: FieldPath,
    pub reason: String,
}

/// Decode `bytes` as JSON into `T`, reporting the field the decoder was in when it failed.
///
/// Nesting depth is not capped here; rule trees are as deep as the payload makes them.
/// The stack grows on demand while descending, so deep input cannot overflow it.
pub fn decode_json<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, DecodeFailure> {
    let mut deserializer = serde_json::Deserializer::from_slice(bytes);
    deserializer.disable_recursion_limit();
    let stacked = serde_stacker::Deserializer::new(&mut deserializer);
    let value = serde_path_to_error::deserialize(stacked).map_err(|error| {
        let path = to_field_path(error.path());
        DecodeFailure {
            path,
            reason: error.into_inner().to_string(),
        }
    })?;
    deserializer.end().map_err(|error| DecodeFailure {
        path: FieldPath::root(),
        reason: error.to_string(),
    })?;
    Ok(value)
}

fn to_field_path(path: &serde_path_to_error::Path) -> FieldPath {
    let mut field_path = FieldPath::root();
    for segment in path.iter() {
        match segment {
            Segment::Seq { index } => field_path.push_index(*index),
            Segment::Map { key } => field_path.push_key(key.as_str()),
            Segment::Enum { variant } => field_path.push_key(variant.as_str()),
            _ => {}
        }
    }
    field_path
}

#[cfg(test)]
#[path = "decode_test.rs"]
mod tests;
