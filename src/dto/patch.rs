use serde::{Deserialize, Deserializer};

/// A clearable field of a partial update: `None` when omitted, `Some(None)` for an
/// explicit `null`, `Some(Some(v))` for a new value.
pub type Nullable<T> = Option<Option<T>>;

// Pair with `#[serde(default)]` so an omitted field stays `None`.
pub fn nullable<'de, D, T>(deserializer: D) -> Result<Nullable<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
