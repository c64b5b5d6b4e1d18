use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Field adapter storing an identifier as its raw integer.
///
/// ```
/// use serde::{Deserialize, Serialize};
/// use timeid::{CompactId, as_native};
///
/// #[derive(Serialize, Deserialize)]
/// struct Event {
///     #[serde(with = "as_native")]
///     id: CompactId,
/// }
/// ```
pub mod as_native {
    use super::*;
    use crate::Id;

    pub fn serialize<ID, S>(id: &ID, s: S) -> Result<S::Ok, S::Error>
    where
        ID: Id,
        ID::Ty: Serialize,
        S: Serializer,
    {
        id.to_raw().serialize(s)
    }

    pub fn deserialize<'de, ID, D>(d: D) -> Result<ID, D::Error>
    where
        ID: Id,
        ID::Ty: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        // Every raw value is a valid identifier, so there is nothing to reject.
        <ID::Ty>::deserialize(d).map(ID::from_raw)
    }
}
