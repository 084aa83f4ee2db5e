use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// One field of a partial update.
///
/// `Absent` leaves the stored value alone, `Null` clears it, `Value` replaces it.
/// Pair with `#[serde(default)]` so a missing key deserializes as `Absent`, and
/// `skip_serializing_if = "Patch::is_absent"` so it serializes back the same way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Patch<T> {
    Absent,
    Null,
    Value(T),
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Patch::Absent
    }
}

impl<T> Patch<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Patch::Absent)
    }

    /// `None` when absent, otherwise the new value for the column.
    pub fn into_change(self) -> Option<Option<T>> {
        match self {
            Patch::Absent => None,
            Patch::Null => Some(None),
            Patch::Value(v) => Some(Some(v)),
        }
    }
}

impl Patch<String> {
    /// Trims a present value; a blank string becomes `Null`.
    pub fn trimmed(self) -> Self {
        match self {
            Patch::Value(v) => {
                let t = v.trim();
                if t.is_empty() {
                    Patch::Null
                } else {
                    Patch::Value(t.to_string())
                }
            }
            other => other,
        }
    }
}

impl<T> From<Option<T>> for Patch<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Patch::Null, Patch::Value)
    }
}

impl<'de, T> Deserialize<'de> for Patch<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Patch::from)
    }
}

impl<T> Serialize for Patch<T>
where
    T: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Patch::Value(v) => serializer.serialize_some(v),
            Patch::Absent | Patch::Null => serializer.serialize_none(),
        }
    }
}
