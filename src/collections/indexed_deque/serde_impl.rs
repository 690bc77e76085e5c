//! serde support: a deque travels as its capacity plus its items, head to tail.
//! Physical keys are not part of the representation.

use serde::de::{self, Deserialize, Deserializer};
use serde::ser::{Serialize, SerializeStruct, Serializer};

use super::{Capacity, DequeError, IndexedDeque};

struct Items<'a, T>(&'a IndexedDeque<T>);

impl<T: Serialize> Serialize for Items<'_, T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.0.iter())
    }
}

impl<T: Serialize> Serialize for IndexedDeque<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("IndexedDeque", 2)?;
        state.serialize_field("capacity", &self.capacity)?;
        state.serialize_field("items", &Items(self))?;
        state.end()
    }
}

#[derive(serde::Deserialize)]
#[serde(rename = "IndexedDeque")]
struct Repr<T> {
    capacity: Capacity,
    items: Vec<T>,
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for IndexedDeque<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let repr = Repr::<T>::deserialize(deserializer)?;
        if let Some(limit) = repr.capacity.limit() {
            if repr.items.len() > limit {
                return Err(de::Error::custom(DequeError::Full { capacity: limit }));
            }
        }
        let mut deque = IndexedDeque::new(repr.capacity);
        for item in repr.items {
            deque.write_tail(item);
        }
        Ok(deque)
    }
}
