//! PropertyMap: the key-value store on vertices, edges and untyped objects.

use std::collections::HashMap;
use super::Entity;

/// A map of property names to decoded values.
pub type PropertyMap = HashMap<String, Entity>;

impl From<PropertyMap> for Entity {
    fn from(map: PropertyMap) -> Self {
        Entity::Map(map)
    }
}

/// Collect `(key, value)` pairs into a map entity.
impl<K, V> FromIterator<(K, V)> for Entity
where
    K: Into<String>,
    V: Into<Entity>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(pairs: I) -> Self {
        Entity::Map(pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}
