//! Entries of the packed `index.json` and `sync.json` documents.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::BundleId;

/// One app as shipped to clients: the manifest spread out, followed by the
/// derived `id` and `createAt` (epoch milliseconds of the first commit).
#[derive(Debug, Clone, PartialEq)]
pub struct PackedApp {
    id: BundleId,
    create_at: i64,
    fields: Map<String, Value>,
}

impl PackedApp {
    /// Build an entry from a manifest object.
    ///
    /// Keys keep their source order. A manifest that already carries `id` or
    /// `createAt` has that value replaced in place.
    pub fn new(id: BundleId, create_at: i64, manifest: Map<String, Value>) -> Self {
        let mut fields = manifest;
        fields.insert("id".to_string(), Value::String(id.to_string()));
        fields.insert("createAt".to_string(), Value::from(create_at));
        Self {
            id,
            create_at,
            fields,
        }
    }

    /// Bundle id of the app.
    pub fn id(&self) -> &BundleId {
        &self.id
    }

    /// Epoch milliseconds of the commit that added the app.
    pub fn create_at(&self) -> i64 {
        self.create_at
    }

    /// Every output field, in output order.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }
}

impl Serialize for PackedApp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.fields.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for PackedApp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        use serde::de::Error;

        let fields = Map::<String, Value>::deserialize(deserializer)?;
        let id = fields
            .get("id")
            .and_then(Value::as_str)
            .ok_or_else(|| D::Error::missing_field("id"))?;
        let id = BundleId::new(id).map_err(D::Error::custom)?;
        let create_at = fields
            .get("createAt")
            .and_then(Value::as_i64)
            .ok_or_else(|| D::Error::missing_field("createAt"))?;
        Ok(Self {
            id,
            create_at,
            fields,
        })
    }
}
