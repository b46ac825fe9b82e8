use percent_encoding::percent_decode_str;
use serde::Deserialize;

/// Raw storage-change notification payload as delivered by the
/// trigger: `{ bucket: { name }, object: { key } }`.
#[derive(Debug, Deserialize)]
pub struct StorageChangePayload {
    pub bucket: BucketRef,
    pub object: ObjectRef,
}

#[derive(Debug, Deserialize)]
pub struct BucketRef {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct ObjectRef {
    pub key: String,
}

/// Closed set of events the service reacts to. Payloads are decoded
/// into a variant once at the boundary; everything past the handler
/// only ever sees typed events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    ObjectCreated(ObjectCreated),
}

/// A new object landed in the source bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectCreated {
    pub bucket: String,
    /// Object key, fully decoded
    pub key: String,
}

impl InboundEvent {
    /// Decode an arbitrary JSON payload into a recognized event, if it
    /// matches one.
    pub fn decode(value: serde_json::Value) -> Option<Self> {
        let payload: StorageChangePayload = serde_json::from_value(value).ok()?;
        Some(InboundEvent::ObjectCreated(ObjectCreated {
            bucket: payload.bucket.name,
            key: decode_object_key(&payload.object.key),
        }))
    }
}

/// Object keys arrive `+`-for-space and percent encoded.
pub fn decode_object_key(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
}
