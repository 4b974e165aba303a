//! Redis key layout: `{prefix}:nest:properties:{id}` for documents and
//! `{prefix}:nest:properties:idx` for the search index.

const SERVICE: &str = "nest";
const COLLECTION: &str = "properties";

/// Key names for one deployment prefix. Several deployments can share a Redis by prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyLayout {
    prefix: String,
}

impl KeyLayout {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into() }
    }

    /// Common prefix of every listing document, as given to `FT.CREATE ... PREFIX`.
    pub fn property_prefix(&self) -> String {
        format!("{}:{SERVICE}:{COLLECTION}:", self.prefix)
    }

    pub fn property_key(&self, id: &str) -> String {
        format!("{}{id}", self.property_prefix())
    }

    pub fn property_index(&self) -> String {
        format!("{}:{SERVICE}:{COLLECTION}:idx", self.prefix)
    }
}
