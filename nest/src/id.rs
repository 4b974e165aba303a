use uuid::Uuid;

/// Generates a new property identifier (random UUID, hyphenated).
pub fn generate_property_id() -> String {
    Uuid::new_v4().to_string()
}
