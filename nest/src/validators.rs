use url::Url;
use uuid::Uuid;

/// Returns `true` if the provided string parses as a URL with a scheme.
pub fn is_valid_url(value: &str) -> bool {
    Url::parse(value).is_ok()
}

/// Returns `true` if the provided string parses as a UUID.
pub fn is_valid_uuid(value: &str) -> bool {
    Uuid::parse_str(value).is_ok()
}

/// Image references are absolute URLs (third-party host) or server-relative upload paths.
pub fn is_valid_image_ref(value: &str) -> bool {
    (value.starts_with('/') && !value.starts_with("//")) || is_valid_url(value)
}
