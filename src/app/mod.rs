pub mod auth;
pub mod books;
pub mod categories;
pub mod images;

/// Marks a field that was present in the payload, even as `null`. Partial
/// updates use this to tell "clear this field" apart from "leave it alone".
pub(crate) fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: serde::Deserialize<'de>,
{
    use serde::Deserialize;
    Option::<T>::deserialize(deserializer).map(Some)
}
