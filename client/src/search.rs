//! Client side narrowing of the fetched file list.
//!
//! The category partition is applied by the storage service when the list is
//! fetched; search text only ever narrows what that fetch returned.

use kernel::MediaFile;

/// Case-insensitive substring match against the user facing name or the
/// category name.
#[must_use]
pub fn matches(file: &MediaFile, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let needle = query.to_lowercase();
    file.original_name.to_lowercase().contains(&needle)
        || file.category_name.to_lowercase().contains(&needle)
}

#[must_use]
pub fn filtered<'a>(files: &'a [MediaFile], query: &str) -> Vec<&'a MediaFile> {
    files.iter().filter(|f| matches(f, query)).collect()
}
