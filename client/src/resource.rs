use core::fmt;

use url::Url;

const SEP: char = '/';

/// Endpoint address builder rooted at the storage service base URI.
#[derive(Clone, Debug)]
pub struct Resource {
    url: Url,
}

impl Resource {
    /// Parses base URI. Returns `None` for malformed URIs and for URIs
    /// that cannot carry a path (`mailto:` and the like).
    #[must_use]
    pub fn new(uri: &str) -> Option<Resource> {
        let url = Url::parse(uri).ok()?;
        if url.cannot_be_a_base() {
            return None;
        }
        Some(Resource { url })
    }

    /// Appends slash separated path. Empty segments are collapsed, a trailing
    /// slash in `path` is preserved.
    pub fn append_path(&mut self, path: &str) -> &mut Self {
        let trailing = path.ends_with(SEP);
        if let Ok(mut segments) = self.url.path_segments_mut() {
            segments.pop_if_empty();
            for segment in path.split(SEP).filter(|s| !s.is_empty()) {
                segments.push(segment);
            }
            if trailing {
                segments.push("");
            }
        }
        self
    }

    /// Appends one opaque segment, percent-encoding anything that would
    /// otherwise change the path structure (slashes included).
    ///
    /// Returns `None` and leaves the path untouched for empty, `.` and `..`
    /// segments: URL normalization would fold them into the parent path.
    pub fn append_segment(&mut self, segment: &str) -> Option<&mut Self> {
        if matches!(segment, "" | "." | "..") {
            return None;
        }
        if let Ok(mut segments) = self.url.path_segments_mut() {
            segments.pop_if_empty().push(segment);
        }
        Some(self)
    }

    pub fn set_query(&mut self, key: &str, value: Option<&str>) -> &mut Self {
        match value {
            Some(v) => {
                self.url.query_pairs_mut().clear().append_pair(key, v);
            }
            None => self.url.set_query(None),
        }
        self
    }

    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.url)
    }
}
