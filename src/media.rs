//! Public URLs of stored media

use percent_encoding::AsciiSet;
use percent_encoding::CONTROLS;
use percent_encoding::utf8_percent_encode;
use url::Url;

/// Characters to encode in a single path segment
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b':')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Turns stored media paths into public URLs
#[derive(Clone, Debug, Default)]
pub struct MediaUrls {
    /// Base URL of the media bucket, always ending with a slash
    base: Option<Url>,
}

impl MediaUrls {
    /// Media URLs relative to the given base, paths are returned as-is without one
    pub fn new(base: Option<Url>) -> Self {
        let base = base.map(|mut base| {
            if !base.path().ends_with('/') {
                let path = format!("{}/", base.path());
                base.set_path(&path);
            }

            base
        });

        Self { base }
    }

    /// Public URL of a stored path
    ///
    /// Empty paths resolve to nothing, full URLs are kept.
    pub fn resolve(&self, path: Option<&str>) -> Option<String> {
        let path = path?.trim();

        if path.is_empty() {
            return None;
        }

        if path.starts_with("http") {
            return Some(path.to_string());
        }

        let Some(base) = &self.base else {
            return Some(path.to_string());
        };

        // dot segments would climb out of the base
        let encoded = path
            .split('/')
            .filter(|segment| !matches!(*segment, "" | "." | ".."))
            .map(|segment| utf8_percent_encode(segment, SEGMENT).to_string())
            .collect::<Vec<_>>()
            .join("/");

        if encoded.is_empty() {
            return None;
        }

        match base.join(&encoded) {
            Ok(url) => Some(url.to_string()),
            Err(err) => {
                tracing::warn!("Could not resolve media path {path}: {err}");

                None
            }
        }
    }

    /// Resolve the first path that resolves to something
    pub fn resolve_first(&self, paths: &[Option<&str>]) -> Option<String> {
        paths.iter().find_map(|path| self.resolve(*path))
    }
}
