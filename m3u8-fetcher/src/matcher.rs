/// Playlist extension every captured url must contain.
pub const MANIFEST_MARKER: &str = ".m3u8";

/// Opaque fragment identifying the wanted rendition on the target site.
pub const TOKEN: &str = "MTA4MA";

/// Substring rule deciding which request url is the wanted manifest.
#[derive(Clone, Debug)]
pub struct Matcher {
    marker: String,
    token: String,
}

impl Default for Matcher {
    fn default() -> Self {
        Self::new(MANIFEST_MARKER, TOKEN)
    }
}

impl Matcher {
    pub fn new<T: Into<String>>(marker: T, token: T) -> Self {
        Self {
            marker: marker.into(),
            token: token.into(),
        }
    }

    /// Query strings are part of the match, the token usually lives there.
    pub fn matches(&self, url: &str) -> bool {
        url.contains(&self.marker) && url.contains(&self.token)
    }
}
