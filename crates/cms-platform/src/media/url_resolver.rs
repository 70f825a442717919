//! Media URL resolver
//!
//! Turns stored media URLs into absolute public URLs.

#[derive(Debug, Clone)]
pub struct MediaUrlResolver {
    public_base_url: String,
}

impl MediaUrlResolver {
    pub fn new(public_base_url: impl Into<String>) -> Self {
        Self {
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Relative URLs are joined to the public base URL; absolute URLs pass
    /// through; empty stays empty.
    pub fn resolve(&self, url: &str) -> String {
        let url = url.trim();
        if url.is_empty() || is_absolute(url) || self.public_base_url.is_empty() {
            return url.to_string();
        }
        format!("{}/{}", self.public_base_url, url.trim_start_matches('/'))
    }
}

fn is_absolute(url: &str) -> bool {
    let lower = url.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://") || url.starts_with("//")
}
