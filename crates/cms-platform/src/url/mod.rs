//! Page URL normalization and hashing

use sha2::{Digest, Sha256};

#[derive(Debug, Clone, Copy, Default)]
pub struct UrlService;

impl UrlService {
    pub fn new() -> Self {
        Self
    }

    /// Normalize a page URL: trimmed, forward slashes only, no repeated
    /// slashes, leading and trailing `/` on the path. Query and fragment
    /// are kept as given. Case is preserved.
    pub fn fix_url(&self, url: &str) -> String {
        let url = url.trim().replace('\\', "/");
        let split = url.find(|c: char| c == '?' || c == '#').unwrap_or(url.len());
        let (path, suffix) = url.split_at(split);

        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        if segments.is_empty() {
            return format!("/{}", suffix);
        }
        format!("/{}/{}", segments.join("/"), suffix)
    }

    /// Hex SHA-256 of the URL as stored.
    pub fn url_hash(&self, url: &str) -> String {
        hex::encode(Sha256::digest(url.as_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fix_url() {
        let urls = UrlService::new();
        assert_eq!(urls.fix_url("about/team"), "/about/team/");
        assert_eq!(urls.fix_url("  \\news\\\\2024 "), "/news/2024/");
        assert_eq!(urls.fix_url("//a///b/"), "/a/b/");
        assert_eq!(urls.fix_url(""), "/");
        assert_eq!(urls.fix_url("/"), "/");
        assert_eq!(urls.fix_url("/Search?q=a/b#top"), "/Search/?q=a/b#top");
    }

    #[test]
    fn test_url_hash() {
        let urls = UrlService::new();
        assert_eq!(
            urls.url_hash(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(urls.url_hash("/a/").len(), 64);
        assert_ne!(urls.url_hash("/a/"), urls.url_hash("/A/"));
    }
}
