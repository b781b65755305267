//! Codec negotiation between the encoder registry and a renderer
//!
//! A renderer advertises mime types; a [`CodecCatalog`] turns them into the
//! codecs it can actually produce, applies device specific rules and orders
//! the result by preference.

use dlna_discovery::{Codec, Device};

/// Source of playable codecs for a renderer
pub trait CodecCatalog: Send + Sync {
    /// Codecs that can be produced for the advertised mime types
    fn codecs_for(&self, mime_types: &[String]) -> Vec<Codec>;

    /// Device specific adjustments, run before prioritizing
    fn apply_rules(&self, _codecs: &mut Vec<Codec>, _device: &Device) {}

    /// Order codecs by descending priority, keeping advertised order on ties
    fn prioritize(&self, codecs: &mut [Codec]) {
        codecs.sort_by(|a, b| b.priority.cmp(&a.priority));
    }

    /// The codec used when a stream is registered without an explicit one
    fn select<'a>(&self, device: &'a Device) -> Option<&'a Codec> {
        device.preferred_codec()
    }
}

/// An encoder family and the mime types it can be announced as
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecProfile {
    pub name: String,
    pub accepts: Vec<String>,
    pub priority: i32,
}

impl CodecProfile {
    pub fn new(name: impl Into<String>, accepts: &[&str], priority: i32) -> Self {
        Self {
            name: name.into(),
            accepts: accepts.iter().map(|mime| mime.to_lowercase()).collect(),
            priority,
        }
    }

    /// Whether this profile can serve `mime_type`; parameters are ignored
    pub fn accepts(&self, mime_type: &str) -> bool {
        let essence = mime_type.split(';').next().unwrap_or_default().trim().to_lowercase();
        self.accepts.iter().any(|accepted| *accepted == essence)
    }
}

/// A fixed list of codec profiles
#[derive(Debug, Clone)]
pub struct StaticCodecCatalog {
    profiles: Vec<CodecProfile>,
}

impl StaticCodecCatalog {
    pub fn new(profiles: Vec<CodecProfile>) -> Self {
        Self { profiles }
    }

    pub fn profiles(&self) -> &[CodecProfile] {
        &self.profiles
    }
}

impl Default for StaticCodecCatalog {
    fn default() -> Self {
        Self::new(vec![
            CodecProfile::new("mp3", &["audio/mpeg", "audio/mp3"], 18),
            CodecProfile::new("flac", &["audio/flac", "audio/x-flac"], 16),
            CodecProfile::new("wav", &["audio/wav", "audio/x-wav"], 14),
            CodecProfile::new("l16", &["audio/l16"], 12),
            CodecProfile::new("ogg", &["audio/ogg", "application/ogg"], 10),
            CodecProfile::new("aac", &["audio/aac", "audio/x-aac", "audio/mp4"], 8),
            CodecProfile::new("opus", &["audio/opus"], 6),
        ])
    }
}

impl CodecCatalog for StaticCodecCatalog {
    fn codecs_for(&self, mime_types: &[String]) -> Vec<Codec> {
        let mut codecs: Vec<Codec> = Vec::new();
        for mime_type in mime_types {
            let profile = self.profiles.iter().find(|profile| profile.accepts(mime_type));
            let Some(profile) = profile else {
                continue;
            };
            if codecs.iter().any(|codec| codec.mime_type == *mime_type) {
                continue;
            }
            codecs.push(Codec::new(mime_type.clone(), profile.priority));
        }
        codecs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mime_types(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn test_unknown_mime_types_are_dropped() {
        let catalog = StaticCodecCatalog::default();
        let codecs = catalog.codecs_for(&mime_types(&["video/mp4", "audio/flac", "image/jpeg"]));
        assert_eq!(codecs, vec![Codec::new("audio/flac", 16)]);
    }

    #[test]
    fn test_parameters_ignored_when_matching() {
        let catalog = StaticCodecCatalog::default();
        let codecs = catalog.codecs_for(&mime_types(&["audio/L16;rate=44100;channels=2"]));
        assert_eq!(codecs.len(), 1);
        assert_eq!(codecs[0].mime_type, "audio/L16;rate=44100;channels=2");
        assert_eq!(codecs[0].priority, 12);
    }

    #[test]
    fn test_prioritize_is_stable() {
        let catalog = StaticCodecCatalog::default();
        let mut codecs = catalog.codecs_for(&mime_types(&[
            "audio/wav",
            "audio/x-wav",
            "audio/mpeg",
            "audio/ogg",
        ]));
        catalog.prioritize(&mut codecs);

        let order: Vec<&str> = codecs.iter().map(|codec| codec.mime_type.as_str()).collect();
        assert_eq!(order, vec!["audio/mpeg", "audio/wav", "audio/x-wav", "audio/ogg"]);
    }
}
