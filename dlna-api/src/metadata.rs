//! DIDL-Lite metadata describing a registered stream

use quick_xml::escape::escape;

use crate::content_features::ContentFeatures;

/// Track information shown by the renderer while a stream plays
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackMetadata {
    pub title: Option<String>,
    pub artist: Option<String>,
    /// Album art (thumbnail) URL
    pub album_art: Option<String>,
}

impl TrackMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_artist(mut self, artist: impl Into<String>) -> Self {
        self.artist = Some(artist.into());
        self
    }

    pub fn with_album_art(mut self, url: impl Into<String>) -> Self {
        self.album_art = Some(url.into());
        self
    }

    /// Render the DIDL-Lite document for `stream_url`.
    ///
    /// Absent fields render as empty elements. The result is unescaped XML;
    /// it is escaped once more when placed into `CurrentURIMetaData`.
    pub fn to_didl(
        &self,
        stream_url: &str,
        mime_type: &str,
        features: &ContentFeatures,
        encoding: &str,
    ) -> String {
        let field =
            |value: &Option<String>| escape(value.as_deref().unwrap_or_default()).into_owned();

        format!(
            r#"<?xml version="1.0" encoding="{encoding}"?>
<DIDL-Lite xmlns="urn:schemas-upnp-org:metadata-1-0/DIDL-Lite/" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:upnp="urn:schemas-upnp-org:metadata-1-0/upnp/" xmlns:dlna="urn:schemas-dlna-org:metadata-1-0/">
    <item id="0" parentID="-1" restricted="false">
        <dc:title>{title}</dc:title>
        <dc:creator></dc:creator>
        <upnp:artist>{artist}</upnp:artist>
        <upnp:albumArtURI>{album_art}</upnp:albumArtURI>
        <upnp:album></upnp:album>
        <upnp:class>object.item.audioItem.musicTrack</upnp:class>
        <res protocolInfo="http-get:*:{mime_type}:{features}">{stream_url}</res>
    </item>
</DIDL-Lite>"#,
            encoding = encoding,
            title = field(&self.title),
            artist = field(&self.artist),
            album_art = field(&self.album_art),
            mime_type = escape(mime_type),
            features = escape(&features.to_string()),
            stream_url = escape(stream_url),
        )
    }
}
