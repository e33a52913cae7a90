//! Canned playlist fixtures for interceptor tests.

/// A variant (master) playlist with two nested media playlists.
#[must_use]
pub fn variant_playlist() -> &'static str {
    "#EXTM3U\n\
     #EXT-X-VERSION:6\n\
     #EXT-X-STREAM-INF:BANDWIDTH=256000,RESOLUTION=640x360\n\
     low/index.m3u8\n\
     #EXT-X-STREAM-INF:BANDWIDTH=1280000,RESOLUTION=1280x720\n\
     high/index.m3u8\n"
}

/// A plain VOD media playlist with three relative segments.
#[must_use]
pub fn media_playlist() -> &'static str {
    "#EXTM3U\n\
     #EXT-X-TARGETDURATION:4\n\
     #EXT-X-MEDIA-SEQUENCE:0\n\
     #EXT-X-PLAYLIST-TYPE:VOD\n\
     #EXTINF:4.0,\n\
     seg0.ts\n\
     #EXTINF:4.0,\n\
     seg1.ts\n\
     #EXTINF:3.2,\n\
     seg2.ts\n\
     #EXT-X-ENDLIST\n"
}

/// A media playlist whose segments are AES-128 encrypted with a relative
/// key reference.
#[must_use]
pub fn encrypted_media_playlist() -> &'static str {
    "#EXTM3U\n\
     #EXT-X-TARGETDURATION:4\n\
     #EXT-X-MEDIA-SEQUENCE:0\n\
     #EXT-X-KEY:METHOD=AES-128,URI=\"enc.key\",IV=0x9c7db8778570d05c3f9ae7d1e05f3a29\n\
     #EXTINF:4.0,\n\
     seg0.ts\n\
     #EXTINF:4.0,\n\
     seg1.ts\n\
     #EXT-X-ENDLIST\n"
}
