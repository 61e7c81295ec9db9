//! Tag metadata decoded from the tune's embedded info strings.

use crate::emu::SidTune;

/// Decoded tag strings announced once per session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TuneTags {
    /// Song title.
    pub title: Option<String>,
    /// Artist/composer.
    pub artist: Option<String>,
    /// Copyright / release string.
    pub copyright: Option<String>,
}

impl TuneTags {
    /// Extract and convert the first three info strings of a tune.
    pub fn from_tune(tune: &dyn SidTune) -> Self {
        TuneTags {
            title: tune.info_string(0).map(latin1_to_utf8),
            artist: tune.info_string(1).map(latin1_to_utf8),
            copyright: tune.info_string(2).map(latin1_to_utf8),
        }
    }

    /// Whether no tag field is populated.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.artist.is_none() && self.copyright.is_none()
    }
}

/// Convert a Latin-1 (ISO-8859-1) byte string to UTF-8.
///
/// Every Latin-1 code point maps directly to the Unicode scalar of the same
/// value, so the conversion cannot fail.
pub fn latin1_to_utf8(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_passes_through() {
        assert_eq!(latin1_to_utf8(b"Commando"), "Commando");
    }

    #[test]
    fn high_latin1_maps_to_unicode() {
        // 0xE9 is e-acute in Latin-1, 0xA9 the copyright sign.
        assert_eq!(latin1_to_utf8(&[0x52, 0xE9, 0xA9]), "R\u{e9}\u{a9}");
    }

    #[test]
    fn empty_input_yields_empty_string() {
        assert_eq!(latin1_to_utf8(b""), "");
    }
}
