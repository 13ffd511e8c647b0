//! Plain-text payload encoding (`CF_UNICODETEXT`: UTF-16LE, NUL-terminated)

/// Encode text as UTF-16LE bytes with a trailing NUL unit
pub fn encode_unicode_text(text: &str) -> Vec<u8> {
    let mut bytes = Vec::with_capacity((text.len() + 1) * 2);
    for unit in text.encode_utf16().chain(std::iter::once(0)) {
        bytes.extend_from_slice(&unit.to_le_bytes());
    }
    bytes
}

/// Decode UTF-16LE bytes up to the first NUL unit.
/// A trailing odd byte is ignored; unpaired surrogates are replaced.
pub fn decode_unicode_text(bytes: &[u8]) -> String {
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .take_while(|&unit| unit != 0)
        .collect();
    String::from_utf16_lossy(&units)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_appends_nul() {
        assert_eq!(encode_unicode_text("hi"), vec![b'h', 0, b'i', 0, 0, 0]);
        assert_eq!(encode_unicode_text(""), vec![0, 0]);
    }

    #[test]
    fn decode_stops_at_nul() {
        let bytes = [b'o', 0, b'k', 0, 0, 0, b'x', 0];
        assert_eq!(decode_unicode_text(&bytes), "ok");
    }

    #[test]
    fn decode_without_terminator() {
        assert_eq!(decode_unicode_text(&[b'a', 0, b'b', 0, b'c']), "ab");
    }

    #[test]
    fn non_ascii_survives() {
        let text = "héllo 🌍";
        assert_eq!(decode_unicode_text(&encode_unicode_text(text)), text);
    }
}
