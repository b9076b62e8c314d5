/// Decode a complete response body as text.
///
/// Invalid UTF-8 sequences are replaced rather than rejected, matching how
/// HTTP clients decode text bodies without a declared charset.
pub fn decode_body(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}
