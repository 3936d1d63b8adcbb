// Hex payload decoding for the -w argument.
use crate::error::ProbeError;
use log::warn;

/// Decoded `-w` payload. A newtype so clap treats it as one value instead
/// of a list of bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Payload(pub Vec<u8>);

/// Decodes pairs of hex digits into bytes. A trailing lone digit is dropped,
/// anything that is not a hex digit is rejected.
pub fn decode(text: &str) -> Result<Vec<u8>, ProbeError> {
    let raw = text.as_bytes();
    let even = raw.len() - raw.len() % 2;
    if even != raw.len() {
        warn!(
            "Odd number of hex digits in {:?}, dropping the trailing one",
            text
        );
    }
    hex::decode(&raw[..even]).map_err(|source| ProbeError::InvalidHexInput {
        input: text.to_string(),
        source,
    })
}

/// clap value parser for the payload argument.
pub fn parse_payload(text: &str) -> Result<Payload, ProbeError> {
    decode(text).map(Payload)
}

/// Uppercase hex, two digits per byte, no separator.
pub fn encode_upper(bytes: &[u8]) -> String {
    hex::encode_upper(bytes)
}
