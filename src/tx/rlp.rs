//! Canonical RLP primitives
//!
//! Minimal big-endian integers, raw byte strings, and lists. Every value has
//! exactly one encoding; the same helpers feed both the signing hash and the
//! final wire serialization.

pub fn encode_u64(val: u64) -> Vec<u8> {
    encode_uint_bytes(&val.to_be_bytes())
}

pub fn encode_u128(val: u128) -> Vec<u8> {
    encode_uint_bytes(&val.to_be_bytes())
}

fn encode_uint_bytes(bytes: &[u8]) -> Vec<u8> {
    let leading_zeros = bytes.iter().take_while(|&&b| b == 0).count();
    let significant = &bytes[leading_zeros..];

    if significant.is_empty() {
        return vec![0x80];
    }
    if significant.len() == 1 && significant[0] < 0x80 {
        return significant.to_vec();
    }
    let mut result = vec![0x80 + significant.len() as u8];
    result.extend_from_slice(significant);
    result
}

/// Encode raw bytes as an RLP string (no zero stripping)
pub fn encode_bytes(data: &[u8]) -> Vec<u8> {
    if data.is_empty() {
        return vec![0x80];
    }
    if data.len() == 1 && data[0] < 0x80 {
        return data.to_vec();
    }

    if data.len() < 56 {
        let mut result = vec![0x80 + data.len() as u8];
        result.extend_from_slice(data);
        result
    } else {
        let len_bytes = encode_length(data.len());
        let mut result = vec![0xb7 + len_bytes.len() as u8];
        result.extend_from_slice(&len_bytes);
        result.extend_from_slice(data);
        result
    }
}

/// Encode a big-integer scalar (r or s): leading zero bytes are stripped
/// first, per canonical integer rules.
pub fn encode_scalar(data: &[u8]) -> Vec<u8> {
    let start = data.iter().take_while(|&&b| b == 0).count();
    encode_bytes(&data[start..])
}

/// Encode a 20-byte address as a fixed-width byte string
pub fn encode_address(addr: &[u8; 20]) -> Vec<u8> {
    encode_bytes(addr)
}

pub fn encode_list(items: &[Vec<u8>]) -> Vec<u8> {
    let mut payload = Vec::new();
    for item in items {
        payload.extend_from_slice(item);
    }

    if payload.len() < 56 {
        let mut result = vec![0xc0 + payload.len() as u8];
        result.extend_from_slice(&payload);
        result
    } else {
        let len_bytes = encode_length(payload.len());
        let mut result = vec![0xf7 + len_bytes.len() as u8];
        result.extend_from_slice(&len_bytes);
        result.extend_from_slice(&payload);
        result
    }
}

fn encode_length(len: usize) -> Vec<u8> {
    let bytes = len.to_be_bytes();
    let leading_zeros = bytes.iter().take_while(|&&b| b == 0).count();
    bytes[leading_zeros..].to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_u64() {
        assert_eq!(encode_u64(0), vec![0x80]);
        assert_eq!(encode_u64(127), vec![127]);
        assert_eq!(encode_u64(128), vec![0x81, 128]);
        assert_eq!(encode_u64(256), vec![0x82, 1, 0]);
    }

    #[test]
    fn test_encode_bytes() {
        assert_eq!(encode_bytes(&[]), vec![0x80]);
        assert_eq!(encode_bytes(&[0x7f]), vec![0x7f]);
        assert_eq!(encode_bytes(&[0x80]), vec![0x81, 0x80]);
        assert_eq!(encode_bytes(&[1, 2, 3]), vec![0x83, 1, 2, 3]);

        // Byte strings keep their leading zeros
        assert_eq!(encode_bytes(&[0, 0, 1]), vec![0x83, 0, 0, 1]);
    }

    #[test]
    fn test_encode_scalar_strips_leading_zeros() {
        let mut r = [0u8; 32];
        r[31] = 0x05;
        assert_eq!(encode_scalar(&r), vec![0x05]);

        let zero = [0u8; 32];
        assert_eq!(encode_scalar(&zero), vec![0x80]);
    }

    #[test]
    fn test_encode_long_string() {
        let data = vec![0xaa; 60];
        let encoded = encode_bytes(&data);
        assert_eq!(encoded[0], 0xb8);
        assert_eq!(encoded[1], 60);
        assert_eq!(&encoded[2..], &data[..]);
    }

    #[test]
    fn test_encode_list() {
        let items = vec![encode_u64(1), encode_u64(2)];
        assert_eq!(encode_list(&items), vec![0xc2, 1, 2]);

        let long = vec![encode_bytes(&[0xbb; 60])];
        let encoded = encode_list(&long);
        assert_eq!(encoded[0], 0xf8);
        assert_eq!(encoded[1], 62);
    }
}
