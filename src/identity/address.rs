/// Wallet address format checks (EIP-55 checksums)
use sha3::{Digest, Keccak256};

/// Check that `s` is a syntactically valid `0x`-prefixed 20-byte address.
///
/// All-lowercase hex is accepted as-is. Any other casing must carry a
/// correct EIP-55 checksum.
pub fn is_valid_address(s: &str) -> bool {
    let Some(body) = s.strip_prefix("0x") else {
        return false;
    };
    if body.len() != 40 || !body.bytes().all(|b| b.is_ascii_hexdigit()) {
        return false;
    }
    if body.bytes().all(|b| !b.is_ascii_uppercase()) {
        return true;
    }

    to_checksum_address(s).as_deref() == Some(s)
}

/// Render an address with its EIP-55 mixed-case checksum.
///
/// Returns `None` when the input is not 40 hex digits behind `0x`.
pub fn to_checksum_address(s: &str) -> Option<String> {
    let body = s.strip_prefix("0x")?;
    if body.len() != 40 || !body.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }

    let lower = body.to_ascii_lowercase();
    let hash = hex::encode(Keccak256::digest(lower.as_bytes()));

    let mut out = String::with_capacity(42);
    out.push_str("0x");
    for (c, h) in lower.chars().zip(hash.chars()) {
        let nibble = h.to_digit(16).unwrap_or(0);
        if c.is_ascii_alphabetic() && nibble >= 8 {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c);
        }
    }

    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHECKSUMMED: [&str; 4] = [
        "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
        "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359",
        "0xdbF03B407c01E7cD3CBea99509d93f8DDDC8C6FB",
        "0xD1220A0cf47c7B9Be7A2E6BA89F429762e7b9aDb",
    ];

    #[test]
    fn test_checksum_vectors() {
        for addr in CHECKSUMMED {
            assert_eq!(to_checksum_address(&addr.to_lowercase()).as_deref(), Some(addr));
            assert!(is_valid_address(addr));
        }
    }

    #[test]
    fn test_lowercase_is_valid() {
        assert!(is_valid_address("0x3a044b218bae80e5b9e16609443a192129a67bea"));
        assert!(is_valid_address("0x1111111111111111111111111111111111111111"));
    }

    #[test]
    fn test_bad_checksum_rejected() {
        // flip the case of one letter
        assert!(!is_valid_address("0x5AAeb6053F3E94C9b9A09f33669435E7Ef1BeAed"));
    }

    #[test]
    fn test_malformed_rejected() {
        assert!(!is_valid_address(""));
        assert!(!is_valid_address("0x123"));
        assert!(!is_valid_address("3a044b218bae80e5b9e16609443a192129a67bea"));
        assert!(!is_valid_address("0xzz044b218bae80e5b9e16609443a192129a67bea"));
        assert!(!is_valid_address("vitalik.eth"));
        assert!(to_checksum_address("0x123").is_none());
    }
}
