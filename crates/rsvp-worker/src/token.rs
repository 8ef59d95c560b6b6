use crate::util::{hex_encode, random_bytes};

/// 256-bit tokens.
pub const TOKEN_BYTES: usize = 32;

/// Length of a hex-encoded token.
pub const TOKEN_HEX_LEN: usize = TOKEN_BYTES * 2;

/// Tokens expire 24 hours after submission.
pub const TOKEN_TTL_SECS: i64 = 24 * 60 * 60;

/// Fresh verification token: 32 random bytes, lowercase hex.
pub fn generate_verification_token() -> Result<String, getrandom::Error> {
    Ok(hex_encode(&random_bytes(TOKEN_BYTES)?))
}

/// Canonical form of a presented token, or `None` when it cannot be one of ours.
pub fn parse_token(raw: &str) -> Option<String> {
    let token = raw.trim().to_ascii_lowercase();
    if token.len() != TOKEN_HEX_LEN || !token.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    Some(token)
}

pub fn verification_link(app_base_url: &str, token: &str) -> String {
    format!("{}/verify?token={token}", app_base_url.trim_end_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_tokens_are_64_lowercase_hex() {
        let token = generate_verification_token().unwrap();
        assert_eq!(token.len(), 64);
        assert!(token.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')));
    }

    #[test]
    fn generated_tokens_differ() {
        let a = generate_verification_token().unwrap();
        let b = generate_verification_token().unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn parse_token_accepts_only_token_shape() {
        let token = "ab".repeat(32);
        assert_eq!(parse_token(&format!("  {}  ", token.to_uppercase())), Some(token));
        assert_eq!(parse_token(""), None);
        assert_eq!(parse_token(&"a".repeat(63)), None);
        assert_eq!(parse_token(&"g".repeat(64)), None);
    }

    #[test]
    fn link_embeds_token_once() {
        assert_eq!(
            verification_link("https://party.example/", "abc"),
            "https://party.example/verify?token=abc"
        );
    }
}
