use std::fmt;

/// Bearer token sent to Concourse hosts.
#[derive(Clone, PartialEq, Eq)]
pub struct Token(String);

impl Token {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Token {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Token(***)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_debug_is_redacted() {
        let token = Token::from("secret-value");
        assert_eq!(format!("{token:?}"), "Token(***)");
        assert_eq!(token.as_str(), "secret-value");
    }
}
