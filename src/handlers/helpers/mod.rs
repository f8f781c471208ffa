//! Helpers shared by message handlers.

pub mod fanout;

use crate::error::HandlerError;

/// Characters that would break the grammar of later messages naming this user.
const FORBIDDEN_IN_USERNAME: [char; 2] = [chat_proto::SEPARATOR, chat_proto::LIST_SEPARATOR];

/// Check a (trimmed) username against the server's naming rules.
pub fn validate_username(name: &str, max_len: usize) -> Result<(), HandlerError> {
    if name.is_empty() {
        return Err(HandlerError::EmptyUsername);
    }
    let invalid = name.chars().count() > max_len
        || name
            .chars()
            .any(|c| c.is_whitespace() || c.is_control() || FORBIDDEN_IN_USERNAME.contains(&c));
    if invalid {
        return Err(HandlerError::InvalidUsername(name.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_names() {
        assert!(validate_username("alice", 32).is_ok());
        assert!(validate_username("Bob_2.0-x", 32).is_ok());
        assert!(validate_username("小明", 32).is_ok());
    }

    #[test]
    fn length_counts_characters() {
        assert!(validate_username("小明小明", 4).is_ok());
        assert!(matches!(
            validate_username("abcde", 4),
            Err(HandlerError::InvalidUsername(_))
        ));
    }

    #[test]
    fn rejects_separators_and_whitespace() {
        for name in ["a:b", "a,b", "a b", "a\tb"] {
            assert!(
                matches!(validate_username(name, 32), Err(HandlerError::InvalidUsername(_))),
                "{name:?}"
            );
        }
        assert!(matches!(validate_username("", 32), Err(HandlerError::EmptyUsername)));
    }
}
