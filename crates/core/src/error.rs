/// Malformed rule text, raised at parse time.
///
/// `position` is the zero-based character offset into the full rule text
/// (the text length when the problem is an unexpected end of input).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message} (at position {position})")]
pub struct FormatError {
    pub position: usize,
    pub message: String,
}

impl FormatError {
    pub fn new(position: usize, message: impl Into<String>) -> Self {
        FormatError {
            position,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_position() {
        let err = FormatError::new(4, "unexpected ')'");
        assert_eq!(err.to_string(), "unexpected ')' (at position 4)");
    }
}
