//! Parse configuration

/// Case policy applied to the decoded string table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum NameCase {
    /// Keep names as stored
    #[default]
    Preserve,
    /// ASCII-lowercase every decoded byte; name queries are lowercased too
    Lowercase,
}

impl NameCase {
    /// Apply this policy to a name query
    pub(crate) fn normalize<'a>(self, name: &'a [u8]) -> std::borrow::Cow<'a, [u8]> {
        match self {
            Self::Lowercase if name.iter().any(u8::is_ascii_uppercase) => {
                std::borrow::Cow::Owned(name.to_ascii_lowercase())
            }
            _ => std::borrow::Cow::Borrowed(name),
        }
    }
}

/// Options controlling how a WLD buffer is parsed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Case policy for names
    pub name_case: NameCase,
}

impl ParseOptions {
    /// Default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the name case policy
    pub fn name_case(mut self, name_case: NameCase) -> Self {
        self.name_case = name_case;
        self
    }
}
