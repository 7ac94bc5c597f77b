//! Microdata error types.

use rw_renderer::directive::DirectiveError;

/// Error raised by the `itemscope` directive or the `itemprop` role.
#[derive(Debug, thiserror::Error)]
pub enum MicrodataError {
    /// Role text does not end with a `<name>` group.
    #[error("`{0}` does not match expected itemprop format: value <name>")]
    Syntax(String),
    /// Displayed value is empty.
    #[error("itemprop `{0}` has an empty value")]
    EmptyValue(String),
    /// Property name is empty.
    #[error("itemprop `{0}` has an empty property name")]
    EmptyName(String),
    /// Link target after the colon is empty.
    #[error("itemprop `{0}` has an empty link target")]
    EmptyHref(String),
    /// `tag` option is not a valid HTML tag name.
    #[error("invalid tag name `{0}`")]
    InvalidTag(String),
}

impl From<MicrodataError> for DirectiveError {
    fn from(error: MicrodataError) -> Self {
        Self::handler(error)
    }
}
