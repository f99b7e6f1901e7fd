// vim: tw=80
use thiserror::Error;

/// Errors returned by [`mock`](crate::mock) and by [`MockInstance`]
/// accessors.
///
/// [`MockInstance`]: crate::MockInstance
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum Error {
    /// The type to mock, or its base, can't be mocked.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("no member named `{0}`")]
    NoSuchMember(String),
    #[error("member `{0}` is not a spy")]
    NotASpy(String),
    #[error("member `{0}` is not callable")]
    NotCallable(String),
    /// The base class declares the method without implementing it.
    #[error("method `{0}` is not implemented")]
    Unimplemented(String),
}

pub type Result<T> = std::result::Result<T, Error>;
