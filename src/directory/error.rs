use super::types::{ContactId, NumberId};

/// Coarse classification of a [`DirectoryError`], used by the transport to pick a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
}

/// Failures raised by directory operations.
///
/// The display strings are part of the wire contract and reach clients verbatim.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DirectoryError {
    #[error("Contact with ID={0} is not found.")]
    ContactNotFound(ContactId),
    #[error("Phone number with ID={0} is not found.")]
    PhoneNumberNotFound(NumberId),
}

impl DirectoryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DirectoryError::ContactNotFound(_) | DirectoryError::PhoneNumberNotFound(_) => {
                ErrorKind::NotFound
            }
        }
    }
}

pub type DirectoryResult<T> = Result<T, DirectoryError>;
