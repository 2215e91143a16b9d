//! Application services for identity and hierarchy management.

mod directory;

pub use directory::{
    DirectoryError, DirectoryResult, DirectoryService, RegisterUserRequest, UpdateProfileRequest,
};
