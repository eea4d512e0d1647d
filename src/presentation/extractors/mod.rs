mod authenticated_user;

pub use authenticated_user::{AuthenticatedUser, USER_ID_HEADER};
