pub mod token;
pub mod user;

pub use token::TokenRepository;
pub use user::UserDirectory;

#[cfg(test)]
pub use token::MockTokenRepository;
#[cfg(test)]
pub use user::MockUserDirectory;
