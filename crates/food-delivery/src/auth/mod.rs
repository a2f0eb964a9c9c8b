//! # Authentication
//!
//! Registration and login issue HS256 JWT pairs; [`AuthService::authenticate`] turns a
//! bearer header back into a [`Principal`] that services check roles against.
//!
//! - [`password`] - bcrypt hashing on the blocking pool
//! - [`jwt`] - token encoding and validation
//! - [`principal`] - the authenticated caller and its role checks
//! - [`service`] - register, login, authenticate, refresh

pub mod jwt;
pub mod password;
pub mod principal;
pub mod service;

pub use jwt::*;
pub use principal::*;
pub use service::*;
