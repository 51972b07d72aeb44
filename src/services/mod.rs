//! Core auth services: credential store, token codec, cookie transport.

pub mod cookie;
pub mod credentials;
pub mod token;
