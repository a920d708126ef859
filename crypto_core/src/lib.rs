pub mod channel;
pub mod hash;
pub mod key;
pub mod prime;
pub mod utils;

pub use crate::{
    hash::{RoHash, RO_HASH},
    key::Key,
};

pub use channel::*;
