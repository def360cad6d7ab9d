//! Symmetric cipher wrappers
//!
//! Each wrapper owns a [`KeyedPair`](crate::keying::KeyedPair) and adds the
//! surface of its cipher family on top of the shared key/IV lifecycle.

mod authenticated;
mod block;
mod stream;

pub use self::authenticated::AuthenticatedCipher;
pub use self::block::BlockCipher;
pub use self::stream::StreamCipher;
