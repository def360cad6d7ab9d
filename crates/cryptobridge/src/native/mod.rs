//! Native primitives backed by the RustCrypto crates
//!
//! Everything here is a thin shim between a RustCrypto primitive and the
//! traits in [`crate::transformation`]. No algorithm is implemented in this
//! crate; EAX is assembled from the AES-CTR and CMAC crates.

mod aes;
mod digest;
mod eax;
mod mac;
mod salsa;

pub use self::aes::{AES_KEY_LENGTHS, AesEngine};
pub use self::digest::{HashAlgorithm, NativeHash};
pub use self::eax::EaxEngine;
pub use self::mac::MacAlgorithm;
pub use self::salsa::{SalsaEngine, SalsaVariant};

pub(crate) use self::mac::MacState;
