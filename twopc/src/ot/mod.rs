//! Provides traits for oblivious transfer (OT) protocols.
//! These traits focus on 1-out-of-2 OTs of byte strings.

pub mod bm;
pub mod errors;
pub mod group;

pub use bm::*;
pub use errors::{OTReceiverError, OTSenderError};
pub use group::*;

use crypto_core::AbstractChannel;
use rand::{CryptoRng, Rng};

/// Sender of OT
pub trait OtSender
where
    Self: Sized,
{
    /// Message type.
    type Msg: Sized + AsRef<[u8]>;

    /// Send one message of each pair, chosen by the receiver.
    fn send<C: AbstractChannel, R: CryptoRng + Rng>(
        &mut self,
        channel: &mut C,
        inputs: &[(Self::Msg, Self::Msg)],
        rng: &mut R,
    ) -> Result<(), OTSenderError>;
}

/// Receiver of OT
pub trait OtReceiver
where
    Self: Sized,
{
    /// Message type.
    type Msg: Sized + AsRef<[u8]>;

    /// Receive the messages selected by `inputs`.
    fn receive<C: AbstractChannel, R: CryptoRng + Rng>(
        &mut self,
        channel: &mut C,
        inputs: &[bool],
        rng: &mut R,
    ) -> Result<Vec<Self::Msg>, OTReceiverError>;
}
