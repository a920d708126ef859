use std::{
    io::{BufReader, BufWriter, Result},
    os::unix::net::UnixStream,
};

use crate::StdChannel;

pub type LocalChannel = StdChannel<BufReader<UnixStream>, BufWriter<UnixStream>>;

/// Two connected in-process channels, one per party.
pub fn local_channel_pair() -> Result<(LocalChannel, LocalChannel)> {
    let (tx, rx) = UnixStream::pair()?;
    let sender = StdChannel::new(BufReader::new(tx.try_clone()?), BufWriter::new(tx));
    let receiver = StdChannel::new(BufReader::new(rx.try_clone()?), BufWriter::new(rx));
    Ok((sender, receiver))
}
