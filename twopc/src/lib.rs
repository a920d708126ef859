pub mod config;
pub mod errors;
pub mod garble;
pub mod ot;
pub mod twopc_prot;

pub use config::*;
pub use errors::*;
pub use garble::*;
pub use ot::*;
pub use twopc_prot::*;

use circuit::Circuit;
use crypto_core::AbstractChannel;
use std::io::Result;

const TAG_FREE: u8 = 0;
const TAG_REDUCED: u8 = GarbledTable::REDUCED_ROWS as u8;
const TAG_FULL: u8 = GarbledTable::FULL_ROWS as u8;

fn write_label<C: AbstractChannel>(channel: &mut C, label: &Label) -> Result<()> {
    channel.write_key(&label.key)?;
    channel.write_bool(label.color)
}

fn read_label<C: AbstractChannel>(channel: &mut C, bits: usize) -> Result<Label> {
    let key = channel.read_key(bits)?;
    let color = channel.read_bool()?;
    Ok(Label::new(key, color))
}

/// Send the gate tables then the output tables.
///
/// Each gate is a tag byte (0 for a free gate, otherwise its row count)
/// followed by its rows; each output table is packed in one byte.
pub fn send_gc<C: AbstractChannel>(channel: &mut C, gc: &GarbledCircuitTable) -> Result<()> {
    for table in gc.tables.iter() {
        match table {
            None => channel.write_bytes(&[TAG_FREE])?,
            Some(t) => {
                channel.write_bytes(&[t.nrows() as u8])?;
                for row in t.rows() {
                    write_label(channel, row)?;
                }
            }
        }
    }
    let packed: Vec<u8> = gc.output_tables.iter().map(|t| t.to_byte()).collect();
    channel.write_bytes(&packed)
}

/// Receive what [`send_gc`] sent for `circ` garbled under `config`.
pub fn receive_gc<C: AbstractChannel>(
    channel: &mut C,
    circ: &Circuit,
    config: &GcConfig,
) -> std::result::Result<GarbledCircuitTable, ProtocolError> {
    let bits = config.security_param;
    let mut tables = Vec::with_capacity(circ.ngates());
    for gate in circ.gates.iter() {
        let expected = if config.free_xor && gate.is_xor() {
            TAG_FREE
        } else if config.row_reduction {
            TAG_REDUCED
        } else {
            TAG_FULL
        };
        let mut tag = [0u8; 1];
        channel.read_bytes(&mut tag)?;
        if tag[0] != expected {
            return Err(ProtocolError::InvalidTable(gate.gate_id()));
        }
        let table = match expected {
            TAG_FREE => None,
            TAG_REDUCED => Some(GarbledTable::Reduced([
                read_label(channel, bits)?,
                read_label(channel, bits)?,
                read_label(channel, bits)?,
            ])),
            _ => Some(GarbledTable::Full([
                read_label(channel, bits)?,
                read_label(channel, bits)?,
                read_label(channel, bits)?,
                read_label(channel, bits)?,
            ])),
        };
        tables.push(table);
    }

    let mut packed = vec![0u8; circ.outputs.len()];
    channel.read_bytes(&mut packed)?;
    let output_tables = packed
        .into_iter()
        .enumerate()
        .map(|(i, byte)| {
            OutputTable::from_byte(byte).ok_or(ProtocolError::InvalidOutputTable(i))
        })
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(GarbledCircuitTable::new(tables, output_tables))
}

/// Send a count followed by the labels.
pub fn send_labels<C: AbstractChannel>(channel: &mut C, labels: &[Label]) -> Result<()> {
    channel.write_usize(labels.len())?;
    for label in labels {
        write_label(channel, label)?;
    }
    Ok(())
}

/// Receive exactly `n` labels of width `bits`.
pub fn receive_labels<C: AbstractChannel>(
    channel: &mut C,
    n: usize,
    bits: usize,
) -> std::result::Result<Vec<Label>, ProtocolError> {
    let got = channel.read_usize()?;
    if got != n {
        return Err(ProtocolError::InputLengthMismatch { expected: n, got });
    }
    (0..n)
        .map(|_| read_label(channel, bits).map_err(ProtocolError::from))
        .collect()
}
