//! Load Bristol Fashion circuits.
//!
//! Header: `ngates nwires`, then `niv n_0 .. n_k` for the inputs and
//! `nov m_0 .. m_k` for the outputs. Input values sit on the first wires and
//! outputs on the last ones. Gate lines read `nin nout in.. out TYPE` with
//! TYPE one of AND, XOR, OR, INV (NOT is accepted as an alias of INV).

use crate::circuit::Circuit;
use crate::errors::CircuitLoadError;
use crate::gate::GateKind;
use anyhow::{anyhow, Context};
use regex::Regex;
use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};
use tracing::debug;

/// Parse captures into a Vec
fn parse_to_vec<'a>(re: &Regex, line: &'a str) -> Vec<&'a str> {
    re.captures_iter(line)
        .filter_map(|cap| cap.get(1))
        .map(|m| m.as_str())
        .collect()
}

fn parse_usize(s: &str, what: &str) -> Result<usize, CircuitLoadError> {
    Ok(s.parse()
        .with_context(|| format!("Failed to parse {}: {}", what, s))?)
}

/// Read the next non-empty line of the header.
fn next_line<R: BufRead>(reader: &mut R) -> Result<String, CircuitLoadError> {
    loop {
        let mut line = String::new();
        let n = reader.read_line(&mut line).context("Failed to read line")?;
        if n == 0 {
            return Err(CircuitLoadError::ParsingError(anyhow!(
                "Unexpected end of circuit header"
            )));
        }
        if !line.trim().is_empty() {
            return Ok(line);
        }
    }
}

/// Parse a `count w_0 .. w_count` header line and return the total wire count.
fn parse_io_line(re: &Regex, line: &str, what: &str) -> Result<usize, CircuitLoadError> {
    let fields = parse_to_vec(re, line);
    let (count, widths) = fields.split_first().ok_or_else(|| {
        CircuitLoadError::ParsingError(anyhow!("Empty {} line: {}", what, line))
    })?;
    let count = parse_usize(count, what)?;
    if widths.len() != count {
        return Err(CircuitLoadError::ParsingError(anyhow!(
            "Expecting wire count to be specified for every {}: {}",
            what,
            line
        )));
    }
    widths.iter().try_fold(0usize, |total, w| {
        total.checked_add(parse_usize(w, what)?).ok_or_else(|| {
            CircuitLoadError::ParsingError(anyhow!("Too many {} wires: {}", what, line))
        })
    })
}

impl Circuit {
    /// Parse a Bristol Fashion circuit as specified here:
    /// `https://homes.esat.kuleuven.be/~nsmart/MPC/`
    pub fn parse<R: BufRead>(mut reader: R) -> Result<Self, CircuitLoadError> {
        let re = Regex::new(r"(\d+)").context("Failed to compile regex")?;

        let line = next_line(&mut reader)?;
        let header = parse_to_vec(&re, &line);
        if header.len() != 2 {
            return Err(CircuitLoadError::ParsingError(anyhow!(
                "Expecting line to be ngates, nwires: {}",
                line
            )));
        }
        let ngates = parse_usize(header[0], "ngates")?;
        let nwires = parse_usize(header[1], "nwires")?;

        let ninput_wires = parse_io_line(&re, &next_line(&mut reader)?, "input")?;
        let noutput_wires = parse_io_line(&re, &next_line(&mut reader)?, "output")?;
        if ninput_wires
            .checked_add(noutput_wires)
            .map_or(true, |n| n > nwires)
        {
            return Err(CircuitLoadError::ParsingError(anyhow!(
                "{} input and {} output wires do not fit in {} wires",
                ninput_wires,
                noutput_wires,
                nwires
            )));
        }

        let mut circ = Circuit::new();
        let wires = circ.register_wires(nwires);

        let re = Regex::new(r"(\S+)\s*").context("Failed to compile regex")?;
        for line in reader.lines() {
            let line = line.context("Failed to read line")?;
            let gate_info = parse_to_vec(&re, &line);
            let Some((gate_type, fields)) = gate_info.split_last() else {
                continue;
            };
            let kind = match *gate_type {
                "AND" => GateKind::And,
                "XOR" => GateKind::Xor,
                "OR" => GateKind::Or,
                "INV" | "NOT" => GateKind::Not,
                _ => {
                    return Err(CircuitLoadError::ParsingError(anyhow!(
                        "Encountered unsupported gate type: {}",
                        gate_type
                    )));
                }
            };
            let ids = fields
                .iter()
                .map(|s| parse_usize(s, "gate"))
                .collect::<Result<Vec<usize>, _>>()?;
            let nin = kind.arity();
            if ids.len() != nin + 3 || ids[0] != nin || ids[1] != 1 {
                return Err(CircuitLoadError::ParsingError(anyhow!(
                    "Malformed {} gate: {}",
                    kind,
                    line
                )));
            }
            circ.register_gate(kind, &ids[2..2 + nin], ids[2 + nin])?;
        }
        if circ.ngates() != ngates {
            return Err(CircuitLoadError::ParsingError(anyhow!(
                "Expecting {} gates, parsed {}",
                ngates,
                circ.ngates()
            )));
        }

        circ.set_inputs(wires[..ninput_wires].to_vec())?;
        circ.set_outputs(wires[nwires - noutput_wires..].to_vec())?;
        debug!(
            ngates,
            nwires,
            nand = circ.nand,
            nxor = circ.nxor,
            "parsed bristol circuit"
        );
        Ok(circ)
    }

    /// Load a Bristol Fashion circuit from a file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CircuitLoadError> {
        let path = path.as_ref();
        let f = File::open(path)
            .with_context(|| format!("Failed to read circuit from {}", path.display()))?;
        Self::parse(BufReader::new(f))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::{bits_to_int, int_to_bits};

    /// 2-bit adder mod 4.
    const ADDER2: &str = "\
5 9
2 2 2
1 2

2 1 0 2 4 XOR
2 1 0 2 5 AND
2 1 1 3 6 XOR
2 1 6 5 7 XOR
1 1 4 8 INV
";

    #[test]
    fn test_parse_adder2() {
        let circ = Circuit::parse(ADDER2.as_bytes()).unwrap();
        assert_eq!(circ.ngates(), 5);
        assert_eq!(circ.nwires(), 9);
        assert_eq!(circ.inputs, vec![0, 1, 2, 3]);
        assert_eq!(circ.outputs, vec![7, 8]);
        assert_eq!((circ.nand, circ.nxor, circ.nnot), (1, 3, 1));

        // Outputs are [bit 1 of the sum, NOT bit 0 of the sum].
        for a in 0..4u128 {
            for b in 0..4u128 {
                let inputs = [int_to_bits(a, 2), int_to_bits(b, 2)].concat();
                let out = circ.eval(&inputs).unwrap();
                let sum = (a + b) % 4;
                assert_eq!(out, vec![sum >> 1 == 1, sum & 1 == 0], "{a} + {b}");
            }
        }
    }

    #[test]
    fn test_parse_or() {
        let text = "1 3\n2 1 1\n1 1\n2 1 0 1 2 OR\n";
        let circ = Circuit::parse(text.as_bytes()).unwrap();
        assert_eq!(circ.nor, 1);
        assert_eq!(bits_to_int(&circ.eval(&[true, false]).unwrap()), 1);
        assert_eq!(bits_to_int(&circ.eval(&[false, false]).unwrap()), 0);
    }

    #[test]
    fn test_parse_errors() {
        let bad_header = "1\n2 1 1\n1 1\n2 1 0 1 2 AND\n";
        assert!(matches!(
            Circuit::parse(bad_header.as_bytes()),
            Err(CircuitLoadError::ParsingError(_))
        ));

        let bad_gate = "1 3\n2 1 1\n1 1\n2 1 0 1 2 NAND\n";
        assert!(matches!(
            Circuit::parse(bad_gate.as_bytes()),
            Err(CircuitLoadError::ParsingError(_))
        ));

        let wrong_count = "2 3\n2 1 1\n1 1\n2 1 0 1 2 AND\n";
        assert!(matches!(
            Circuit::parse(wrong_count.as_bytes()),
            Err(CircuitLoadError::ParsingError(_))
        ));

        let out_of_range = "1 3\n2 1 1\n1 1\n2 1 0 7 2 AND\n";
        assert!(matches!(
            Circuit::parse(out_of_range.as_bytes()),
            Err(CircuitLoadError::Build(_))
        ));
    }

    #[test]
    fn test_parse_huge_widths() {
        let max = usize::MAX;
        let widths = format!("1 3\n2 {max} {max}\n1 1\n2 1 0 1 2 AND\n");
        assert!(matches!(
            Circuit::parse(widths.as_bytes()),
            Err(CircuitLoadError::ParsingError(_))
        ));

        let io = format!("1 3\n1 {max}\n1 1\n2 1 0 1 2 AND\n");
        assert!(matches!(
            Circuit::parse(io.as_bytes()),
            Err(CircuitLoadError::ParsingError(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        assert!(Circuit::load("no/such/circuit.txt").is_err());
    }
}
