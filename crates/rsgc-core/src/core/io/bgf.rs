use crate::core::io::traits::MolecularFile;
use crate::core::models::atom::Atom;
use crate::core::models::cell::UnitCell;
use crate::core::models::molecule::Molecule;
use crate::core::models::structure::{MoleculeEntry, Structure};
use crate::core::utils::elements::{atomic_mass, normalize_symbol};
use nalgebra::Point3;
use std::collections::HashMap;
use std::io::{self, BufRead, Write};
use thiserror::Error;

const FORMAT_ATOM: &str =
    "FORMAT ATOM   (a6,1x,i5,1x,a5,1x,a3,1x,a1,1x,a5,3f10.5,1x,a5,i3,i2,1x,f8.5)";
const FORMAT_CONECT: &str = "FORMAT CONECT (a6,12i6)";
const DEFAULT_HEADER: [&str; 2] = ["BIOGRF  200", "REMARK Side chains stripped by rsgc"];
/// Atom records must reach the end of the force-field type column.
const MIN_ATOM_LINE_LEN: usize = 66;
const CONECT_PARTNERS_PER_LINE: usize = 12;

/// Header records (everything before the atoms that is not a cell or format line).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BgfMetadata {
    pub header_lines: Vec<String>,
}

#[derive(Debug, Error)]
pub enum BgfError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse {
        line: usize,
        kind: BgfParseErrorKind,
    },
    #[error("Inconsistent data: {0}")]
    Inconsistency(String),
    #[error("Missing required record: {0}")]
    MissingRecord(String),
}

#[derive(Debug, Error)]
pub enum BgfParseErrorKind {
    #[error("Invalid integer format in columns {columns} (value: '{value}')")]
    InvalidInt { columns: String, value: String },
    #[error("Invalid float format in columns {columns} (value: '{value}')")]
    InvalidFloat { columns: String, value: String },
    #[error("Required field in columns {columns} is empty")]
    MissingRequiredField { columns: String },
    #[error("Line is too short for ATOM/HETATM record (must be at least 66 chars)")]
    LineTooShort,
    #[error("CRYSTX record needs six numbers describing a valid cell")]
    InvalidCell,
}

/// Columns past the end of a short line read as blank.
fn slice_and_trim(line: &str, start: usize, end: usize) -> &str {
    line.get(start..end.min(line.len())).unwrap_or("").trim()
}

fn parse_int<T: std::str::FromStr>(value: &str, line: usize, columns: &str) -> Result<T, BgfError> {
    value.parse().map_err(|_| BgfError::Parse {
        line,
        kind: BgfParseErrorKind::InvalidInt {
            columns: columns.into(),
            value: value.into(),
        },
    })
}

fn parse_float(value: &str, line: usize, columns: &str) -> Result<f64, BgfError> {
    value.parse().map_err(|_| BgfError::Parse {
        line,
        kind: BgfParseErrorKind::InvalidFloat {
            columns: columns.into(),
            value: value.into(),
        },
    })
}

fn known_element(candidate: &str) -> Option<String> {
    let symbol = normalize_symbol(candidate);
    atomic_mass(&symbol).map(|_| symbol)
}

/// Element symbol from the force-field type prefix ("C_R" -> C), falling back to
/// the leading letters of the atom name ("CL3" -> Cl, "C12" -> C).
pub fn infer_element(force_field_type: &str, name: &str) -> String {
    let ff_prefix = force_field_type.split('_').next().unwrap_or("");
    if let Some(symbol) = known_element(ff_prefix) {
        return symbol;
    }
    let letters: String = name.chars().take_while(char::is_ascii_alphabetic).collect();
    [letters.get(..2), letters.get(..1)]
        .into_iter()
        .flatten()
        .find_map(known_element)
        .unwrap_or_else(|| normalize_symbol(if ff_prefix.is_empty() { name } else { ff_prefix }))
}

struct PendingMolecule {
    residue_name: String,
    chain_id: char,
    residue_number: isize,
    atoms: Vec<Atom>,
}

fn parse_cell(line: &str, line_num: usize) -> Result<UnitCell, BgfError> {
    let invalid = || BgfError::Parse {
        line: line_num,
        kind: BgfParseErrorKind::InvalidCell,
    };
    let values = line
        .split_whitespace()
        .skip(1)
        .take(6)
        .map(|v| parse_float(v, line_num, "CRYSTX"))
        .collect::<Result<Vec<_>, _>>()?;
    let [a, b, c, alpha, beta, gamma] = values[..] else {
        return Err(invalid());
    };
    UnitCell::from_parameters(a, b, c, alpha, beta, gamma).ok_or_else(invalid)
}

pub struct BgfFile;

impl MolecularFile for BgfFile {
    type Metadata = BgfMetadata;
    type Error = BgfError;

    fn read_from(reader: &mut impl BufRead) -> Result<(Structure, Self::Metadata), Self::Error> {
        let mut metadata = BgfMetadata::default();
        let mut cell = None;
        let mut molecules: Vec<PendingMolecule> = Vec::new();
        let mut molecule_of_group: HashMap<(char, isize), usize> = HashMap::new();
        let mut atom_of_serial: HashMap<usize, (usize, usize)> = HashMap::new();
        let mut bonds: Vec<(usize, usize, usize)> = Vec::new();

        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let line_num = line_num + 1;
            let record_type = slice_and_trim(&line, 0, 6);

            match record_type {
                "ATOM" | "HETATM" => {
                    if line.len() < MIN_ATOM_LINE_LEN {
                        return Err(BgfError::Parse {
                            line: line_num,
                            kind: BgfParseErrorKind::LineTooShort,
                        });
                    }
                    let name = slice_and_trim(&line, 13, 18);
                    if name.is_empty() {
                        return Err(BgfError::Parse {
                            line: line_num,
                            kind: BgfParseErrorKind::MissingRequiredField {
                                columns: "14-18".into(),
                            },
                        });
                    }
                    let serial: usize = parse_int(slice_and_trim(&line, 7, 12), line_num, "8-12")?;
                    let residue_name = slice_and_trim(&line, 19, 22);
                    let chain_id = slice_and_trim(&line, 23, 24).chars().next().unwrap_or('A');
                    let residue_number: isize =
                        parse_int(slice_and_trim(&line, 25, 30), line_num, "26-30")?;
                    let x = parse_float(slice_and_trim(&line, 30, 40), line_num, "31-40")?;
                    let y = parse_float(slice_and_trim(&line, 40, 50), line_num, "41-50")?;
                    let z = parse_float(slice_and_trim(&line, 50, 60), line_num, "51-60")?;
                    let ff_type = slice_and_trim(&line, 61, 66);

                    let group = *molecule_of_group
                        .entry((chain_id, residue_number))
                        .or_insert_with(|| {
                            molecules.push(PendingMolecule {
                                residue_name: residue_name.to_string(),
                                chain_id,
                                residue_number,
                                atoms: Vec::new(),
                            });
                            molecules.len() - 1
                        });
                    let atoms = &mut molecules[group].atoms;
                    if atom_of_serial.insert(serial, (group, atoms.len())).is_some() {
                        return Err(BgfError::Inconsistency(format!(
                            "Duplicate atom serial: {serial}"
                        )));
                    }
                    atoms.push(
                        Atom::new(&infer_element(ff_type, name), Point3::new(x, y, z))
                            .with_name(name)
                            .with_force_field_type(ff_type),
                    );
                }
                "CONECT" => {
                    let serials = line
                        .split_whitespace()
                        .skip(1)
                        .map(|s| parse_int::<usize>(s, line_num, "CONECT"))
                        .collect::<Result<Vec<_>, _>>()?;
                    if let Some((&base, partners)) = serials.split_first() {
                        bonds.extend(partners.iter().map(|&p| (base, p, line_num)));
                    }
                }
                "CRYSTX" => cell = Some(parse_cell(&line, line_num)?),
                "FORMAT" | "ORDER" => {}
                "END" => break,
                _ => {
                    if !line.trim().is_empty() {
                        metadata.header_lines.push(line);
                    }
                }
            }
        }

        if atom_of_serial.is_empty() {
            return Err(BgfError::MissingRecord("ATOM/HETATM records".into()));
        }

        let mut built: Vec<Molecule> = Vec::with_capacity(molecules.len());
        let mut pending_bonds: Vec<Vec<(usize, usize)>> = vec![Vec::new(); molecules.len()];
        for (a, b, line) in bonds {
            let lookup = |serial: usize| {
                atom_of_serial.get(&serial).copied().ok_or_else(|| {
                    BgfError::Inconsistency(format!(
                        "CONECT on line {line} references unknown atom serial {serial}"
                    ))
                })
            };
            let ((group_a, local_a), (group_b, local_b)) = (lookup(a)?, lookup(b)?);
            if group_a != group_b {
                return Err(BgfError::Inconsistency(format!(
                    "Bond {a}-{b} on line {line} connects two different molecules"
                )));
            }
            pending_bonds[group_a].push((local_a, local_b));
        }

        for (pending, bonds) in molecules.iter_mut().zip(pending_bonds) {
            let molecule = Molecule::from_parts(std::mem::take(&mut pending.atoms), bonds)
                .map_err(|e| {
                    BgfError::Inconsistency(format!(
                        "Residue {}{}: {e}",
                        pending.residue_name, pending.residue_number
                    ))
                })?;
            built.push(molecule);
        }

        let mut structure = Structure::new(cell);
        for (pending, molecule) in molecules.into_iter().zip(built) {
            structure.push(MoleculeEntry::new(
                &pending.residue_name,
                pending.chain_id,
                pending.residue_number,
                molecule,
            ));
        }
        Ok((structure, metadata))
    }

    fn write_to(
        structure: &Structure,
        metadata: &Self::Metadata,
        writer: &mut impl Write,
    ) -> Result<(), Self::Error> {
        if metadata.header_lines.is_empty() {
            for line in DEFAULT_HEADER {
                writeln!(writer, "{line}")?;
            }
        }
        for line in &metadata.header_lines {
            writeln!(writer, "{line}")?;
        }
        if let Some(cell) = &structure.cell {
            write!(writer, "CRYSTX ")?;
            for value in cell.parameters() {
                write!(writer, "{value:>11.5}")?;
            }
            writeln!(writer)?;
        }

        writeln!(writer, "{FORMAT_ATOM}")?;
        let mut first_serial = Vec::with_capacity(structure.molecules.len());
        let mut serial = 1;
        for entry in &structure.molecules {
            first_serial.push(serial);
            for atom in entry.molecule.atoms() {
                writeln!(
                    writer,
                    "{:<6} {:>5} {:<5} {:>3} {:1} {:>5}{:>10.5}{:>10.5}{:>10.5} {:<5}{:>3}{:>2} {:>8.5}",
                    "HETATM",
                    serial,
                    atom.name,
                    entry.residue_name,
                    entry.chain_id,
                    entry.residue_number,
                    atom.position.x,
                    atom.position.y,
                    atom.position.z,
                    atom.force_field_type,
                    0,
                    0,
                    0.0
                )?;
                serial += 1;
            }
        }

        writeln!(writer, "{FORMAT_CONECT}")?;
        for (entry, &offset) in structure.molecules.iter().zip(&first_serial) {
            for index in 0..entry.molecule.len() {
                let partners: Vec<usize> =
                    entry.molecule.neighbors(index).map(|n| n + offset).collect();
                let mut chunks = partners.chunks(CONECT_PARTNERS_PER_LINE).peekable();
                if chunks.peek().is_none() {
                    writeln!(writer, "CONECT{:>6}", index + offset)?;
                }
                for chunk in chunks {
                    write!(writer, "CONECT{:>6}", index + offset)?;
                    for partner in chunk {
                        write!(writer, "{partner:>6}")?;
                    }
                    writeln!(writer)?;
                }
            }
        }

        writeln!(writer, "END")?;
        Ok(())
    }
}
