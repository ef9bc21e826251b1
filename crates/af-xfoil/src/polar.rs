//! Polar table parsing and efficiency metrics.

use std::fs;
use std::io;

use af_core::Real;
use serde::{Deserialize, Serialize};

use crate::error::{PolarFormatError, XfoilError, XfoilResult};
use crate::workspace::Workspace;

/// Lines preceding the data rows in an XFOIL polar file.
pub const POLAR_HEADER_LINES: usize = 12;

const REQUIRED_COLUMNS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolarRow {
    pub alpha: Real,
    pub cl: Real,
    pub cd: Real,
}

impl PolarRow {
    pub fn efficiency(&self) -> Real {
        self.cl / self.cd
    }
}

/// Data rows of a polar file; never empty, drag always positive.
#[derive(Debug, Clone, PartialEq)]
pub struct PolarTable {
    rows: Vec<PolarRow>,
}

impl PolarTable {
    /// Parse polar file text, skipping the fixed header.
    ///
    /// Blank lines are ignored. Only the first three columns are read; any
    /// further columns (CDp, CM, transition points) are ignored.
    pub fn parse_str(text: &str) -> Result<Self, PolarFormatError> {
        let mut rows = Vec::new();
        for (idx, line) in text.lines().enumerate().skip(POLAR_HEADER_LINES) {
            let line_no = idx + 1;
            let tokens: Vec<&str> = line.split_whitespace().collect();
            if tokens.is_empty() {
                continue;
            }
            if tokens.len() < REQUIRED_COLUMNS {
                return Err(PolarFormatError::MissingColumns {
                    line: line_no,
                    expected: REQUIRED_COLUMNS,
                    found: tokens.len(),
                });
            }
            let alpha = parse_value(tokens[0], line_no, "alpha")?;
            let cl = parse_value(tokens[1], line_no, "CL")?;
            let cd = parse_value(tokens[2], line_no, "CD")?;
            if cd <= 0.0 {
                return Err(PolarFormatError::NonPositiveDrag { line: line_no, cd });
            }
            rows.push(PolarRow { alpha, cl, cd });
        }
        if rows.is_empty() {
            return Err(PolarFormatError::Empty);
        }
        Ok(Self { rows })
    }

    pub fn rows(&self) -> &[PolarRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn parse_value(token: &str, line: usize, column: &'static str) -> Result<Real, PolarFormatError> {
    let value: Real = token.parse().map_err(|_| PolarFormatError::NotNumeric {
        line,
        token: token.to_string(),
    })?;
    if !value.is_finite() {
        return Err(PolarFormatError::NonFinite { line, column });
    }
    Ok(value)
}

/// Aerodynamic performance over the swept angles of attack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceRecord {
    pub alpha: Vec<Real>,
    pub cl: Vec<Real>,
    pub cd: Vec<Real>,
    pub efficiency: Vec<Real>,
    pub max_efficiency: Real,
    pub alpha_at_max_efficiency: Real,
}

impl PerformanceRecord {
    /// Efficiency per row and its maximum; ties go to the first row.
    pub fn from_table(table: &PolarTable) -> Self {
        let rows = table.rows();
        let efficiency: Vec<Real> = rows.iter().map(PolarRow::efficiency).collect();

        let mut best = 0;
        for (i, &e) in efficiency.iter().enumerate().skip(1) {
            if e > efficiency[best] {
                best = i;
            }
        }

        Self {
            alpha: rows.iter().map(|r| r.alpha).collect(),
            cl: rows.iter().map(|r| r.cl).collect(),
            cd: rows.iter().map(|r| r.cd).collect(),
            max_efficiency: efficiency[best],
            alpha_at_max_efficiency: rows[best].alpha,
            efficiency,
        }
    }

    pub fn len(&self) -> usize {
        self.alpha.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alpha.is_empty()
    }
}

/// Read the polar table a solver run left in `workspace`.
pub fn parse(workspace: &Workspace) -> XfoilResult<PerformanceRecord> {
    let path = workspace.polar_path();
    let text = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(XfoilError::ResultUnavailable { path });
        }
        Err(e) => {
            return Err(XfoilError::MalformedResult {
                path,
                source: PolarFormatError::Unreadable(e.to_string()),
            });
        }
    };
    let table = PolarTable::parse_str(&text)
        .map_err(|source| XfoilError::MalformedResult { path, source })?;
    Ok(PerformanceRecord::from_table(&table))
}
