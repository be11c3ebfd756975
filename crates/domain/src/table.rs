use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

use crate::DomainError;

/// Time-frequency energy readings for one recording.
///
/// Row `i` holds the energy at `frequencies[i]`, column `j` is one time step.
#[derive(Clone, Debug, PartialEq)]
pub struct EnergyTable {
    frequencies: Array1<f64>,
    energy: Array2<f64>,
}

impl EnergyTable {
    pub fn new(frequencies: Array1<f64>, energy: Array2<f64>) -> Result<Self, DomainError> {
        if energy.nrows() == 0 {
            return Err(DomainError::malformed("table has no frequency rows"));
        }
        if energy.ncols() == 0 {
            return Err(DomainError::malformed("table has no energy columns"));
        }
        if frequencies.len() != energy.nrows() {
            return Err(DomainError::malformed(format!(
                "{} frequencies for {} energy rows",
                frequencies.len(),
                energy.nrows()
            )));
        }
        Ok(Self {
            frequencies,
            energy,
        })
    }

    /// Parses comma-separated text. The first column is the frequency, the
    /// rest are energy readings. A leading non-numeric row is taken as a
    /// header and skipped.
    pub fn parse(text: &str) -> Result<Self, DomainError> {
        let mut header_width: Option<usize> = None;
        let mut width: Option<usize> = None;
        let mut values: Vec<f64> = Vec::new();
        let mut rows = 0usize;

        for (index, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }
            let line_no = index + 1;
            let cells: Vec<&str> = line.split(',').map(str::trim).collect();
            let parsed: Vec<Option<f64>> = cells.iter().map(|c| c.parse::<f64>().ok()).collect();

            if let Some(column) = parsed.iter().position(Option::is_none) {
                if rows == 0 && header_width.is_none() {
                    header_width = Some(cells.len());
                    continue;
                }
                return Err(DomainError::malformed(format!(
                    "line {line_no}, column {}: {:?} is not a number",
                    column + 1,
                    cells[column]
                )));
            }

            let expected = width.or(header_width).unwrap_or(cells.len());
            if cells.len() != expected {
                return Err(DomainError::malformed(format!(
                    "line {line_no}: expected {expected} columns, found {}",
                    cells.len()
                )));
            }
            width = Some(expected);
            values.extend(parsed.into_iter().flatten());
            rows += 1;
        }

        let width = width.ok_or_else(|| DomainError::malformed("table has no data rows"))?;
        if width < 2 {
            return Err(DomainError::malformed("table has no energy columns"));
        }
        let grid = Array2::from_shape_vec((rows, width), values)
            .map_err(|err| DomainError::malformed(err.to_string()))?;
        let frequencies = grid.column(0).to_owned();
        let energy = grid.slice(ndarray::s![.., 1..]).to_owned();
        Self::new(frequencies, energy)
    }

    pub fn frequencies(&self) -> ArrayView1<'_, f64> {
        self.frequencies.view()
    }

    pub fn energy(&self) -> ArrayView2<'_, f64> {
        self.energy.view()
    }

    pub fn bins(&self) -> usize {
        self.energy.nrows()
    }

    pub fn frames(&self) -> usize {
        self.energy.ncols()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn parses_table_with_header() {
        let text = "freq,t0,t1\n100,1.0,0.0\n200,0.5,2.0\n";
        let table = EnergyTable::parse(text).unwrap();
        assert_eq!(table.frequencies(), array![100.0, 200.0]);
        assert_eq!(table.energy(), array![[1.0, 0.0], [0.5, 2.0]]);
        assert_eq!(table.frames(), 2);
    }

    #[test]
    fn parses_headerless_table_and_skips_blank_lines() {
        let text = "100, 1\r\n\n200, 3\r\n";
        let table = EnergyTable::parse(text).unwrap();
        assert_eq!(table.bins(), 2);
        assert_eq!(table.energy(), array![[1.0], [3.0]]);
    }

    #[test]
    fn rejects_non_numeric_cell_after_header() {
        let text = "freq,t0\n100,1.0\n200,loud\n";
        let err = EnergyTable::parse(text).unwrap_err();
        assert!(err.to_string().contains("line 3"));
    }

    #[test]
    fn rejects_ragged_rows() {
        let text = "freq,t0,t1\n100,1.0\n";
        assert!(matches!(
            EnergyTable::parse(text),
            Err(DomainError::MalformedTable(_))
        ));
    }

    #[test]
    fn rejects_frequency_only_table() {
        assert!(EnergyTable::parse("freq\n100\n200\n").is_err());
        assert!(EnergyTable::parse("freq,t0\n").is_err());
    }

    #[test]
    fn new_checks_frequency_length() {
        let result = EnergyTable::new(array![1.0], array![[1.0], [2.0]]);
        assert!(result.is_err());
    }
}
