use crate::error::TableError;
use std::collections::{HashMap, HashSet};

pub const REF_COLUMN: &str = "ref";
pub const PRESENT_IN_COLUMN: &str = "presentIn";
pub const DESCRIPTION_COLUMN: &str = "description";

/// A single table cell. Empty spreadsheet cells and empty delimited fields are `None`.
pub type Cell = Option<String>;

/// How sample columns are told apart from metadata columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SampleSelection {
    /// Any column whose name contains a `-` is a sample.
    #[default]
    HyphenConvention,
    /// Exactly these columns are samples; every name must exist in the table.
    Explicit(Vec<String>),
}

impl SampleSelection {
    pub fn from_columns(columns: Option<&[String]>) -> Self {
        match columns {
            Some(columns) => SampleSelection::Explicit(columns.to_vec()),
            None => SampleSelection::HyphenConvention,
        }
    }
}

/// One row of the comparison table.
#[derive(Debug, Clone)]
pub struct Site {
    reference: Cell,
    present_in: Option<usize>,
    description: Cell,
    calls: Vec<Cell>,
    metadata: Vec<Cell>,
}

impl Site {
    pub fn reference(&self) -> Option<&str> {
        self.reference.as_deref()
    }

    /// Number of samples carrying the variant. `None` when the cell is
    /// missing or not a whole number.
    pub fn present_in(&self) -> Option<usize> {
        self.present_in
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Call for the sample at `sample_index` (as returned by
    /// [`ComparisonTable::sample_column`]).
    pub fn call(&self, sample_index: usize) -> Option<&str> {
        self.calls.get(sample_index).and_then(|c| c.as_deref())
    }

    pub fn metadata(&self, column_index: usize) -> Option<&str> {
        self.metadata.get(column_index).and_then(|c| c.as_deref())
    }

    /// True when the sample's state differs from the reference state.
    /// A missing value on either side never compares equal.
    pub fn differs_from_reference(&self, sample_index: usize) -> bool {
        match (self.call(sample_index), self.reference()) {
            (Some(call), Some(reference)) => call != reference,
            _ => true,
        }
    }
}

/// The "variant comparison" table: one row per site, one column per sample.
#[derive(Debug, Clone)]
pub struct ComparisonTable {
    samples: Vec<String>,
    sample_index: HashMap<String, usize>,
    metadata_columns: Vec<String>,
    sites: Vec<Site>,
}

impl ComparisonTable {
    /// Builds a table from a header row and data rows. Rows shorter than the
    /// header are padded with missing cells.
    pub fn from_rows<I>(
        headers: Vec<String>,
        rows: I,
        selection: &SampleSelection,
    ) -> Result<Self, TableError>
    where
        I: IntoIterator<Item = Vec<Cell>>,
    {
        let mut seen = HashSet::new();
        for header in &headers {
            if !header.is_empty() && !seen.insert(header.as_str()) {
                return Err(TableError::DuplicateColumn(header.clone()));
            }
        }

        let position = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| TableError::MissingColumn(name.to_string()))
        };
        let ref_idx = position(REF_COLUMN)?;
        let present_idx = position(PRESENT_IN_COLUMN)?;
        let description_idx = position(DESCRIPTION_COLUMN)?;

        let sample_columns: Vec<usize> = match selection {
            SampleSelection::HyphenConvention => headers
                .iter()
                .enumerate()
                .filter(|(_, h)| h.contains('-'))
                .map(|(i, _)| i)
                .collect(),
            SampleSelection::Explicit(names) => {
                let mut requested = HashSet::new();
                let mut columns = Vec::with_capacity(names.len());
                for name in names {
                    if [REF_COLUMN, PRESENT_IN_COLUMN, DESCRIPTION_COLUMN].contains(&name.as_str())
                        || !requested.insert(name.as_str())
                    {
                        return Err(TableError::InvalidSampleColumn(name.clone()));
                    }
                    let idx = headers
                        .iter()
                        .position(|h| h == name)
                        .ok_or_else(|| TableError::UnknownSample(name.clone()))?;
                    columns.push(idx);
                }
                columns
            }
        };

        let metadata_columns: Vec<usize> = (0..headers.len())
            .filter(|i| !sample_columns.contains(i))
            .collect();

        let take = |row: &[Cell], idx: usize| row.get(idx).cloned().flatten();

        let sites = rows
            .into_iter()
            .map(|row| Site {
                reference: take(&row, ref_idx),
                present_in: take(&row, present_idx).as_deref().and_then(parse_count),
                description: take(&row, description_idx),
                calls: sample_columns.iter().map(|&i| take(&row, i)).collect(),
                metadata: metadata_columns.iter().map(|&i| take(&row, i)).collect(),
            })
            .collect();

        let samples: Vec<String> = sample_columns.iter().map(|&i| headers[i].clone()).collect();
        let sample_index = samples
            .iter()
            .enumerate()
            .map(|(i, s)| (s.clone(), i))
            .collect();

        Ok(ComparisonTable {
            samples,
            sample_index,
            metadata_columns: metadata_columns.iter().map(|&i| headers[i].clone()).collect(),
            sites,
        })
    }

    pub fn samples(&self) -> &[String] {
        &self.samples
    }

    pub fn metadata_columns(&self) -> &[String] {
        &self.metadata_columns
    }

    pub fn sites(&self) -> &[Site] {
        &self.sites
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    /// Index of a sample column, usable with [`Site::call`].
    pub fn sample_column(&self, sample: &str) -> Result<usize, TableError> {
        self.sample_index
            .get(sample)
            .copied()
            .ok_or_else(|| TableError::UnknownSample(sample.to_string()))
    }
}

fn parse_count(value: &str) -> Option<usize> {
    let value = value.trim().parse::<f64>().ok()?;
    if value.is_finite() && value >= 0.0 && value.fract() == 0.0 {
        Some(value as usize)
    } else {
        None
    }
}
