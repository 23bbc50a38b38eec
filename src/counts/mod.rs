//! Per-taxon time-series sample data.
//!
//! The finalizer only needs a [CountsSource]: a lookup from leaf name to the
//! fraction of the population the taxon made up in each sample. [CountsMap]
//! implements it for condensed counts files, any `HashMap<String, Vec<f64>>`
//! does as well.
//!
//! # Format
//! A condensed counts file is comma-separated text:
//! * Line 1: taxon names, and nothing else.
//! * Every further non-empty line: `sample_id,count_0,...,count_n` with one
//!   non-negative integer count per taxon, so every row has one field more
//!   than the header.
//!
//! ```text
//! Bacteroides,Prevotella,Faecalibacterium
//! day_1,120,30,50
//! day_2,0,0,0
//! ```
//! Each count is divided by the total of its row, so the series of
//! `Bacteroides` above is `[0.6, 0.0]`.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, warn};

// =#========================================================================#=
// COUNTS SOURCE
// =#========================================================================#=
/// Lookup of per-sample population fractions by taxon name.
pub trait CountsSource {
    /// Returns the series of population fractions of `label`, one per sample,
    /// or `None` if the taxon is unknown.
    fn counts(&self, label: &str) -> Option<&[f64]>;

    /// Returns the number of samples.
    fn num_samples(&self) -> usize;
}

impl CountsSource for HashMap<String, Vec<f64>> {
    fn counts(&self, label: &str) -> Option<&[f64]> {
        self.get(label).map(Vec::as_slice)
    }

    /// Length of the longest series.
    fn num_samples(&self) -> usize {
        self.values().map(Vec::len).max().unwrap_or(0)
    }
}

// =#========================================================================#=
// COUNTS ERROR
// =#========================================================================#=
/// Errors that can occur while loading a condensed counts file.
#[derive(Error, Debug)]
pub enum CountsError {
    /// Reading the input failed
    #[error("IO error - {0}")]
    Io(#[from] std::io::Error),
    /// There is no line of taxon names
    #[error("Counts data is empty, expected a line of taxon names")]
    Empty,
    /// A row does not hold exactly one count per taxon
    #[error("Line {line}: expected {expected} counts, found {found}")]
    RowWidth {
        /// Line number (1-based) of the row
        line: usize,
        /// Number of taxa in the header
        expected: usize,
        /// Number of counts in the row
        found: usize,
    },
    /// A count is not a non-negative integer
    #[error("Line {line}: invalid count '{value}'")]
    InvalidCount {
        /// Line number (1-based) of the row
        line: usize,
        /// The offending field, trimmed
        value: String,
    },
}

// =#========================================================================#=
// COUNTS MAP
// =#========================================================================#=
/// Map from taxon name to its population fraction in each sample.
///
/// # Example
/// ```
/// use circlewick::counts::{CountsMap, CountsSource};
///
/// let counts: CountsMap = "A,B\ns1,3,1\ns2,0,2\n".parse().unwrap();
/// assert_eq!(counts.num_samples(), 2);
/// assert_eq!(counts.counts("A"), Some(&[0.75, 0.0][..]));
/// assert_eq!(counts.counts("C"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CountsMap {
    /// Taxon names in file order
    labels: Vec<String>,
    /// Sample ids in file order
    sample_ids: Vec<String>,
    /// Series per taxon, aligned with `labels`
    series: Vec<Vec<f64>>,
    /// Position of each taxon in `labels`
    index: HashMap<String, usize>,
}

impl CountsMap {
    /// Loads a condensed counts file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, CountsError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Reads condensed counts data line by line.
    ///
    /// # Returns
    /// * `Ok(CountsMap)` - Fractions per taxon and sample
    /// * `Err(CountsError)` - If reading fails, there is no header line, a
    ///   row has the wrong number of counts, or a count is not a
    ///   non-negative integer
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, CountsError> {
        let mut lines = reader.lines();

        let header = match lines.next() {
            Some(line) => line?,
            None => return Err(CountsError::Empty),
        };
        if header.trim().is_empty() {
            return Err(CountsError::Empty);
        }
        let labels: Vec<String> = header.split(',').map(|f| f.trim().to_string()).collect();

        let mut sample_ids = Vec::new();
        let mut series: Vec<Vec<f64>> = vec![Vec::new(); labels.len()];

        for (i, line) in lines.enumerate() {
            let line = line?;
            let line_number = i + 2;
            if line.trim().is_empty() {
                continue;
            }

            let mut fields = line.split(',');
            let sample_id = fields.next().unwrap_or_default().trim().to_string();
            let counts = fields
                .map(|value| parse_count(value, line_number))
                .collect::<Result<Vec<u64>, CountsError>>()?;

            if counts.len() != labels.len() {
                return Err(CountsError::RowWidth {
                    line: line_number,
                    expected: labels.len(),
                    found: counts.len(),
                });
            }

            let total: u64 = counts.iter().sum();
            for (taxon_series, count) in series.iter_mut().zip(&counts) {
                let fraction = if total == 0 {
                    0.0
                } else {
                    *count as f64 / total as f64
                };
                taxon_series.push(fraction);
            }
            sample_ids.push(sample_id);
        }

        let mut index = HashMap::with_capacity(labels.len());
        for (i, label) in labels.iter().enumerate() {
            if index.contains_key(label) {
                warn!(label = label.as_str(), "duplicate taxon in counts, keeping first");
                continue;
            }
            index.insert(label.clone(), i);
        }

        debug!(
            num_labels = labels.len(),
            num_samples = sample_ids.len(),
            "loaded counts"
        );
        Ok(CountsMap {
            labels,
            sample_ids,
            series,
            index,
        })
    }

    /// Returns the taxon names in file order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Returns the number of taxa.
    pub fn num_labels(&self) -> usize {
        self.labels.len()
    }

    /// Returns the sample ids in file order.
    pub fn sample_ids(&self) -> &[String] {
        &self.sample_ids
    }
}

impl CountsSource for CountsMap {
    fn counts(&self, label: &str) -> Option<&[f64]> {
        self.index.get(label).map(|&i| self.series[i].as_slice())
    }

    fn num_samples(&self) -> usize {
        self.sample_ids.len()
    }
}

impl FromStr for CountsMap {
    type Err = CountsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_reader(s.as_bytes())
    }
}

fn parse_count(value: &str, line: usize) -> Result<u64, CountsError> {
    value.trim().parse().map_err(|_| CountsError::InvalidCount {
        line,
        value: value.trim().to_string(),
    })
}
