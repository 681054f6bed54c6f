//! # Indexed series
//!
//! Both the path (indexed by arc length) and the speed profile (indexed by time) are stored as a
//! sequence of samples with a strictly increasing scalar key. Values between samples are found by
//! interpolating the two samples which bracket the requested key.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::fmt;

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// A single sample in a series, which can be interpolated with its neighbour.
pub trait Sample: Clone {
    /// The value this sample is indexed by.
    fn key(&self) -> f64;

    /// Produce a new sample at `key`, which lies between `self.key()` and `other.key()`.
    ///
    /// The key of the returned sample must equal `key`.
    fn interpolate(&self, other: &Self, key: f64) -> Self;
}

/// A data source which can be queried by a scalar key.
pub trait IndexedSeries {
    /// The value produced by a lookup.
    type Value;

    /// Get the value at the given key.
    fn lookup(&self, key: f64) -> Result<Self::Value, LookupError>;

    /// The inclusive range of keys which can be looked up, or `None` if the series is empty.
    fn domain_bounds(&self) -> Option<(f64, f64)>;
}

// ------------------------------------------------------------------------------------------------
// DATA STRUCTURES
// ------------------------------------------------------------------------------------------------

/// An ordered, validated sequence of samples.
#[derive(Debug, Clone, PartialEq)]
pub struct Series<T> {
    kind: SeriesKind,
    samples: Vec<T>,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Which data source a series holds, used to identify the source in errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeriesKind {
    Path,
    Speed,
    Trajectory,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LookupError {
    #[error("Cannot look up {key} in the {series} series as it is empty")]
    Empty { series: SeriesKind, key: f64 },

    #[error("Key {key} is outside the {series} series domain [{lower}, {upper}]")]
    OutOfRange {
        series: SeriesKind,
        key: f64,
        lower: f64,
        upper: f64,
    },
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SeriesError {
    #[error("Attempted to create a {0} series from an empty sequence")]
    Empty(SeriesKind),

    #[error("The {series} series must start at a key of 0, found {key}")]
    NonZeroStart { series: SeriesKind, key: f64 },

    #[error("The {series} series contains a non-finite key at index {index}")]
    NonFiniteKey { series: SeriesKind, index: usize },

    #[error(
        "The {series} series key at index {index} ({key}) does not increase on the previous key \
        ({prev})"
    )]
    NotStrictlyIncreasing {
        series: SeriesKind,
        index: usize,
        prev: f64,
        key: f64,
    },
}

// ------------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// ------------------------------------------------------------------------------------------------

impl fmt::Display for SeriesKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeriesKind::Path => write!(f, "path"),
            SeriesKind::Speed => write!(f, "speed"),
            SeriesKind::Trajectory => write!(f, "trajectory"),
        }
    }
}

impl<T: Sample> Series<T> {
    /// Create a new series, checking that it is non-empty and that its keys are finite and
    /// strictly increasing.
    pub fn new(kind: SeriesKind, samples: Vec<T>) -> Result<Self, SeriesError> {
        if samples.is_empty() {
            return Err(SeriesError::Empty(kind));
        }

        for (index, sample) in samples.iter().enumerate() {
            let key = sample.key();
            if !key.is_finite() {
                return Err(SeriesError::NonFiniteKey {
                    series: kind,
                    index,
                });
            }

            if index > 0 {
                let prev = samples[index - 1].key();
                if key <= prev {
                    return Err(SeriesError::NotStrictlyIncreasing {
                        series: kind,
                        index,
                        prev,
                        key,
                    });
                }
            }
        }

        Ok(Self { kind, samples })
    }

    /// Create a new series whose domain starts at zero, as well as meeting the requirements of
    /// [`Series::new`].
    ///
    /// Since keys are strictly increasing this also means no negative key can be looked up.
    pub fn new_from_zero(kind: SeriesKind, samples: Vec<T>) -> Result<Self, SeriesError> {
        let series = Self::new(kind, samples)?;

        match series.front().map(|p| p.key()) {
            Some(key) if key != 0.0 => Err(SeriesError::NonZeroStart { series: kind, key }),
            _ => Ok(series),
        }
    }

    /// Create a series with no samples. All lookups on it will fail.
    pub fn empty(kind: SeriesKind) -> Self {
        Self {
            kind,
            samples: Vec::new(),
        }
    }

    pub fn kind(&self) -> SeriesKind {
        self.kind
    }

    pub fn samples(&self) -> &[T] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn front(&self) -> Option<&T> {
        self.samples.first()
    }

    pub fn back(&self) -> Option<&T> {
        self.samples.last()
    }
}

impl<T: Sample> IndexedSeries for Series<T> {
    type Value = T;

    fn lookup(&self, key: f64) -> Result<T, LookupError> {
        interpolate_at(self.kind, &self.samples, key)
    }

    fn domain_bounds(&self) -> Option<(f64, f64)> {
        match (self.samples.first(), self.samples.last()) {
            (Some(f), Some(l)) => Some((f.key(), l.key())),
            _ => None,
        }
    }
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Find the sample at `key` in a slice of samples sorted by strictly increasing key.
///
/// Exact matches return the stored sample, keys between two samples are interpolated, and keys
/// outside the first and last sample (or NaN) are rejected.
pub fn interpolate_at<T: Sample>(
    series: SeriesKind,
    samples: &[T],
    key: f64,
) -> Result<T, LookupError> {
    let (first, last) = match (samples.first(), samples.last()) {
        (Some(f), Some(l)) => (f, l),
        _ => return Err(LookupError::Empty { series, key }),
    };

    // Written this way round so NaN keys are caught too
    if !(key >= first.key() && key <= last.key()) {
        return Err(LookupError::OutOfRange {
            series,
            key,
            lower: first.key(),
            upper: last.key(),
        });
    }

    // Index of the first sample whose key is not less than the requested one. Since key <=
    // last.key() this is always a valid index.
    let upper_idx = samples.partition_point(|p| p.key() < key);
    let upper = &samples[upper_idx];

    if upper_idx == 0 || upper.key() == key {
        return Ok(upper.clone());
    }

    Ok(samples[upper_idx - 1].interpolate(upper, key))
}
