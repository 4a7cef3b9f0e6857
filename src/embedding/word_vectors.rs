//! Read-only word-to-vector tables.
//!
//! A word-vector table maps normalized tokens to fixed-dimension numeric
//! vectors (typically pretrained, e.g. word2vec or GloVe). The table is
//! loaded once and only read afterwards; the aggregator never mutates it.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use ahash::AHashMap;

use crate::error::{Result, XystonError};

/// Trait for vocabulary tables exposing membership tests and vector lookup.
///
/// The two operations mirror how callers actually consume pretrained
/// vectors: check whether a token is known, then fetch its vector.
/// Implementations must guarantee that every vector returned by
/// [`vector_for`](WordVectors::vector_for) has exactly
/// [`dimension`](WordVectors::dimension) entries.
pub trait WordVectors: Send + Sync {
    /// Check whether the table contains a vector for `token`.
    fn contains(&self, token: &str) -> bool;

    /// Look up the vector for `token`, if present.
    fn vector_for(&self, token: &str) -> Option<&[f32]>;

    /// The dimension D shared by every vector in the table.
    fn dimension(&self) -> usize;

    /// Number of tokens in the table.
    fn len(&self) -> usize;

    /// Check if the table is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// An in-memory word-vector table backed by a hash map.
///
/// Construction validates that every vector has the table's dimension;
/// a mismatched entry is a configuration error and is rejected immediately
/// rather than surfacing later during encoding.
///
/// # Examples
///
/// ```
/// use xyston::embedding::word_vectors::{InMemoryWordVectors, WordVectors};
///
/// let table = InMemoryWordVectors::from_entries(vec![
///     ("cat".to_string(), vec![1.0, 0.0]),
///     ("dog".to_string(), vec![0.0, 1.0]),
/// ]).unwrap();
///
/// assert_eq!(table.dimension(), 2);
/// assert!(table.contains("cat"));
/// assert_eq!(table.vector_for("dog"), Some([0.0, 1.0].as_slice()));
/// assert!(table.vector_for("fish").is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryWordVectors {
    vectors: AHashMap<String, Vec<f32>>,
    dimension: usize,
}

impl InMemoryWordVectors {
    /// Create an empty table with a fixed dimension.
    pub fn new(dimension: usize) -> Self {
        Self {
            vectors: AHashMap::new(),
            dimension,
        }
    }

    /// Build a table from `(token, vector)` entries.
    ///
    /// The dimension is taken from the first entry; every other entry must
    /// match it. Duplicate tokens keep the last vector seen.
    pub fn from_entries<I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, Vec<f32>)>,
    {
        let mut iter = entries.into_iter();
        let (first_token, first_vector) = iter.next().ok_or_else(|| {
            XystonError::embedding("Cannot build a word-vector table from zero entries")
        })?;

        let mut table = Self::new(first_vector.len());
        table.insert(first_token, first_vector)?;
        for (token, vector) in iter {
            table.insert(token, vector)?;
        }
        Ok(table)
    }

    /// Insert a token vector, validating its dimension.
    pub fn insert(&mut self, token: String, vector: Vec<f32>) -> Result<()> {
        if vector.len() != self.dimension {
            return Err(XystonError::embedding(format!(
                "Vector for token '{}' has dimension {}, expected {}",
                token,
                vector.len(),
                self.dimension
            )));
        }
        self.vectors.insert(token, vector);
        Ok(())
    }

    /// Load a table from a word2vec/GloVe style text file.
    ///
    /// Each line holds a token followed by its vector components, separated
    /// by spaces. An optional first line with exactly two integers
    /// (`vocab_size dimension`, the word2vec text header) is skipped.
    pub fn load_text<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let reader = BufReader::new(file);

        let mut table: Option<InMemoryWordVectors> = None;
        for (line_no, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            let mut parts = line.split_whitespace();
            let token = parts
                .next()
                .ok_or_else(|| {
                    XystonError::embedding(format!("Line {}: missing token", line_no + 1))
                })?
                .to_string();

            let components: Vec<&str> = parts.collect();

            // word2vec text files start with a "vocab_size dimension" header
            if line_no == 0
                && components.len() == 1
                && token.parse::<usize>().is_ok()
                && components[0].parse::<usize>().is_ok()
            {
                continue;
            }

            let mut vector = Vec::with_capacity(components.len());
            for component in components {
                let value: f32 = component.parse().map_err(|_| {
                    XystonError::embedding(format!(
                        "Line {}: invalid vector component '{}'",
                        line_no + 1,
                        component
                    ))
                })?;
                vector.push(value);
            }

            if vector.is_empty() {
                return Err(XystonError::embedding(format!(
                    "Line {}: token '{}' has no vector components",
                    line_no + 1,
                    token
                )));
            }

            match table.as_mut() {
                Some(t) => t.insert(token, vector)?,
                None => {
                    let mut t = InMemoryWordVectors::new(vector.len());
                    t.insert(token, vector)?;
                    table = Some(t);
                }
            }
        }

        table.ok_or_else(|| XystonError::embedding("Word-vector file contains no entries"))
    }

    /// Iterate over `(token, vector)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[f32])> {
        self.vectors.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

impl WordVectors for InMemoryWordVectors {
    fn contains(&self, token: &str) -> bool {
        self.vectors.contains_key(token)
    }

    fn vector_for(&self, token: &str) -> Option<&[f32]> {
        self.vectors.get(token).map(|v| v.as_slice())
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn len(&self) -> usize {
        self.vectors.len()
    }
}
