// In-memory word-vector table loaded from a word2vec text file.
//
// Format: an optional "<count> <dimension>" header, then one line per word:
// the word followed by `dimension` floats, space separated. Files ending in
// .gz are decompressed on the fly. Vectors are scaled to unit length at load
// time so distances between them compare directions, not magnitudes.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use tracing::{debug, info};

use super::registry::ModelError;

/// Read-only lookup from vocabulary word to unit-length vector.
#[derive(Debug, Clone)]
pub struct WordVectors {
    index: HashMap<String, usize>,
    /// Row-major, `index.len() * dimension` values
    data: Vec<f32>,
    dimension: usize,
}

impl WordVectors {
    /// Load a vector file, keeping at most `limit` words when given.
    pub fn load(path: &Path, limit: Option<usize>) -> Result<Self> {
        let file =
            File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;

        let is_gzip = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("gz"));

        let vectors = if is_gzip {
            Self::from_reader(BufReader::new(GzDecoder::new(BufReader::new(file))), limit)
        } else {
            Self::from_reader(BufReader::new(file), limit)
        }
        .with_context(|| format!("Failed to load word vectors from {}", path.display()))?;

        info!(
            words = vectors.len(),
            dimension = vectors.dimension(),
            path = %path.display(),
            "Loaded word vectors"
        );
        Ok(vectors)
    }

    /// Parse word2vec text format from any buffered reader.
    pub fn from_reader<R: BufRead>(mut reader: R, limit: Option<usize>) -> Result<Self> {
        let limit = limit.unwrap_or(usize::MAX);
        let mut index = HashMap::new();
        let mut data = Vec::new();
        let mut dimension: Option<usize> = None;
        let mut buf = Vec::new();
        let mut line_no = 0;

        while index.len() < limit {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            line_no += 1;

            // GloVe vocabularies contain a few byte sequences that aren't UTF-8
            let line = String::from_utf8_lossy(&buf);
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.is_empty() {
                continue;
            }

            if line_no == 1 && is_header(&fields) {
                dimension = fields[1].parse().ok();
                continue;
            }

            let dim = *dimension.get_or_insert(fields.len() - 1);
            if dim == 0 || fields.len() < dim + 1 {
                return Err(ModelError::Malformed {
                    line: line_no,
                    reason: format!("expected a word and {dim} values, found {} fields", fields.len()),
                }
                .into());
            }

            let split = fields.len() - dim;
            let word = fields[..split].join(" ");
            if index.contains_key(&word) {
                debug!(word = %word, line = line_no, "Skipping duplicate word");
                continue;
            }

            let mut vector = Vec::with_capacity(dim);
            for value in &fields[split..] {
                let parsed: f32 = value.parse().map_err(|_| ModelError::Malformed {
                    line: line_no,
                    reason: format!("invalid number {value:?}"),
                })?;
                vector.push(parsed);
            }
            normalize(&mut vector);

            index.insert(word, index.len());
            data.extend_from_slice(&vector);
        }

        match dimension {
            Some(dimension) if !index.is_empty() => Ok(Self {
                index,
                data,
                dimension,
            }),
            _ => Err(ModelError::Empty.into()),
        }
    }

    /// Build a table from (word, vector) pairs. All vectors must share a dimension.
    pub fn from_entries<I, S>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Vec<f32>)>,
        S: Into<String>,
    {
        let mut index = HashMap::new();
        let mut data = Vec::new();
        let mut dimension = None;

        for (position, (word, mut vector)) in entries.into_iter().enumerate() {
            let dim = *dimension.get_or_insert(vector.len());
            if vector.len() != dim || dim == 0 {
                return Err(ModelError::Malformed {
                    line: position + 1,
                    reason: format!("expected {dim} values, found {}", vector.len()),
                }
                .into());
            }
            let word = word.into();
            if index.contains_key(&word) {
                continue;
            }
            normalize(&mut vector);
            index.insert(word, index.len());
            data.extend_from_slice(&vector);
        }

        match dimension {
            Some(dimension) => Ok(Self {
                index,
                data,
                dimension,
            }),
            None => Err(ModelError::Empty.into()),
        }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.index.contains_key(word)
    }

    /// The unit-length vector for a word, if it is in the vocabulary.
    pub fn get(&self, word: &str) -> Option<&[f32]> {
        self.index.get(word).map(|&row| {
            let start = row * self.dimension;
            &self.data[start..start + self.dimension]
        })
    }
}

/// Lowercase and split on whitespace. No stemming or punctuation stripping.
pub fn tokenize(sentence: &str) -> Vec<String> {
    sentence
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

fn is_header(fields: &[&str]) -> bool {
    fields.len() == 2 && fields.iter().all(|f| f.parse::<usize>().is_ok())
}

/// Scale to unit length. Zero vectors are left as they are.
fn normalize(vector: &mut [f32]) {
    let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm > f32::EPSILON {
        for v in vector.iter_mut() {
            *v /= norm;
        }
    }
}
