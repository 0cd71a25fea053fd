use std::collections::{HashMap, HashSet, VecDeque};
use std::io::BufRead;
use std::path::Path;

use tracing::debug;

use crate::core::feature::Feature;
use crate::core::region::Region;
use crate::index::overlap::OverlapIndex;
use crate::parsing::io::open_input;
use crate::parsing::record::{is_comment, parse_line, ParseError, FASTA_DIRECTIVE};

/// In-memory feature store with id, hierarchy and overlap indexes
///
/// Features are addressed by their position in file order. A `Parent`
/// reference resolves to the first feature carrying that `ID`, so a later
/// feature reusing an `ID` has no children of its own.
pub struct FeatureIndex {
    /// All features in file order
    features: Vec<Feature>,

    /// Index: `ID` -> position of the first feature carrying it
    id_to_index: HashMap<String, usize>,

    /// Index: parent position -> positions of its direct children
    children: HashMap<usize, Vec<usize>>,

    /// Index: feature type -> positions
    type_to_indices: HashMap<String, Vec<usize>>,

    /// Index: seqid -> interval tree of positions
    overlaps: OverlapIndex,
}

impl FeatureIndex {
    /// Index a GTF/GFF3 file (plain or gzip)
    ///
    /// # Errors
    ///
    /// Returns `ParseError::Io` if the file cannot be read, or a parse error
    /// (with line number) for the first malformed data line.
    pub fn from_path(path: &Path) -> Result<Self, ParseError> {
        let reader = open_input(path)?;
        Self::from_reader(reader)
    }

    /// Index features from any buffered reader
    ///
    /// Comment and blank lines are skipped; reading stops at a `##FASTA` directive.
    ///
    /// # Errors
    ///
    /// Returns a parse error (with line number) for the first malformed data line.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, ParseError> {
        let mut features = Vec::new();

        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            if line.starts_with(FASTA_DIRECTIVE) {
                break;
            }
            if line.trim().is_empty() || is_comment(&line) {
                continue;
            }
            let record = parse_line(&line).map_err(|e| e.at_line(i + 1))?;
            features.push(record.feature);
        }

        Ok(Self::new(features))
    }

    /// Build all indexes over a list of features
    #[must_use]
    pub fn new(features: Vec<Feature>) -> Self {
        let mut id_to_index = HashMap::new();
        let mut type_to_indices: HashMap<String, Vec<usize>> = HashMap::new();

        for (i, feature) in features.iter().enumerate() {
            if let Some(id) = feature.id() {
                if id_to_index.contains_key(id) {
                    debug!("Duplicate feature ID '{id}', keeping the first occurrence");
                } else {
                    id_to_index.insert(id.to_string(), i);
                }
            }

            type_to_indices
                .entry(feature.feature_type.clone())
                .or_default()
                .push(i);
        }

        // Parents may appear after their children, so resolve once all IDs are known
        let mut children: HashMap<usize, Vec<usize>> = HashMap::new();
        for (i, feature) in features.iter().enumerate() {
            for parent in feature.parents() {
                match id_to_index.get(parent) {
                    Some(&p) => children.entry(p).or_default().push(i),
                    None => debug!("Parent '{parent}' not found"),
                }
            }
        }

        let overlaps = OverlapIndex::build(&features);

        debug!(
            "Indexed {} features ({} with IDs)",
            features.len(),
            id_to_index.len()
        );

        Self {
            features,
            id_to_index,
            children,
            type_to_indices,
            overlaps,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Fetch a feature by its `ID`
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Feature> {
        self.id_to_index.get(id).map(|&i| &self.features[i])
    }

    /// Fetch a feature by its position in file order
    #[must_use]
    pub fn at(&self, position: usize) -> Option<&Feature> {
        self.features.get(position)
    }

    /// Positions of features intersecting a region, in file order
    #[must_use]
    pub fn positions(&self, region: &Region) -> Vec<usize> {
        self.overlaps.query(region)
    }

    /// Features intersecting a region, or all features when `region` is `None`
    #[must_use]
    pub fn features(&self, region: Option<&Region>) -> Vec<&Feature> {
        match region {
            Some(region) => self
                .positions(region)
                .into_iter()
                .map(|i| &self.features[i])
                .collect(),
            None => self.features.iter().collect(),
        }
    }

    /// Features of one type, optionally restricted to a region
    #[must_use]
    pub fn features_of_type(&self, feature_type: &str, region: Option<&Region>) -> Vec<&Feature> {
        match region {
            Some(_) => self
                .features(region)
                .into_iter()
                .filter(|f| f.feature_type == feature_type)
                .collect(),
            None => self
                .type_to_indices
                .get(feature_type)
                .map(|indices| indices.iter().map(|&i| &self.features[i]).collect())
                .unwrap_or_default(),
        }
    }

    /// Direct children of the feature with the given `ID`
    #[must_use]
    pub fn children(&self, id: &str) -> Vec<&Feature> {
        self.id_to_index
            .get(id)
            .and_then(|p| self.children.get(p))
            .map(|indices| indices.iter().map(|&i| &self.features[i]).collect())
            .unwrap_or_default()
    }

    /// All descendants of the feature with the given `ID`, each reported once
    #[must_use]
    pub fn descendants(&self, id: &str) -> Vec<&Feature> {
        self.id_to_index
            .get(id)
            .map(|&p| self.descendants_at(p))
            .unwrap_or_default()
    }

    /// All descendants of the feature at a position, each reported once
    #[must_use]
    pub fn descendants_at(&self, position: usize) -> Vec<&Feature> {
        let mut seen: HashSet<usize> = HashSet::from([position]);
        let mut result = Vec::new();
        let mut queue: VecDeque<usize> = VecDeque::from([position]);

        while let Some(parent) = queue.pop_front() {
            let Some(indices) = self.children.get(&parent) else {
                continue;
            };
            for &i in indices {
                if seen.insert(i) {
                    result.push(&self.features[i]);
                    queue.push_back(i);
                }
            }
        }

        result
    }
}
