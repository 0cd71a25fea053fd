use std::collections::{BTreeMap, BTreeSet, HashSet};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::classify::duplicates::GeneGroups;
use crate::classify::ClassifyError;
use crate::core::assembly::AssemblyMetadata;
use crate::core::types::ParStatus;
use crate::index::FeatureIndex;
use crate::parsing::translation::TranslationSource;

/// Attribute carrying the translation identifier on CDS features
const PROTEIN_ID_KEY: &str = "protein_id";

/// Set of distinct translation sequences found under one gene occurrence
type TranslationSet = BTreeSet<Vec<u8>>;

/// Result of classifying every duplicate gene id
#[derive(Debug, Clone, Default, Serialize)]
pub struct ParClassification {
    /// Duplicate gene ids on allosomes only, with their outcome
    pub decisions: BTreeMap<String, ParStatus>,

    /// Duplicate gene ids spanning a non-allosome, with their chromosomes
    pub rejected: BTreeMap<String, BTreeSet<String>>,
}

impl ParClassification {
    #[must_use]
    pub fn status(&self, gene_id: &str) -> Option<ParStatus> {
        self.decisions.get(gene_id).copied()
    }

    /// Whether a gene id belongs to the final PAR set (known or inferred)
    #[must_use]
    pub fn is_par(&self, gene_id: &str) -> bool {
        self.status(gene_id).is_some_and(ParStatus::is_par)
    }

    /// Gene ids with the given status
    pub fn with_status(&self, status: ParStatus) -> impl Iterator<Item = &str> {
        self.decisions
            .iter()
            .filter(move |(_, s)| **s == status)
            .map(|(gene_id, _)| gene_id.as_str())
    }

    /// Final PAR set: known and inferred gene ids
    #[must_use]
    pub fn par_gene_ids(&self) -> HashSet<&str> {
        self.decisions
            .iter()
            .filter(|(_, s)| s.is_par())
            .map(|(gene_id, _)| gene_id.as_str())
            .collect()
    }
}

/// Classifies duplicate gene ids as known, inferred or unresolved PAR genes
pub struct ParClassifier<'a> {
    index: &'a FeatureIndex,
    assembly: &'a AssemblyMetadata,
}

impl<'a> ParClassifier<'a> {
    #[must_use]
    pub fn new(index: &'a FeatureIndex, assembly: &'a AssemblyMetadata) -> Self {
        Self { index, assembly }
    }

    /// Detect duplicate gene ids and classify each of them
    ///
    /// Inference from translation sequences only runs when `translations`
    /// is given; otherwise candidates outside known PAR regions stay
    /// unresolved.
    ///
    /// # Errors
    ///
    /// Returns `ClassifyError::MissingGeneId` if a gene feature on a declared
    /// chromosome has no `GeneID`, or `ClassifyError::Translation` if a
    /// translation cannot be fetched.
    pub fn classify(
        &self,
        translations: Option<&mut dyn TranslationSource>,
    ) -> Result<ParClassification, ClassifyError> {
        info!("Searching for duplicate NCBI gene IDs…");
        let groups = GeneGroups::collect(self.index, self.assembly)?;

        let mut classification = ParClassification::default();

        // Genes sharing an id on one chromosome are parts or alleles of one
        // gene; across allosomes they are PAR candidates, anywhere else they
        // are unexplained duplicates.
        let mut candidates: BTreeSet<String> = BTreeSet::new();
        for (gene_id, chroms) in groups.duplicates() {
            if chroms.iter().all(|c| self.assembly.is_allosome(c)) {
                candidates.insert(gene_id.to_string());
            } else {
                let chrom_text = chroms
                    .iter()
                    .map(|c| format!("'{c}'"))
                    .collect::<Vec<_>>()
                    .join(", ");
                warn!("duplicate gene ID '{gene_id}' found on chromosomes: {chrom_text}");
                classification
                    .rejected
                    .insert(gene_id.to_string(), chroms.clone());
            }
        }

        info!("Assembling set of genes in known PAR regions");
        for gene_id in self.known_par_gene_ids(&candidates)? {
            candidates.remove(&gene_id);
            classification.decisions.insert(gene_id, ParStatus::Known);
        }

        match translations {
            Some(translations) if !candidates.is_empty() => {
                info!("Inferring PAR genes from duplicates in allosomes…");
                for gene_id in candidates {
                    let status = if self.has_uniform_translations(&groups, &gene_id, translations)? {
                        ParStatus::Inferred
                    } else {
                        debug!("PAR candidate '{gene_id}' has differing translations across copies");
                        ParStatus::Unresolved
                    };
                    classification.decisions.insert(gene_id, status);
                }
            }
            _ => {
                for gene_id in candidates {
                    debug!("PAR candidate '{gene_id}' is outside known PAR regions");
                    classification
                        .decisions
                        .insert(gene_id, ParStatus::Unresolved);
                }
            }
        }

        Ok(classification)
    }

    /// Candidates with a gene feature inside any known PAR region
    fn known_par_gene_ids(
        &self,
        candidates: &BTreeSet<String>,
    ) -> Result<BTreeSet<String>, ClassifyError> {
        let mut known = BTreeSet::new();
        for region in self.assembly.known_par_regions() {
            for gene in self
                .index
                .features(Some(region))
                .into_iter()
                .filter(|f| f.is_gene())
            {
                if let Some(gene_id) = gene.gene_id()? {
                    if candidates.contains(gene_id) {
                        known.insert(gene_id.to_string());
                    }
                }
            }
        }
        Ok(known)
    }

    /// True if every occurrence of the gene translates to the same set of sequences
    fn has_uniform_translations(
        &self,
        groups: &GeneGroups,
        gene_id: &str,
        translations: &mut dyn TranslationSource,
    ) -> Result<bool, ClassifyError> {
        let mut distinct: HashSet<TranslationSet> = HashSet::new();
        for &position in groups.occurrences(gene_id) {
            distinct.insert(self.translation_set(position, translations)?);
        }
        Ok(distinct.len() == 1)
    }

    /// Translations under one gene occurrence, found by store position
    fn translation_set(
        &self,
        position: usize,
        translations: &mut dyn TranslationSource,
    ) -> Result<TranslationSet, ClassifyError> {
        // CDS rows hang off transcripts, so search the whole subtree
        let protein_ids: BTreeSet<&str> = self
            .index
            .descendants_at(position)
            .into_iter()
            .filter_map(|f| f.first(PROTEIN_ID_KEY))
            .collect();

        let mut sequences = TranslationSet::new();
        for protein_id in protein_ids {
            sequences.insert(translations.fetch(protein_id)?);
        }
        Ok(sequences)
    }
}
