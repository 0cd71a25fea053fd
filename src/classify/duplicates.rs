use std::collections::{BTreeMap, BTreeSet};

use crate::classify::ClassifyError;
use crate::core::assembly::AssemblyMetadata;
use crate::index::FeatureIndex;

/// Gene ids grouped by the chromosomes their gene features occur on
#[derive(Debug, Default)]
pub struct GeneGroups {
    /// Index: gene id -> chromosome accessions
    chromosomes: BTreeMap<String, BTreeSet<String>>,

    /// Index: gene id -> store positions of every gene feature carrying it
    occurrences: BTreeMap<String, Vec<usize>>,
}

impl GeneGroups {
    /// Scan gene features over the full extent of every declared chromosome
    ///
    /// Genes on sequences not declared as chromosomes (unplaced scaffolds,
    /// patches) are not considered.
    ///
    /// # Errors
    ///
    /// Returns `ClassifyError::MissingGeneId` if a gene feature has no
    /// `GeneID` cross-reference.
    pub fn collect(index: &FeatureIndex, assembly: &AssemblyMetadata) -> Result<Self, ClassifyError> {
        let mut groups = Self::default();

        for chromosome in assembly.chromosomes() {
            for position in index.positions(&chromosome.region) {
                let Some(gene) = index.at(position).filter(|f| f.is_gene()) else {
                    continue;
                };
                let gene_id = gene.gene_id()?.ok_or_else(|| ClassifyError::MissingGeneId {
                    seqid: gene.seqid.clone(),
                    start: gene.start,
                    end: gene.end,
                    id: gene.id().map(str::to_string),
                })?;
                groups.add(gene_id, &chromosome.region.accession, position);
            }
        }

        Ok(groups)
    }

    /// Record one occurrence of a gene id on a chromosome
    pub fn add(&mut self, gene_id: &str, accession: &str, position: usize) {
        self.chromosomes
            .entry(gene_id.to_string())
            .or_default()
            .insert(accession.to_string());
        self.occurrences
            .entry(gene_id.to_string())
            .or_default()
            .push(position);
    }

    /// Store positions of every gene feature carrying a gene id, in scan order
    #[must_use]
    pub fn occurrences(&self, gene_id: &str) -> &[usize] {
        self.occurrences.get(gene_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Gene ids occurring on at least two distinct chromosomes
    pub fn duplicates(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> {
        self.chromosomes
            .iter()
            .filter(|(_, chroms)| chroms.len() > 1)
            .map(|(gene_id, chroms)| (gene_id.as_str(), chroms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::assembly::Chromosome;
    use crate::core::region::Region;

    fn assembly() -> AssemblyMetadata {
        let mut assembly = AssemblyMetadata::default();
        for (name, accession, allosome) in [
            ("1", "NC_000001.11", false),
            ("X", "NC_000023.11", true),
            ("Y", "NC_000024.10", true),
        ] {
            assembly.add_chromosome(Chromosome {
                name: name.to_string(),
                region: Region::new(accession, 1, 1_000_000),
                allosome,
            });
        }
        assembly
    }

    fn gene_line(accession: &str, start: u64, gene_id: &str) -> String {
        format!(
            "{accession}\tBestRefSeq\tgene\t{start}\t{}\t.\t+\t.\tID=gene-{gene_id}-{accession}-{start};Dbxref=GeneID:{gene_id};gbkey=Gene\n",
            start + 100
        )
    }

    #[test]
    fn test_duplicates_span_distinct_chromosomes() {
        let text = [
            gene_line("NC_000023.11", 1000, "1234"),
            gene_line("NC_000024.10", 1000, "1234"),
            // Two copies on one chromosome are parts/alleles, not duplicates
            gene_line("NC_000001.11", 1000, "42"),
            gene_line("NC_000001.11", 5000, "42"),
            gene_line("NC_000024.10", 3000, "5678"),
            gene_line("NC_000001.11", 3000, "5678"),
        ]
        .concat();
        let index = FeatureIndex::from_reader(text.as_bytes()).unwrap();
        let groups = GeneGroups::collect(&index, &assembly()).unwrap();

        let duplicates: BTreeMap<&str, &BTreeSet<String>> = groups.duplicates().collect();
        assert_eq!(duplicates.keys().copied().collect::<Vec<_>>(), ["1234", "5678"]);
        assert_eq!(
            duplicates["5678"],
            &BTreeSet::from(["NC_000001.11".to_string(), "NC_000024.10".to_string()])
        );

        assert_eq!(groups.occurrences("42"), [2, 3]);
        assert_eq!(groups.occurrences("1234"), [0, 1]);
        assert!(groups.occurrences("unknown").is_empty());
    }

    #[test]
    fn test_non_gene_features_and_undeclared_sequences_ignored() {
        let text = [
            gene_line("NC_000023.11", 1000, "1234"),
            // Scaffold not declared in assembly metadata
            gene_line("NW_000001.1", 1000, "1234"),
            "NC_000024.10\tBestRefSeq\tmRNA\t1000\t1100\t.\t+\t.\tID=rna-1;Dbxref=GeneID:1234;gbkey=mRNA\n"
                .to_string(),
        ]
        .concat();
        let index = FeatureIndex::from_reader(text.as_bytes()).unwrap();
        let groups = GeneGroups::collect(&index, &assembly()).unwrap();

        assert_eq!(groups.duplicates().count(), 0);
        // Only the gene on the declared chromosome is an occurrence
        assert_eq!(groups.occurrences("1234"), [0]);
    }

    #[test]
    fn test_gene_without_gene_id_is_fatal() {
        let text = "NC_000024.10\tBestRefSeq\tgene\t1000\t1100\t.\t+\t.\tID=gene-X;Dbxref=HGNC:HGNC:1;gbkey=Gene\n";
        let index = FeatureIndex::from_reader(text.as_bytes()).unwrap();
        let result = GeneGroups::collect(&index, &assembly());
        assert!(matches!(
            result,
            Err(ClassifyError::MissingGeneId { id: Some(id), .. }) if id == "gene-X"
        ));
    }
}
