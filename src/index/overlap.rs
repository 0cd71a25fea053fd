use std::collections::HashMap;

use coitrees::{COITree, IntervalNode, IntervalTree};

use crate::core::feature::Feature;
use crate::core::region::Region;

/// Per-sequence interval trees over feature positions in a store
///
/// COITree coordinates are `i32`. Features extending past `i32::MAX` are kept
/// in a per-sequence list and checked directly on every query.
pub struct OverlapIndex {
    trees: HashMap<String, COITree<usize, u32>>,
    beyond_tree: HashMap<String, Vec<(usize, Region)>>,
}

fn coord(position: u64) -> Option<i32> {
    i32::try_from(position).ok()
}

impl OverlapIndex {
    /// Build one tree per seqid; node metadata is the feature's position in `features`
    #[must_use]
    pub fn build(features: &[Feature]) -> Self {
        let mut nodes_by_seqid: HashMap<&str, Vec<IntervalNode<usize, u32>>> = HashMap::new();
        let mut beyond_tree: HashMap<String, Vec<(usize, Region)>> = HashMap::new();

        for (i, feature) in features.iter().enumerate() {
            // COITree uses closed intervals [first, last], same as GFF
            match (coord(feature.start), coord(feature.end)) {
                (Some(start), Some(end)) => nodes_by_seqid
                    .entry(feature.seqid.as_str())
                    .or_default()
                    .push(IntervalNode::new(start, end, i)),
                _ => beyond_tree
                    .entry(feature.seqid.clone())
                    .or_default()
                    .push((i, feature.region())),
            }
        }

        let trees = nodes_by_seqid
            .into_iter()
            .map(|(seqid, nodes)| (seqid.to_string(), COITree::new(&nodes)))
            .collect();

        Self { trees, beyond_tree }
    }

    /// Positions of all features intersecting the region, in ascending order
    #[must_use]
    pub fn query(&self, region: &Region) -> Vec<usize> {
        let mut hits = Vec::new();

        // Tree features all end at or before i32::MAX
        if let (Some(tree), Some(start)) = (self.trees.get(&region.accession), coord(region.start)) {
            let end = coord(region.end).unwrap_or(i32::MAX);
            tree.query(start, end, |node| {
                hits.push(node.metadata.to_owned());
            });
        }

        if let Some(entries) = self.beyond_tree.get(&region.accession) {
            hits.extend(
                entries
                    .iter()
                    .filter(|(_, extent)| extent.overlaps(region))
                    .map(|(i, _)| *i),
            );
        }

        hits.sort_unstable();
        hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::record::parse_line;

    fn features(lines: &[&str]) -> Vec<Feature> {
        lines
            .iter()
            .map(|line| parse_line(line).unwrap().feature)
            .collect()
    }

    #[test]
    fn test_query_inclusive_bounds() {
        let features = features(&[
            "chrY\t.\tgene\t100\t200\t.\t+\t.\tID=a",
            "chrY\t.\tgene\t201\t300\t.\t+\t.\tID=b",
            "chrX\t.\tgene\t100\t200\t.\t+\t.\tID=c",
            "chrY\t.\tgene\t150\t160\t.\t+\t.\tID=d",
        ]);
        let index = OverlapIndex::build(&features);

        assert_eq!(index.query(&Region::new("chrY", 200, 200)), vec![0]);
        assert_eq!(index.query(&Region::new("chrY", 155, 201)), vec![0, 1, 3]);
        assert_eq!(index.query(&Region::new("chrY", 301, 400)), Vec::<usize>::new());
        assert_eq!(index.query(&Region::new("chrX", 1, 1000)), vec![2]);
        assert!(index.query(&Region::new("chr1", 1, 1000)).is_empty());
    }

    #[test]
    fn test_positions_past_i32_range() {
        let features = features(&[
            "chr1\t.\tgene\t3000000000\t3000000100\t.\t+\t.\tID=far",
            "chr1\t.\tgene\t2147483000\t2147484000\t.\t+\t.\tID=straddle",
            "chr1\t.\tgene\t2000000000\t2000000100\t.\t+\t.\tID=near",
        ]);
        let index = OverlapIndex::build(&features);

        assert!(index.query(&Region::new("chr1", 2_500_000_000, 2_600_000_000)).is_empty());
        assert_eq!(
            index.query(&Region::new("chr1", 3_000_000_050, 3_000_000_060)),
            vec![0]
        );
        assert_eq!(
            index.query(&Region::new("chr1", 2_147_483_900, 2_147_483_999)),
            vec![1]
        );
        assert_eq!(index.query(&Region::new("chr1", 1, 4_000_000_000)), vec![0, 1, 2]);
    }
}
