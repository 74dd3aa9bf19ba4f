//! Average-linkage agglomerative clustering with a distance cut-off.
//!
//! Each cluster is identified by the slot of its lowest-indexed member. At
//! every step the two active clusters with the smallest average cross-pair
//! distance are merged (the higher slot folds into the lower one), until the
//! cheapest merge exceeds the threshold.
//!
//! Cluster-to-cluster distances are maintained with the Lance–Williams update
//! for average linkage:
//!
//! ```text
//! d(k, i ∪ j) = (|i| · d(k, i) + |j| · d(k, j)) / (|i| + |j|)
//! ```
//!
//! which equals the mean distance over all cross pairs between `k` and
//! `i ∪ j`. Equal distances are resolved by the lowest `(i, j)` slot pair, so
//! the result depends only on the input order and values.

use super::embedding::Embedding;
use super::error::ClusteringError;

/// One merge performed during clustering.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeStep {
    /// Surviving cluster slot (the lower one)
    pub left: usize,
    /// Cluster slot folded into `left`
    pub right: usize,
    /// Average linkage distance at which the merge happened
    pub distance: f64,
    /// Size of the merged cluster
    pub size: usize,
}

/// Merge history plus the clusters left standing at the threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct Dendrogram {
    merges: Vec<MergeStep>,
    clusters: Vec<Vec<usize>>,
}

impl Dendrogram {
    /// Merges in the order they were performed.
    pub fn merges(&self) -> &[MergeStep] {
        &self.merges
    }

    /// Final clusters as input indices.
    ///
    /// Members are ascending within a cluster; clusters are ordered by their
    /// first member.
    pub fn clusters(&self) -> &[Vec<usize>] {
        &self.clusters
    }
}

/// Cluster `embeddings` with average linkage, stopping above `threshold`.
///
/// Distances are cosine distances (see [`Embedding::cosine_distance`]).
pub fn average_linkage(
    embeddings: &[Embedding],
    threshold: f32,
) -> Result<Dendrogram, ClusteringError> {
    if embeddings.is_empty() {
        return Err(ClusteringError::EmptyInput);
    }
    if !threshold.is_finite() || threshold < 0.0 {
        return Err(ClusteringError::InvalidThreshold(threshold));
    }

    let expected = embeddings[0].dimensions();
    if let Some((index, e)) = embeddings
        .iter()
        .enumerate()
        .find(|(_, e)| e.dimensions() != expected)
    {
        return Err(ClusteringError::DimensionMismatch {
            index,
            expected,
            found: e.dimensions(),
        });
    }

    let n = embeddings.len();
    let threshold = f64::from(threshold);

    let mut distances = vec![vec![0.0f64; n]; n];
    for i in 0..n {
        for j in (i + 1)..n {
            let d = embeddings[i].cosine_distance(&embeddings[j]);
            distances[i][j] = d;
            distances[j][i] = d;
        }
    }

    let mut members: Vec<Option<Vec<usize>>> = (0..n).map(|i| Some(vec![i])).collect();
    let mut merges = Vec::new();

    loop {
        let Some((i, j, distance)) = closest_pair(&members, &distances) else {
            break;
        };
        if distance > threshold {
            break;
        }

        let size_i = members[i].as_ref().map_or(0, Vec::len) as f64;
        let size_j = members[j].as_ref().map_or(0, Vec::len) as f64;

        for k in 0..n {
            if k == i || k == j || members[k].is_none() {
                continue;
            }
            let merged =
                (size_i * distances[i][k] + size_j * distances[j][k]) / (size_i + size_j);
            distances[i][k] = merged;
            distances[k][i] = merged;
        }

        let absorbed = members[j].take().unwrap_or_default();
        let size = match members[i].as_mut() {
            Some(cluster) => {
                cluster.extend(absorbed);
                cluster.len()
            }
            None => 0,
        };

        merges.push(MergeStep {
            left: i,
            right: j,
            distance,
            size,
        });
    }

    let mut clusters: Vec<Vec<usize>> = members
        .into_iter()
        .flatten()
        .map(|mut cluster| {
            cluster.sort_unstable();
            cluster
        })
        .collect();
    clusters.sort_by_key(|cluster| cluster[0]);

    Ok(Dendrogram { merges, clusters })
}

/// Find the active pair with the smallest distance, lowest `(i, j)` on ties.
fn closest_pair(
    members: &[Option<Vec<usize>>],
    distances: &[Vec<f64>],
) -> Option<(usize, usize, f64)> {
    let active: Vec<usize> = members
        .iter()
        .enumerate()
        .filter_map(|(i, m)| m.as_ref().map(|_| i))
        .collect();

    let mut best: Option<(usize, usize, f64)> = None;
    for (a, &i) in active.iter().enumerate() {
        for &j in &active[a + 1..] {
            let d = distances[i][j];
            match best {
                Some((_, _, best_d)) if d >= best_d => {}
                _ => best = Some((i, j, d)),
            }
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn emb(v: &[f32]) -> Embedding {
        Embedding::new(v.to_vec())
    }

    #[test]
    fn test_rejects_bad_threshold() {
        let embeddings = vec![emb(&[1.0])];
        assert!(matches!(
            average_linkage(&embeddings, -0.1),
            Err(ClusteringError::InvalidThreshold(_))
        ));
        assert!(matches!(
            average_linkage(&embeddings, f32::NAN),
            Err(ClusteringError::InvalidThreshold(_))
        ));
    }

    #[test]
    fn test_rejects_mixed_dimensions() {
        let embeddings = vec![emb(&[1.0, 0.0]), emb(&[1.0, 0.0, 0.0])];
        assert_eq!(
            average_linkage(&embeddings, 0.5),
            Err(ClusteringError::DimensionMismatch {
                index: 1,
                expected: 2,
                found: 3
            })
        );
    }

    #[test]
    fn test_zero_distance_merges_first() {
        let embeddings = vec![emb(&[1.0, 0.1]), emb(&[0.0, 1.0]), emb(&[1.0, 0.1])];
        let dendrogram = average_linkage(&embeddings, 2.0).unwrap();
        let first = &dendrogram.merges()[0];
        assert_eq!((first.left, first.right), (0, 2));
        assert_eq!(first.distance, 0.0);
    }

    #[test]
    fn test_threshold_two_merges_everything() {
        let embeddings = vec![emb(&[1.0, 0.0]), emb(&[-1.0, 0.0]), emb(&[0.0, 1.0])];
        let dendrogram = average_linkage(&embeddings, 2.0).unwrap();
        assert_eq!(dendrogram.clusters(), &[vec![0, 1, 2]]);
        assert_eq!(dendrogram.merges().len(), 2);
    }

    #[test]
    fn test_threshold_zero_keeps_distinct_points_apart() {
        let embeddings = vec![emb(&[1.0, 0.0]), emb(&[0.9, 0.1])];
        let dendrogram = average_linkage(&embeddings, 0.0).unwrap();
        assert_eq!(dendrogram.clusters(), &[vec![0], vec![1]]);
        assert!(dendrogram.merges().is_empty());
    }

    #[test]
    fn test_uses_average_not_single_linkage() {
        // 0 and 1 are close; 2 is close to 1 but far from 0.
        // Single linkage would chain 2 in at a small distance; average
        // linkage sees the mean of d(0,2) and d(1,2).
        let embeddings = vec![emb(&[1.0, 0.0]), emb(&[1.0, 1.0]), emb(&[0.0, 1.0])];
        let d01 = embeddings[0].cosine_distance(&embeddings[1]);
        let d02 = embeddings[0].cosine_distance(&embeddings[2]);
        let d12 = embeddings[1].cosine_distance(&embeddings[2]);
        let average = (d02 + d12) / 2.0;

        // Threshold between d12 and the average blocks the second merge.
        let threshold = ((d12 + average) / 2.0) as f32;
        let dendrogram = average_linkage(&embeddings, threshold).unwrap();
        assert_eq!(dendrogram.clusters(), &[vec![0, 1], vec![2]]);
        assert!((dendrogram.merges()[0].distance - d01).abs() < 1e-12);
    }

    #[test]
    fn test_merge_distances_are_recorded() {
        let embeddings = vec![emb(&[1.0, 0.0]), emb(&[1.0, 0.05]), emb(&[0.0, 1.0])];
        let dendrogram = average_linkage(&embeddings, 2.0).unwrap();
        let distances: Vec<f64> = dendrogram.merges().iter().map(|m| m.distance).collect();
        assert!(distances.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(dendrogram.merges().last().map(|m| m.size), Some(3));
    }
}
