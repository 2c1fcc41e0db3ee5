use crate::error::Result;
use crate::graph::WeightedGraph;
use crate::partition_util::{fill_from_structures, select_hotspots, ClaimedSet};
use crate::structures::Structure;
use crate::sym_matrix::Weight;
use crate::{size_cap, Partition};
use std::collections::VecDeque;

#[derive(Clone, Debug)]
pub struct PartitioningConfig {
    /// How many hotspots (and therefore partitions) to select.
    pub partition_count: usize,
    /// Merge every structure that contains a hotspot and fits under the size cap into that
    /// hotspot's partition before growing it.
    pub fill_partition_from_structure: bool,
    /// Accepted for compatibility with existing configuration files. Partitioning always runs on
    /// the calling thread.
    pub use_threading: bool,
}

impl Default for PartitioningConfig {
    fn default() -> Self {
        Self {
            partition_count: 1,
            fill_partition_from_structure: false,
            use_threading: false,
        }
    }
}

/// Result of a partitioning run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PartitionOutcome {
    /// Hotspots in selection order.
    pub hotspots: Vec<usize>,
    /// One partition per hotspot, in the same order.
    pub partitions: Vec<Partition>,
    pub claimed: ClaimedSet,
    pub size_cap: usize,
}

impl PartitionOutcome {
    /// Index of the partition holding `node`, if any.
    pub fn partition_of(&self, node: usize) -> Option<usize> {
        self.partitions.iter().position(|p| p.contains(&node))
    }

    /// Smallest, largest and average partition size.
    pub fn partition_sizes(&self) -> (usize, usize, f32) {
        if self.partitions.is_empty() {
            return (0, 0, 0.0);
        }
        let sizes = self.partitions.iter().map(|p| p.len());
        let min = sizes.clone().min().unwrap_or(0);
        let max = sizes.clone().max().unwrap_or(0);
        let avg = sizes.sum::<usize>() as f32 / self.partitions.len() as f32;
        (min, max, avg)
    }
}

/// Grows one partition around each hotspot: a depth-first pass bounded by the size cap, then an
/// unbounded breadth-first pass that hands out whatever is still reachable.
pub struct PartitionEngine<'g, T> {
    graph: &'g WeightedGraph<T>,
    config: PartitioningConfig,
}

impl<'g, T: Weight> PartitionEngine<'g, T> {
    pub fn new(graph: &'g WeightedGraph<T>, config: PartitioningConfig) -> Self {
        Self { graph, config }
    }

    pub fn run(&self, structures: &[Structure]) -> Result<PartitionOutcome> {
        if self.config.use_threading {
            log::warn!("threaded partitioning is not supported, running sequentially");
        }

        log::info!("Selecting hotspots");
        let hotspots = select_hotspots(self.graph, structures, self.config.partition_count)?;
        if hotspots.is_empty() {
            log::warn!("no hotspots could be selected, nothing to partition");
            return Ok(PartitionOutcome::default());
        }
        log::debug!("hotspots: {:?}", hotspots);

        let size_cap = size_cap(self.graph.len(), hotspots.len());
        let (mut partitions, mut claimed) = self.seed_partitions(&hotspots, structures, size_cap);

        log::info!("Partitioning...");
        for (partition, &hotspot) in partitions.iter_mut().zip(hotspots.iter()) {
            self.grow_depth_first(partition, hotspot, size_cap, &mut claimed)?;
            log::debug!("hotspot {hotspot}: {} nodes after depth-first growth", partition.len());
        }
        for partition in partitions.iter_mut() {
            self.fill_breadth_first(partition, &mut claimed)?;
        }
        log::debug!(
            "claimed {} of {} nodes",
            claimed.len(),
            self.graph.len()
        );

        Ok(PartitionOutcome {
            hotspots,
            partitions,
            claimed,
            size_cap,
        })
    }

    /// Every hotspot is claimed before any growth starts, so no partition can take another's
    /// hotspot.
    fn seed_partitions(
        &self,
        hotspots: &[usize],
        structures: &[Structure],
        size_cap: usize,
    ) -> (Vec<Partition>, ClaimedSet) {
        let mut claimed = ClaimedSet::new();
        let mut partitions = Vec::with_capacity(hotspots.len());
        for &hotspot in hotspots.iter() {
            claimed.claim(hotspot);
            partitions.push(Partition::from([hotspot]));
        }

        if self.config.fill_partition_from_structure {
            for (partition, &hotspot) in partitions.iter_mut().zip(hotspots.iter()) {
                fill_from_structures(partition, hotspot, structures, size_cap, &mut claimed);
            }
        }
        (partitions, claimed)
    }

    /// Depth-first growth from `hotspot`. The cap is checked before each insertion, so the
    /// partition never grows past `size_cap`. Claimed nodes are never entered.
    pub(crate) fn grow_depth_first(
        &self,
        partition: &mut Partition,
        hotspot: usize,
        size_cap: usize,
        claimed: &mut ClaimedSet,
    ) -> Result<()> {
        if partition.len() >= size_cap {
            return Ok(());
        }
        partition.insert(hotspot);
        claimed.claim(hotspot);

        // Each frame is a visited node's neighbor list and the position of the next neighbor.
        let mut stack = vec![(self.graph.neighbors(hotspot)?, 0usize)];
        while let Some((neighbors, next)) = stack.last_mut() {
            if *next == neighbors.len() {
                stack.pop();
                continue;
            }
            let node = neighbors[*next];
            *next += 1;

            if partition.len() >= size_cap {
                break;
            }
            if !claimed.claim(node) {
                continue;
            }
            partition.insert(node);
            log::trace!("hotspot {hotspot}: claimed {node}");
            stack.push((self.graph.neighbors(node)?, 0));
        }
        Ok(())
    }

    /// Breadth-first expansion from every current member. Any unclaimed neighbor is taken,
    /// without a size limit.
    pub(crate) fn fill_breadth_first(
        &self,
        partition: &mut Partition,
        claimed: &mut ClaimedSet,
    ) -> Result<()> {
        let mut queue: VecDeque<usize> = partition.iter().copied().collect();
        while let Some(node) = queue.pop_front() {
            for neighbor in self.graph.neighbors(node)? {
                if claimed.claim(neighbor) {
                    partition.insert(neighbor);
                    queue.push_back(neighbor);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn graph_from_edges(n: usize, edges: &[(usize, usize)]) -> WeightedGraph<i64> {
        let graph = WeightedGraph::new(n);
        for &(a, b) in edges.iter() {
            graph.set_edge_weight(a, b, 1).unwrap();
        }
        graph
    }

    fn path_graph() -> WeightedGraph<i64> {
        graph_from_edges(4, &[(0, 1), (1, 2), (2, 3)])
    }

    fn engine(graph: &WeightedGraph<i64>, count: usize) -> PartitionEngine<'_, i64> {
        PartitionEngine::new(
            graph,
            PartitioningConfig {
                partition_count: count,
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_single_hotspot_claims_path() {
        // Arrange
        let graph = path_graph();
        let structures = vec![Structure::from([0, 1])];

        // Act
        let outcome = engine(&graph, 1).run(&structures).unwrap();

        // Assert
        assert_eq!(outcome.hotspots, vec![1]);
        assert_eq!(outcome.size_cap, 4);
        assert_eq!(outcome.partitions, vec![Partition::from([0, 1, 2, 3])]);
        assert_eq!(outcome.claimed.len(), 4);
    }

    #[test]
    fn test_two_hotspots_split_path() {
        // Arrange
        let graph = path_graph();
        let structures = vec![Structure::from([0, 1]), Structure::from([2, 3])];

        // Act
        let outcome = engine(&graph, 2).run(&structures).unwrap();

        // Assert
        assert_eq!(outcome.hotspots, vec![2, 1]);
        assert_eq!(outcome.size_cap, 2);
        assert_eq!(
            outcome.partitions,
            vec![Partition::from([2, 3]), Partition::from([0, 1])]
        );
        assert_eq!(outcome.partition_of(0), Some(1));
    }

    #[test]
    fn test_depth_first_respects_cap() {
        // Arrange
        let graph = graph_from_edges(6, &[(0, 1), (0, 2), (0, 3), (1, 4), (4, 5)]);
        let e = engine(&graph, 1);
        let mut claimed = ClaimedSet::new();
        claimed.claim(0);
        let mut partition = Partition::from([0]);

        // Act
        e.grow_depth_first(&mut partition, 0, 3, &mut claimed).unwrap();

        // Assert
        // Depth-first order is 0, 1, 4, so the cap is hit before 2 or 3 are seen.
        assert_eq!(partition, Partition::from([0, 1, 4]));
        assert_eq!(claimed.len(), 3);
    }

    #[test]
    fn test_depth_first_skips_claimed_nodes() {
        let graph = path_graph();
        let e = engine(&graph, 1);
        let mut claimed = ClaimedSet::new();
        claimed.claim(0);
        claimed.claim(2);
        let mut partition = Partition::from([0]);

        e.grow_depth_first(&mut partition, 0, 4, &mut claimed).unwrap();

        // 1 is taken, 2 belongs elsewhere and blocks the way to 3.
        assert_eq!(partition, Partition::from([0, 1]));
        assert!(!claimed.contains(3));
    }

    #[test]
    fn test_full_partition_does_not_grow() {
        let graph = path_graph();
        let e = engine(&graph, 1);
        let mut claimed = ClaimedSet::new();
        claimed.claim(1);
        let mut partition = Partition::from([1]);

        e.grow_depth_first(&mut partition, 1, 1, &mut claimed).unwrap();

        assert_eq!(partition, Partition::from([1]));
        assert!(claimed.contains(1));
    }

    #[test]
    fn test_hotspots_are_never_taken_by_other_partitions() {
        // Star with center 0: cap is 1, so growth stops immediately and the fill pass decides.
        let graph = graph_from_edges(4, &[(0, 1), (0, 2), (0, 3)]);
        let structures = vec![
            Structure::from([0]),
            Structure::from([1]),
            Structure::from([2]),
            Structure::from([3]),
        ];

        let outcome = engine(&graph, 4).run(&structures).unwrap();

        assert_eq!(outcome.size_cap, 1);
        assert_eq!(outcome.hotspots.len(), 4);
        for (partition, hotspot) in outcome.partitions.iter().zip(outcome.hotspots.iter()) {
            assert_eq!(partition, &Partition::from([*hotspot]));
        }
    }

    #[test]
    fn test_unreachable_nodes_stay_unclaimed() {
        let graph = graph_from_edges(5, &[(0, 1), (1, 2), (3, 4)]);
        let structures = vec![Structure::from([1])];

        let outcome = engine(&graph, 1).run(&structures).unwrap();

        assert_eq!(outcome.partitions, vec![Partition::from([0, 1, 2])]);
        assert!(!outcome.claimed.contains(3));
        assert_eq!(outcome.partition_of(4), None);
    }

    #[test]
    fn test_breadth_first_fills_past_cap() {
        // Arrange
        let graph = graph_from_edges(7, &[(0, 1), (1, 2), (2, 3), (3, 4), (4, 5), (5, 6)]);
        let structures = vec![Structure::from([1]), Structure::from([5, 4])];

        // Act
        let outcome = engine(&graph, 2).run(&structures).unwrap();

        // Assert
        // Hotspots 4 then 1, cap 3: depth-first from 4 visits 3 and 2 and stops, 1 only reaches
        // 0. The fill pass of the first partition then takes 5 and 6.
        assert_eq!(outcome.hotspots, vec![4, 1]);
        assert_eq!(
            outcome.partitions,
            vec![Partition::from([2, 3, 4, 5, 6]), Partition::from([0, 1])]
        );
        assert_eq!(outcome.claimed.len(), 7);
    }

    #[test]
    fn test_fill_from_structure_seeds_partition() {
        // Arrange
        let graph = graph_from_edges(6, &[(0, 1), (1, 2), (2, 3), (3, 4), (4, 5)]);
        let structures = vec![Structure::from([1, 5]), Structure::from([3, 4, 2])];
        let config = PartitioningConfig {
            partition_count: 2,
            fill_partition_from_structure: true,
            ..Default::default()
        };

        // Act
        let outcome = PartitionEngine::new(&graph, config).run(&structures).unwrap();

        // Assert
        // Hotspot 2 pre-fills {2, 3, 4}; hotspot 1 pre-fills 5 and then only 0 is left.
        assert_eq!(outcome.hotspots, vec![2, 1]);
        assert_eq!(
            outcome.partitions,
            vec![Partition::from([2, 3, 4]), Partition::from([0, 1, 5])]
        );
    }

    #[test]
    fn test_no_structures_gives_no_partitions() {
        let graph = path_graph();
        let outcome = engine(&graph, 3).run(&[]).unwrap();
        assert!(outcome.partitions.is_empty());
        assert!(outcome.claimed.is_empty());
        assert_eq!(outcome.partition_sizes(), (0, 0, 0.0));
    }

    #[test]
    fn test_random_graphs_are_disjoint_and_deterministic() {
        let mut rng = StdRng::seed_from_u64(1234);
        for _ in 0..25 {
            // Arrange
            let n = rng.gen_range(4..40);
            let graph = WeightedGraph::<i64>::new(n);
            for a in 0..n {
                for b in a + 1..n {
                    if rng.gen_bool(0.1) {
                        graph.set_edge_weight(a, b, rng.gen_range(1..5)).unwrap();
                    }
                }
            }
            let structures: Vec<Structure> = (0..6)
                .map(|_| (0..rng.gen_range(1..6)).map(|_| rng.gen_range(0..n)).collect())
                .collect();
            let count = rng.gen_range(1..5);

            // Act
            let first = engine(&graph, count).run(&structures).unwrap();
            let second = engine(&graph, count).run(&structures).unwrap();

            // Assert
            assert_eq!(first, second);
            let total: usize = first.partitions.iter().map(|p| p.len()).sum();
            assert_eq!(total, first.claimed.len());
            for node in first.claimed.iter() {
                let owners = first.partitions.iter().filter(|p| p.contains(node)).count();
                assert_eq!(owners, 1);
            }
            for hotspot in first.hotspots.iter() {
                assert!(first.claimed.contains(*hotspot));
            }
        }
    }

    #[test]
    fn test_depth_first_never_exceeds_cap_on_random_graphs() {
        let mut rng = StdRng::seed_from_u64(1234);
        for _ in 0..25 {
            // Arrange
            let n = rng.gen_range(4..40);
            let graph = WeightedGraph::<i64>::new(n);
            for a in 0..n {
                for b in a + 1..n {
                    if rng.gen_bool(0.2) {
                        graph.set_edge_weight(a, b, 1).unwrap();
                    }
                }
            }
            let structures: Vec<Structure> = (0..6)
                .map(|_| (0..rng.gen_range(1..6)).map(|_| rng.gen_range(0..n)).collect())
                .collect();
            let e = PartitionEngine::new(
                &graph,
                PartitioningConfig {
                    partition_count: rng.gen_range(1..5),
                    fill_partition_from_structure: false,
                    ..Default::default()
                },
            );
            let hotspots = select_hotspots(&graph, &structures, e.config.partition_count).unwrap();
            let cap = size_cap(n, hotspots.len());
            let (mut partitions, mut claimed) = e.seed_partitions(&hotspots, &structures, cap);

            // Act & Assert
            for (partition, &hotspot) in partitions.iter_mut().zip(hotspots.iter()) {
                let before = claimed.len();
                e.grow_depth_first(partition, hotspot, cap, &mut claimed).unwrap();
                assert!(partition.len() <= cap, "{} nodes over a cap of {cap}", partition.len());
                assert!(claimed.len() >= before);
                assert!(partition.iter().all(|&node| claimed.contains(node)));
            }
        }
    }
}
