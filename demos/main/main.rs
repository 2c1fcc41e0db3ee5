use hotspot_partition::{PartitionEngine, PartitioningConfig, Structure, WeightedGraph};
use std::time;

// Four 6-node cliques joined in a ring, with each clique listed as a known structure.
fn ring_of_cliques() -> (WeightedGraph<i64>, Vec<Structure>) {
    const CLIQUES: usize = 4;
    const CLIQUE_SIZE: usize = 6;
    let graph = WeightedGraph::new(CLIQUES * CLIQUE_SIZE);
    let mut structures = Vec::new();
    for c in 0..CLIQUES {
        let base = c * CLIQUE_SIZE;
        for a in base..base + CLIQUE_SIZE {
            for b in a + 1..base + CLIQUE_SIZE {
                graph.set_edge_weight(a, b, 1).unwrap();
            }
        }
        let next = ((c + 1) % CLIQUES) * CLIQUE_SIZE;
        graph.set_edge_weight(base + CLIQUE_SIZE - 1, next, 1).unwrap();
        structures.push((base..base + CLIQUE_SIZE).collect());
    }
    (graph, structures)
}

fn main() {
    env_logger::init();
    let (graph, structures) = ring_of_cliques();
    let t1 = time::Instant::now();
    let outcome = PartitionEngine::new(
        &graph,
        PartitioningConfig {
            partition_count: 4,
            ..Default::default()
        },
    )
    .run(&structures)
    .unwrap();
    println!("time: {}ms", t1.elapsed().as_millis());
    let size_info = outcome.partition_sizes();
    println!(
        "partitions: {}, with sizes from {} to {} with an average of {}",
        outcome.partitions.len(),
        size_info.0,
        size_info.1,
        size_info.2
    );
    println!("hotspots: {:?}", outcome.hotspots);
}
