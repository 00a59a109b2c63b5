use neat_core::genome::{Gene, Genome, InnovationRegistry, NodeId, StructureKey};
use neat_core::Config;

fn xor_registry_and_genome(registry: &mut InnovationRegistry) -> Genome {
    registry.register_depth(NodeId::input(0), 0);
    registry.register_depth(NodeId::input(1), 0);
    registry.register_depth(NodeId::output(0), 1_000_000);

    let mut genes = Vec::new();
    for i in 0..2 {
        let key = StructureKey::new(NodeId::input(i), NodeId::output(0));
        let innovation = registry.innovation_for(key);
        genes.push(Gene::new(NodeId::input(i), NodeId::output(0), 0.5, innovation));
    }
    genes.sort();
    Genome::new(genes, 2, 1, registry).unwrap()
}

fn single_gene_genome(registry: &mut InnovationRegistry) -> Genome {
    registry.register_depth(NodeId::input(0), 0);
    registry.register_depth(NodeId::output(0), 1_000_000);
    let key = StructureKey::new(NodeId::input(0), NodeId::output(0));
    let innovation = registry.innovation_for(key);
    let gene = Gene::new(NodeId::input(0), NodeId::output(0), 1.0, innovation);
    Genome::new(vec![gene], 1, 1, registry).unwrap()
}

#[test]
fn two_independent_genomes_adding_same_connection_share_innovation_until_advance() {
    let mut registry = InnovationRegistry::new(1);
    let base = single_gene_genome(&mut registry);

    // With a single gene, add_node has no choice of which connection to
    // split, so both independent mutations hit the same structural event.
    let mutated_a = base.add_node(&mut registry);
    let mutated_b = base.add_node(&mut registry);

    let new_gene_a = mutated_a.genes().iter().max_by_key(|g| g.innovation).unwrap();
    let new_gene_b = mutated_b.genes().iter().max_by_key(|g| g.innovation).unwrap();
    assert_eq!(new_gene_a.innovation, new_gene_b.innovation);

    registry.advance();
    let mutated_c = base.add_node(&mut registry);
    let new_gene_c = mutated_c.genes().iter().max_by_key(|g| g.innovation).unwrap();

    assert_ne!(new_gene_a.innovation, new_gene_c.innovation);
}

#[test]
fn genes_stay_ascending_by_innovation_through_breeding() {
    let mut registry = InnovationRegistry::new(2);
    let mut mother = xor_registry_and_genome(&mut registry);
    let mut father = xor_registry_and_genome(&mut registry);
    mother.set_raw_fitness(2.0);
    father.set_raw_fitness(1.0);

    let config = Config::builder().build().unwrap();
    let mutated_mother = mother.add_node(&mut registry);

    let child = mutated_mother.breed(&father, &mut registry, &config);

    let innovations: Vec<u64> = child.genes().iter().map(|g| g.innovation).collect();
    let mut sorted = innovations.clone();
    sorted.sort();
    assert_eq!(innovations, sorted);

    let unique: std::collections::HashSet<u64> = innovations.iter().copied().collect();
    assert_eq!(unique.len(), innovations.len());
}

#[test]
fn compare_accumulates_disjoint_for_structurally_different_genomes() {
    let mut registry = InnovationRegistry::new(2);
    let base = xor_registry_and_genome(&mut registry);
    let expanded = base.add_node(&mut registry);

    let config = Config::builder()
        .genome_disjoint_coefficient(1.0)
        .genome_excess_coefficient(1.0)
        .genome_min_divide(1000)
        .build()
        .unwrap();

    let distance = base.compare(&expanded, &config);
    assert!(distance > 0.0);
}

#[test]
fn weight_mutation_never_exceeds_configured_bounds() {
    let mut registry = InnovationRegistry::new(2);
    let genome = xor_registry_and_genome(&mut registry);
    let config = Config::builder()
        .gene_weight_probability(1.0)
        .gene_min_weight(-2.0)
        .gene_max_weight(2.0)
        .build()
        .unwrap();

    for _ in 0..200 {
        let mutated = genome
            .breed(&genome, &mut registry, &config);
        for gene in mutated.genes() {
            assert!(gene.weight >= config.gene_min_weight);
            assert!(gene.weight <= config.gene_max_weight);
        }
    }
}
