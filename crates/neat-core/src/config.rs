use neat_error::{NeatError, Result, neat_err};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The full set of parameters that every genetic operator and the
/// generation-driving loop consult. A [Config] is immutable once built -
/// operators take `&Config`, never a mutable reference - so a whole run is
/// reproducible given the same seed and config.
///
/// Build one with [ConfigBuilder] rather than constructing the struct
/// literal directly; the builder validates ranges that would otherwise
/// silently produce a non-evolving population (e.g. a weight range with
/// `min >= max`, or a zero `population_size`).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Config {
    pub gene_weight_probability: f32,
    pub gene_random_probability: f32,
    pub gene_max_weight: f32,
    pub gene_min_weight: f32,
    pub gene_weight_shift: f32,

    pub genome_disable_probability: f32,
    pub genome_node_probability: f32,
    pub genome_connection_probability: f32,
    pub genome_weight_coefficient: f32,
    pub genome_disjoint_coefficient: f32,
    pub genome_excess_coefficient: f32,
    pub genome_min_divide: usize,

    pub species_asexual_probability: f32,
    pub species_interspecies_reproduction_probability: f32,
    pub species_age_fertility_limit: usize,
    pub species_threshold: f32,
    pub species_keep_champion: bool,
    pub species_champion_limit: usize,
    pub species_niche_divide_min: usize,

    pub population_age_limit: usize,
    pub population_size: usize,

    pub app_start_node_depth: i64,
    pub app_end_node_depth: i64,
}

impl Config {
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::builder().build().expect("default Config is valid")
    }
}

/// Validating builder for [Config]. Mirrors the corpus's convention of
/// accumulating every violation before failing, so a caller sees every
/// problem at once instead of fixing one field at a time.
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    gene_weight_probability: f32,
    gene_random_probability: f32,
    gene_max_weight: f32,
    gene_min_weight: f32,
    gene_weight_shift: f32,

    genome_disable_probability: f32,
    genome_node_probability: f32,
    genome_connection_probability: f32,
    genome_weight_coefficient: f32,
    genome_disjoint_coefficient: f32,
    genome_excess_coefficient: f32,
    genome_min_divide: usize,

    species_asexual_probability: f32,
    species_interspecies_reproduction_probability: f32,
    species_age_fertility_limit: usize,
    species_threshold: f32,
    species_keep_champion: bool,
    species_champion_limit: usize,
    species_niche_divide_min: usize,

    population_age_limit: usize,
    population_size: usize,

    app_start_node_depth: i64,
    app_end_node_depth: i64,
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        ConfigBuilder {
            gene_weight_probability: 0.8,
            gene_random_probability: 0.1,
            gene_max_weight: 4.0,
            gene_min_weight: -4.0,
            gene_weight_shift: 0.5,

            genome_disable_probability: 0.75,
            genome_node_probability: 0.03,
            genome_connection_probability: 0.05,
            genome_weight_coefficient: 0.4,
            genome_disjoint_coefficient: 1.0,
            genome_excess_coefficient: 1.0,
            genome_min_divide: 20,

            species_asexual_probability: 0.25,
            species_interspecies_reproduction_probability: 0.001,
            species_age_fertility_limit: 15,
            species_threshold: 3.0,
            species_keep_champion: true,
            species_champion_limit: 5,
            species_niche_divide_min: 0,

            population_age_limit: 20,
            population_size: 150,

            app_start_node_depth: 0,
            app_end_node_depth: 1_000_000,
        }
    }
}

macro_rules! setter {
    ($name:ident, $ty:ty) => {
        pub fn $name(mut self, value: $ty) -> Self {
            self.$name = value;
            self
        }
    };
}

impl ConfigBuilder {
    setter!(gene_weight_probability, f32);
    setter!(gene_random_probability, f32);
    setter!(gene_max_weight, f32);
    setter!(gene_min_weight, f32);
    setter!(gene_weight_shift, f32);
    setter!(genome_disable_probability, f32);
    setter!(genome_node_probability, f32);
    setter!(genome_connection_probability, f32);
    setter!(genome_weight_coefficient, f32);
    setter!(genome_disjoint_coefficient, f32);
    setter!(genome_excess_coefficient, f32);
    setter!(genome_min_divide, usize);
    setter!(species_asexual_probability, f32);
    setter!(species_interspecies_reproduction_probability, f32);
    setter!(species_age_fertility_limit, usize);
    setter!(species_threshold, f32);
    setter!(species_keep_champion, bool);
    setter!(species_champion_limit, usize);
    setter!(species_niche_divide_min, usize);
    setter!(population_age_limit, usize);
    setter!(population_size, usize);
    setter!(app_start_node_depth, i64);
    setter!(app_end_node_depth, i64);

    pub fn build(self) -> Result<Config> {
        let mut errors: Vec<NeatError> = Vec::new();

        let probability_fields: [(&str, f32); 6] = [
            ("gene_weight_probability", self.gene_weight_probability),
            ("gene_random_probability", self.gene_random_probability),
            ("genome_disable_probability", self.genome_disable_probability),
            ("genome_node_probability", self.genome_node_probability),
            (
                "genome_connection_probability",
                self.genome_connection_probability,
            ),
            (
                "species_asexual_probability",
                self.species_asexual_probability,
            ),
        ];

        for (name, value) in probability_fields {
            if !(0.0..=1.0).contains(&value) {
                errors.push(neat_err!(InvalidConfig: "{name} must be in [0, 1], got {value}"));
            }
        }

        if self.gene_min_weight >= self.gene_max_weight {
            errors.push(
                neat_err!(InvalidConfig: "gene_min_weight ({}) must be < gene_max_weight ({})", self.gene_min_weight, self.gene_max_weight),
            );
        }

        if self.gene_weight_shift < 0.0 {
            errors.push(neat_err!(InvalidConfig: "gene_weight_shift must be >= 0"));
        }

        if self.population_size == 0 {
            errors.push(neat_err!(InvalidConfig: "population_size must be > 0"));
        }

        if self.app_start_node_depth >= self.app_end_node_depth {
            errors.push(
                neat_err!(InvalidConfig: "app_start_node_depth ({}) must be < app_end_node_depth ({})", self.app_start_node_depth, self.app_end_node_depth),
            );
        }

        if let Some(first) = errors.into_iter().reduce(|acc, next| {
            acc.with_context(next.to_string())
        }) {
            return Err(first);
        }

        Ok(Config {
            gene_weight_probability: self.gene_weight_probability,
            gene_random_probability: self.gene_random_probability,
            gene_max_weight: self.gene_max_weight,
            gene_min_weight: self.gene_min_weight,
            gene_weight_shift: self.gene_weight_shift,
            genome_disable_probability: self.genome_disable_probability,
            genome_node_probability: self.genome_node_probability,
            genome_connection_probability: self.genome_connection_probability,
            genome_weight_coefficient: self.genome_weight_coefficient,
            genome_disjoint_coefficient: self.genome_disjoint_coefficient,
            genome_excess_coefficient: self.genome_excess_coefficient,
            genome_min_divide: self.genome_min_divide,
            species_asexual_probability: self.species_asexual_probability,
            species_interspecies_reproduction_probability: self
                .species_interspecies_reproduction_probability,
            species_age_fertility_limit: self.species_age_fertility_limit,
            species_threshold: self.species_threshold,
            species_keep_champion: self.species_keep_champion,
            species_champion_limit: self.species_champion_limit,
            species_niche_divide_min: self.species_niche_divide_min,
            population_age_limit: self.population_age_limit,
            population_size: self.population_size,
            app_start_node_depth: self.app_start_node_depth,
            app_end_node_depth: self.app_end_node_depth,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = Config::builder().build();
        assert!(config.is_ok());
    }

    #[test]
    fn rejects_inverted_weight_range() {
        let result = Config::builder()
            .gene_min_weight(5.0)
            .gene_max_weight(-5.0)
            .build();

        assert!(result.is_err());
    }

    #[test]
    fn rejects_zero_population() {
        let result = Config::builder().population_size(0).build();
        assert!(result.is_err());
    }

    #[test]
    fn rejects_out_of_range_probability() {
        let result = Config::builder().gene_weight_probability(1.5).build();
        assert!(result.is_err());
    }
}
