//! The evaluation-environment contract.
//!
//! The core drives an external collaborator ("Simulation") to turn a
//! genome's phenotype into a scalar fitness. Concrete environments (XOR,
//! Dodger, a game board, ...) live outside this crate; this module only
//! fixes the interface [crate::genome::Genome::run] and
//! [crate::genome::Population::evaluate] consume.

/// One simulated agent's lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentState {
    NotStarted,
    Running,
    Finished,
}

/// An environment that can score one or many agents driven by evolved
/// networks. Batch methods default to looping the per-agent methods; an
/// implementation that can amortize work across agents (e.g. a vectorized
/// physics step) overrides them.
pub trait Simulation {
    fn data_size(&self) -> usize;
    fn controls_size(&self) -> usize;

    fn restart(&mut self);

    fn get_state(&self, agent_id: usize) -> AgentState;
    fn get_data(&self, agent_id: usize) -> Vec<f32>;
    fn apply_controls(&mut self, agent_id: usize, controls: &[f32]);
    fn get_score(&self, agent_id: usize) -> f32;

    fn get_state_batch(&self, agent_ids: &[usize]) -> Vec<AgentState> {
        agent_ids.iter().map(|&id| self.get_state(id)).collect()
    }

    fn get_data_batch(&self, agent_ids: &[usize]) -> Vec<Vec<f32>> {
        agent_ids.iter().map(|&id| self.get_data(id)).collect()
    }

    /// `controls` pads shorter windows with zero-valued controls so every
    /// agent in a batch advances exactly as many times as its peers.
    fn apply_controls_batch(&mut self, agent_ids: &[usize], controls: &[Vec<f32>]) {
        for (&id, control) in agent_ids.iter().zip(controls) {
            self.apply_controls(id, control);
        }
    }

    fn get_score_batch(&self, agent_ids: &[usize]) -> Vec<f32> {
        agent_ids.iter().map(|&id| self.get_score(id)).collect()
    }
}
