//! Graph view of a transition table
//!
//! Reachability, cycle detection, start/terminal states, statistics and DOT
//! rendering over a petgraph copy of the table's edges.

use crate::Result;
use crate::automaton::{StateId, StateSet, Symbol, Transition, TransitionTable};
use petgraph::Direction;
use petgraph::stable_graph::{NodeIndex, StableGraph};
use petgraph::visit::{Bfs, EdgeRef};
use std::collections::HashMap;

/// A directed graph view of a transition table.
///
/// Nodes are the states that appear as an origin or destination in the
/// table, edges are the transitions themselves. The view borrows nothing
/// from the table, so it can outlive it and be analyzed on its own.
pub struct TransitionGraph<S> {
    /// The underlying graph structure.
    pub graph: StableGraph<StateId, Transition<S>>,

    /// Maps each state to its node, one node per state.
    pub state_index: HashMap<StateId, NodeIndex>,
}

impl<S: Symbol> TransitionGraph<S> {
    pub fn new() -> Self {
        Self {
            graph: StableGraph::new(),
            state_index: HashMap::new(),
        }
    }

    pub fn from_table(table: &TransitionTable<S>) -> Self {
        let mut graph = Self::new();
        for transition in table {
            graph.add_transition(transition.clone());
        }
        graph
    }

    /// Adds a state unless it is already present, returning its node.
    pub fn add_state(&mut self, state: StateId) -> NodeIndex {
        if let Some(&idx) = self.state_index.get(&state) {
            return idx;
        }
        let idx = self.graph.add_node(state);
        self.state_index.insert(state, idx);
        idx
    }

    /// Adds a transition, creating its endpoints as needed.
    pub fn add_transition(&mut self, transition: Transition<S>) {
        let from_idx = self.add_state(transition.origin());
        let to_idx = self.add_state(transition.destination());
        self.graph.add_edge(from_idx, to_idx, transition);
    }

    pub fn contains_state(&self, state: StateId) -> bool {
        self.state_index.contains_key(&state)
    }

    /// Every state reachable from `start`, `start` included, in BFS order
    pub fn reachable_from(&self, start: StateId) -> Vec<StateId> {
        let Some(&start_idx) = self.state_index.get(&start) else {
            return vec![start];
        };

        let mut bfs = Bfs::new(&self.graph, start_idx);
        let mut reached = Vec::new();
        while let Some(idx) = bfs.next(&self.graph) {
            if let Some(&state) = self.graph.node_weight(idx) {
                reached.push(state);
            }
        }
        reached
    }

    pub fn has_cycles(&self) -> bool {
        petgraph::algo::is_cyclic_directed(&self.graph)
    }

    /// Find all start states (no incoming edges)
    pub fn start_states(&self) -> Vec<StateId> {
        self.states_without(Direction::Incoming)
    }

    /// Find all terminal states (no outgoing edges)
    pub fn terminal_states(&self) -> Vec<StateId> {
        self.states_without(Direction::Outgoing)
    }

    fn states_without(&self, direction: Direction) -> Vec<StateId> {
        let mut states: Vec<StateId> = self
            .graph
            .node_indices()
            .filter(|&idx| self.graph.edges_directed(idx, direction).next().is_none())
            .filter_map(|idx| self.graph.node_weight(idx).copied())
            .collect();
        states.sort();
        states
    }

    /// Get outgoing transitions from a state
    pub fn outgoing_transitions(&self, state: StateId) -> Vec<&Transition<S>> {
        self.transitions_directed(state, Direction::Outgoing)
    }

    /// Get incoming transitions to a state
    pub fn incoming_transitions(&self, state: StateId) -> Vec<&Transition<S>> {
        self.transitions_directed(state, Direction::Incoming)
    }

    fn transitions_directed(&self, state: StateId, direction: Direction) -> Vec<&Transition<S>> {
        if let Some(&node_idx) = self.state_index.get(&state) {
            self.graph
                .edges_directed(node_idx, direction)
                .filter_map(|edge| self.graph.edge_weight(edge.id()))
                .collect()
        } else {
            Vec::new()
        }
    }

    /// Get graph statistics
    pub fn stats(&self) -> GraphStats {
        let max_out_degree = self
            .graph
            .node_indices()
            .map(|idx| self.graph.edges_directed(idx, Direction::Outgoing).count())
            .max()
            .unwrap_or(0);

        GraphStats {
            total_states: self.graph.node_count(),
            total_transitions: self.graph.edge_count(),
            start_states: self.start_states().len(),
            terminal_states: self.terminal_states().len(),
            max_out_degree,
        }
    }

    /// Render the automaton in Graphviz DOT format.
    ///
    /// States are labeled from `states` when they belong to it.
    pub fn write_dot(&self, w: &mut impl std::io::Write, states: &StateSet) -> Result<()> {
        writeln!(w, "digraph Automaton {{")?;
        writeln!(w, "  rankdir=LR;")?;
        writeln!(w, "  node [shape=circle];")?;
        writeln!(w)?;

        let mut nodes: Vec<StateId> = self.state_index.keys().copied().collect();
        nodes.sort();
        for state in &nodes {
            let label = states
                .get(*state)
                .map(|s| s.display_short())
                .unwrap_or_else(|| state.to_string());
            writeln!(w, "  \"{}\" [label=\"{}\"];", state, escape(&label))?;
        }

        writeln!(w)?;

        let mut edges: Vec<&Transition<S>> = self
            .graph
            .edge_indices()
            .filter_map(|idx| self.graph.edge_weight(idx))
            .collect();
        edges.sort_by_key(|t| (t.origin(), t.destination()));
        for transition in edges {
            writeln!(
                w,
                "  \"{}\" -> \"{}\" [label=\"{}\"];",
                transition.origin(),
                transition.destination(),
                escape(&transition.symbol().to_string())
            )?;
        }

        writeln!(w, "}}")?;
        Ok(())
    }

    pub fn to_dot(&self, states: &StateSet) -> Result<String> {
        let mut buf = Vec::new();
        self.write_dot(&mut buf, states)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

impl<S: Symbol> Default for TransitionGraph<S> {
    fn default() -> Self {
        Self::new()
    }
}

fn escape(label: &str) -> String {
    label.replace('\\', "\\\\").replace('"', "\\\"")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphStats {
    pub total_states: usize,
    pub total_transitions: usize,
    pub start_states: usize,
    pub terminal_states: usize,
    pub max_out_degree: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::GrammarSymbol;

    /// LR(0) gotos for `E -> E + n | n`
    fn sum_automaton() -> (StateSet, Vec<StateId>, TransitionTable<GrammarSymbol>) {
        let mut states = StateSet::new();
        let ids: Vec<StateId> = ["start", "E", "n", "E +", "E + n"]
            .into_iter()
            .map(|label| states.add_labeled_state(label))
            .collect();

        let mut table = TransitionTable::owned_by(&states);
        table.add(ids[0], GrammarSymbol::non_terminal("E"), ids[1]).unwrap();
        table.add(ids[0], GrammarSymbol::terminal("n"), ids[2]).unwrap();
        table.add(ids[1], GrammarSymbol::terminal("+"), ids[3]).unwrap();
        table.add(ids[3], GrammarSymbol::terminal("n"), ids[4]).unwrap();
        table.freeze();
        (states, ids, table)
    }

    #[test]
    fn test_empty_graph() {
        let graph: TransitionGraph<&str> = TransitionGraph::new();
        assert_eq!(graph.graph.node_count(), 0);
        assert_eq!(graph.graph.edge_count(), 0);
        assert!(!graph.has_cycles());
    }

    #[test]
    fn test_graph_mirrors_table() {
        let (_, ids, table) = sum_automaton();
        let graph = TransitionGraph::from_table(&table);

        assert_eq!(graph.graph.node_count(), 5);
        assert_eq!(graph.graph.edge_count(), 4);
        assert_eq!(graph.start_states(), vec![ids[0]]);
        assert_eq!(graph.terminal_states(), vec![ids[2], ids[4]]);
        assert_eq!(graph.outgoing_transitions(ids[0]).len(), 2);
        assert_eq!(graph.incoming_transitions(ids[4]).len(), 1);
        assert!(!graph.has_cycles());
    }

    #[test]
    fn test_reachability() {
        let (_, ids, table) = sum_automaton();
        let graph = TransitionGraph::from_table(&table);

        let mut reached = graph.reachable_from(ids[1]);
        reached.sort();
        assert_eq!(reached, vec![ids[1], ids[3], ids[4]]);
        assert_eq!(graph.reachable_from(ids[0]).len(), 5);
    }

    #[test]
    fn test_cycle_detection() {
        let mut states = StateSet::new();
        let s0 = states.add_state();
        let s1 = states.add_state();
        let mut table = TransitionTable::new();
        table.add(s0, "(", s1).unwrap();
        table.add(s1, "(", s1).unwrap();

        let graph = TransitionGraph::from_table(&table);
        assert!(graph.has_cycles());
        assert_eq!(graph.terminal_states(), Vec::<StateId>::new());
    }

    #[test]
    fn test_graph_stats() {
        let (_, _, table) = sum_automaton();
        let stats = TransitionGraph::from_table(&table).stats();
        assert_eq!(
            stats,
            GraphStats {
                total_states: 5,
                total_transitions: 4,
                start_states: 1,
                terminal_states: 2,
                max_out_degree: 2,
            }
        );
    }

    #[test]
    fn test_to_dot_output() {
        let (states, _, table) = sum_automaton();
        let dot = TransitionGraph::from_table(&table).to_dot(&states).unwrap();

        assert!(dot.starts_with("digraph Automaton {"));
        assert!(dot.contains("\"S0\" [label=\"S0 (start)\"];"));
        assert!(dot.contains("\"S0\" -> \"S1\" [label=\"E\"];"));
        assert!(dot.contains("\"S1\" -> \"S3\" [label=\"'+'\"];"));
        assert_eq!(dot.matches("->").count(), 4);
    }
}
