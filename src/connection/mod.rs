//! Connection rules and synapse specifications to wire node groups together,
//! along with the network-wide connection table built from them.

use rand::Rng;
use crate::error::ConnectError;


/// Topology rule deciding which source and target nodes are paired when connecting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionRule {
    /// Every source node is connected to every target node
    AllToAll,
    /// Source and target ranges are paired index by index, sizes must match
    OneToOne,
    /// Every target node receives the given number of connections from
    /// randomly drawn source nodes, multapses allowed
    FixedIndegree(usize),
    /// Every source node sends the given number of connections to
    /// randomly drawn target nodes, multapses allowed
    FixedOutdegree(usize),
    /// The given total number of connections is drawn from random
    /// source and target pairs
    FixedTotalNumber(usize),
}

impl ConnectionRule {
    /// Generates the (source, target) pairs the rule describes, random rules
    /// draw from the given generator
    pub fn pairs<R: Rng>(
        &self,
        sources: &[usize],
        targets: &[usize],
        rng: &mut R,
    ) -> Result<Vec<(usize, usize)>, ConnectError> {
        match self {
            ConnectionRule::AllToAll => {
                let mut output = Vec::with_capacity(sources.len() * targets.len());
                for source in sources {
                    for target in targets {
                        output.push((*source, *target));
                    }
                }

                Ok(output)
            },
            ConnectionRule::OneToOne => {
                if sources.len() != targets.len() {
                    return Err(ConnectError::SourceTargetSizeMismatch);
                }

                Ok(sources.iter().cloned().zip(targets.iter().cloned()).collect())
            },
            ConnectionRule::FixedIndegree(indegree) => {
                if *indegree == 0 {
                    return Err(ConnectError::RuleParameterOutOfRange);
                }

                let mut output = Vec::with_capacity(targets.len() * indegree);
                for target in targets {
                    for _ in 0..*indegree {
                        output.push((sources[rng.gen_range(0..sources.len())], *target));
                    }
                }

                Ok(output)
            },
            ConnectionRule::FixedOutdegree(outdegree) => {
                if *outdegree == 0 {
                    return Err(ConnectError::RuleParameterOutOfRange);
                }

                let mut output = Vec::with_capacity(sources.len() * outdegree);
                for source in sources {
                    for _ in 0..*outdegree {
                        output.push((*source, targets[rng.gen_range(0..targets.len())]));
                    }
                }

                Ok(output)
            },
            ConnectionRule::FixedTotalNumber(total) => {
                if *total == 0 {
                    return Err(ConnectError::RuleParameterOutOfRange);
                }

                let mut output = Vec::with_capacity(*total);
                for _ in 0..*total {
                    output.push((
                        sources[rng.gen_range(0..sources.len())],
                        targets[rng.gen_range(0..targets.len())],
                    ));
                }

                Ok(output)
            },
        }
    }
}

/// Per synapse class parameters applied to every connection a connect call creates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SynapseSpec {
    /// Receptor port on the target node the connection feeds into
    pub receptor: usize,
    /// Synaptic weight (pA)
    pub weight: f32,
    /// Spike delivery delay (ms)
    pub delay: f32,
}

impl Default for SynapseSpec {
    fn default() -> Self {
        SynapseSpec {
            receptor: 0,
            weight: 1.,
            delay: 1., // delivery delay (ms)
        }
    }
}

/// A single created connection between two nodes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Connection {
    /// Global index of the source node
    pub source: usize,
    /// Global index of the target node
    pub target: usize,
    /// Receptor port on the target node
    pub receptor: usize,
    /// Synaptic weight (pA)
    pub weight: f32,
    /// Spike delivery delay (ms)
    pub delay: f32,
}

/// Network-wide connection table, an adjacency list keyed by global source node index
#[derive(Debug, Clone, Default)]
pub struct NetConnections {
    outgoing: Vec<Vec<Connection>>,
    count: usize,
}

impl NetConnections {
    /// Grows the table to hold outgoing connections for the given number of nodes
    pub fn ensure_nodes(&mut self, n_nodes: usize) {
        if self.outgoing.len() < n_nodes {
            self.outgoing.resize_with(n_nodes, Vec::new);
        }
    }

    /// Adds a single connection, the source node must already be covered by the table
    pub fn add(&mut self, connection: Connection) {
        self.outgoing[connection.source].push(connection);
        self.count += 1;
    }

    /// Returns every connection leaving the given source node in creation order
    pub fn connections_from(&self, source: usize) -> &[Connection] {
        match self.outgoing.get(source) {
            Some(connections) => connections,
            None => &[],
        }
    }

    /// Total number of created connections
    pub fn count(&self) -> usize {
        self.count
    }

    /// Longest delivery delay (ms) across every connection, `0.` when empty
    pub fn max_delay(&self) -> f32 {
        self.outgoing.iter()
            .flatten()
            .map(|connection| connection.delay)
            .fold(0., f32::max)
    }

    /// Shortest delivery delay (ms) across every connection, `None` when empty
    pub fn min_delay(&self) -> Option<f32> {
        self.outgoing.iter()
            .flatten()
            .map(|connection| connection.delay)
            .reduce(f32::min)
    }
}
