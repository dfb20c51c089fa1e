//! Dual-indexed agent registry.
//!
//! Agents are stored once, keyed by name, with a second index from position
//! to the names occupying that cell. `insert`, `remove` and `relocate` are
//! the only ways to change either index and each one updates both, so the
//! position index is always the exact inverse of the name index.

use crate::agent::Agent;
use crate::board::Position;
use std::collections::{BTreeMap, HashMap};

#[derive(Default)]
pub struct AgentRegistry {
    /// Ascending name order doubles as the turn order
    by_name: BTreeMap<String, Agent>,
    /// Names per cell, in insertion order; empty buckets are dropped
    by_position: HashMap<Position, Vec<String>>,
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Agent> {
        self.by_name.get(name)
    }

    /// Mutable access for cosmetic changes; positions stay engine-owned.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Agent> {
        self.by_name.get_mut(name)
    }

    /// Agents at `position` in the order they arrived there.
    pub fn at(&self, position: Position) -> Vec<&Agent> {
        self.by_position
            .get(&position)
            .map(|names| names.iter().filter_map(|name| self.by_name.get(name)).collect())
            .unwrap_or_default()
    }

    pub fn is_vacant(&self, position: Position) -> bool {
        !self.by_position.contains_key(&position)
    }

    /// Snapshot of all names in ascending order.
    pub fn names(&self) -> Vec<String> {
        self.by_name.keys().cloned().collect()
    }

    /// All agents in ascending name order.
    pub fn iter(&self) -> impl Iterator<Item = &Agent> {
        self.by_name.values()
    }

    /// Adds an agent to both indices. Hands the agent back if the name is taken.
    pub fn insert(&mut self, agent: Agent) -> Result<(), Agent> {
        if self.by_name.contains_key(agent.name()) {
            return Err(agent);
        }
        let name = agent.name().to_string();
        self.by_position
            .entry(agent.position())
            .or_default()
            .push(name.clone());
        self.by_name.insert(name, agent);
        Ok(())
    }

    /// Removes an agent from both indices.
    pub fn remove(&mut self, name: &str) -> Option<Agent> {
        let agent = self.by_name.remove(name)?;
        self.detach(name, agent.position());
        Some(agent)
    }

    /// Moves an agent between buckets and updates its stored position.
    /// Returns false, touching nothing, if the agent is unknown.
    pub fn relocate(&mut self, name: &str, position: Position) -> bool {
        let Some(agent) = self.by_name.get_mut(name) else {
            return false;
        };
        let old = agent.position();
        agent.set_position(position);
        self.detach(name, old);
        self.by_position
            .entry(position)
            .or_default()
            .push(name.to_string());
        true
    }

    fn detach(&mut self, name: &str, position: Position) {
        if let Some(bucket) = self.by_position.get_mut(&position) {
            bucket.retain(|n| n != name);
            if bucket.is_empty() {
                self.by_position.remove(&position);
            }
        }
    }

    /// True when every agent sits in exactly the bucket for its position
    /// and every bucket entry names a live agent at that position.
    pub fn is_consistent(&self) -> bool {
        let bucketed: usize = self.by_position.values().map(Vec::len).sum();
        if bucketed != self.by_name.len() {
            return false;
        }
        self.by_position.iter().all(|(position, names)| {
            !names.is_empty()
                && names.iter().all(|name| {
                    self.by_name
                        .get(name)
                        .is_some_and(|agent| agent.position() == *position)
                })
        }) && self.by_name.values().all(|agent| {
            self.by_position
                .get(&agent.position())
                .is_some_and(|names| names.iter().filter(|n| *n == agent.name()).count() == 1)
        })
    }
}
