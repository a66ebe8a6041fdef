//! Shared in-memory chain fixture for the integration suite
//!
//! `MockChain` keeps a real doubly linked bag structure behind a mutex and
//! implements both collaborator traits: the provider side serves snapshots
//! of it, and the sink side genuinely mutates it the way the on-chain
//! executor would (rebag appends at the canonical bag's tail, a move
//! splices the heavier entry immediately ahead of the lighter one).

use async_trait::async_trait;
use bagtender::{
    BagSnapshot, BatchOutcome, EntryId, Error, InstructionSink, ListNode, ListProvider, MoveAhead,
    Rebag, Result, Weight,
};
use rustc_hash::FxHashMap;
use std::collections::BTreeMap;
use std::sync::Mutex;

pub struct MockChain {
    state: Mutex<ChainState>,
}

struct ChainState {
    thresholds: Vec<Weight>,
    nodes: FxHashMap<EntryId, ListNode>,
    bags: BTreeMap<Weight, Ends>,
    true_weights: FxHashMap<EntryId, Weight>,
}

#[derive(Clone)]
struct Ends {
    head: EntryId,
    tail: EntryId,
}

impl MockChain {
    pub fn new(thresholds: Vec<Weight>) -> Self {
        Self {
            state: Mutex::new(ChainState {
                thresholds,
                nodes: FxHashMap::default(),
                bags: BTreeMap::new(),
                true_weights: FxHashMap::default(),
            }),
        }
    }

    /// Append an entry at the tail of a bag, with separate cached and true
    /// weights to model drift.
    pub fn push_entry(&self, ceiling: Weight, id: &str, cached: Weight, actual: Weight) -> &Self {
        let id = EntryId::from(id);
        let mut state = self.state.lock().unwrap();
        state.nodes.insert(
            id.clone(),
            ListNode {
                id: id.clone(),
                prev: None,
                next: None,
                bag_ceiling: ceiling,
                cached_weight: cached,
            },
        );
        state.true_weights.insert(id.clone(), actual);
        state.append(&id, ceiling);
        self
    }

    /// Current walk order of a bag, by entry id
    pub fn order_of(&self, ceiling: Weight) -> Vec<String> {
        let state = self.state.lock().unwrap();
        let Some(ends) = state.bags.get(&ceiling) else {
            return Vec::new();
        };
        let mut order = Vec::new();
        let mut current = Some(ends.head.clone());
        while let Some(id) = current {
            order.push(id.as_str().to_string());
            current = state.nodes[&id].next.clone();
        }
        order
    }

    /// The recorded bag ceiling of an entry
    pub fn ceiling_of(&self, id: &str) -> Weight {
        let state = self.state.lock().unwrap();
        state.nodes[&EntryId::from(id)].bag_ceiling
    }

    /// Corrupt one node's forward link
    pub fn set_next(&self, id: &str, next: Option<&str>) {
        let mut state = self.state.lock().unwrap();
        state
            .nodes
            .get_mut(&EntryId::from(id))
            .unwrap()
            .next = next.map(EntryId::from);
    }
}

impl ChainState {
    fn canonical_ceiling(&self, weight: Weight) -> Weight {
        self.thresholds
            .iter()
            .copied()
            .find(|t| *t > weight)
            .expect("fixture weight above top threshold")
    }

    fn append(&mut self, id: &EntryId, ceiling: Weight) {
        self.nodes.get_mut(id).unwrap().bag_ceiling = ceiling;
        match self.bags.get_mut(&ceiling) {
            Some(ends) => {
                let old_tail = ends.tail.clone();
                self.nodes.get_mut(&old_tail).unwrap().next = Some(id.clone());
                self.nodes.get_mut(id).unwrap().prev = Some(old_tail);
                ends.tail = id.clone();
            }
            None => {
                self.bags.insert(
                    ceiling,
                    Ends {
                        head: id.clone(),
                        tail: id.clone(),
                    },
                );
            }
        }
    }

    fn unlink(&mut self, id: &EntryId) {
        let node = self.nodes[id].clone();
        if let Some(prev) = &node.prev {
            self.nodes.get_mut(prev).unwrap().next = node.next.clone();
        }
        if let Some(next) = &node.next {
            self.nodes.get_mut(next).unwrap().prev = node.prev.clone();
        }

        let ends = self.bags[&node.bag_ceiling].clone();
        let is_head = ends.head == *id;
        let is_tail = ends.tail == *id;
        match (is_head, is_tail) {
            (true, true) => {
                self.bags.remove(&node.bag_ceiling);
            }
            (true, false) => {
                self.bags.get_mut(&node.bag_ceiling).unwrap().head = node.next.clone().unwrap();
            }
            (false, true) => {
                self.bags.get_mut(&node.bag_ceiling).unwrap().tail = node.prev.clone().unwrap();
            }
            (false, false) => {}
        }

        let node = self.nodes.get_mut(id).unwrap();
        node.prev = None;
        node.next = None;
    }

    fn insert_before(&mut self, id: &EntryId, before: &EntryId) {
        let target = self.nodes[before].clone();
        let ceiling = target.bag_ceiling;

        let moved = self.nodes.get_mut(id).unwrap();
        moved.prev = target.prev.clone();
        moved.next = Some(before.clone());
        moved.bag_ceiling = ceiling;

        self.nodes.get_mut(before).unwrap().prev = Some(id.clone());
        match target.prev {
            Some(prev) => self.nodes.get_mut(&prev).unwrap().next = Some(id.clone()),
            None => self.bags.get_mut(&ceiling).unwrap().head = id.clone(),
        }
    }
}

#[async_trait]
impl ListProvider for MockChain {
    async fn bags(&self) -> Result<Vec<BagSnapshot>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .bags
            .iter()
            .map(|(ceiling, ends)| BagSnapshot {
                ceiling: *ceiling,
                head: Some(ends.head.clone()),
                tail: Some(ends.tail.clone()),
            })
            .collect())
    }

    async fn thresholds(&self) -> Result<Vec<Weight>> {
        Ok(self.state.lock().unwrap().thresholds.clone())
    }

    async fn node(&self, id: &EntryId) -> Result<Option<ListNode>> {
        Ok(self.state.lock().unwrap().nodes.get(id).cloned())
    }

    async fn current_weight(&self, id: &EntryId) -> Result<Weight> {
        self.state
            .lock()
            .unwrap()
            .true_weights
            .get(id)
            .copied()
            .ok_or_else(|| Error::Provider(format!("no ledger record for {id}")))
    }
}

#[async_trait]
impl InstructionSink for MockChain {
    async fn submit_rebags(&self, batch: &[Rebag]) -> Result<BatchOutcome> {
        let mut state = self.state.lock().unwrap();
        for rebag in batch {
            let actual = state.true_weights[&rebag.entry];
            let canonical = state.canonical_ceiling(actual);
            state.unlink(&rebag.entry);
            state.append(&rebag.entry, canonical);
            // The executor refreshes the recorded weight as part of a rebag.
            state.nodes.get_mut(&rebag.entry).unwrap().cached_weight = actual;
        }
        Ok(BatchOutcome::Completed)
    }

    async fn submit_moves(&self, batch: &[MoveAhead]) -> Result<BatchOutcome> {
        let mut state = self.state.lock().unwrap();
        for mv in batch {
            state.unlink(&mv.heavier);
            state.insert_before(&mv.heavier, &mv.lighter);
        }
        Ok(BatchOutcome::Completed)
    }
}
