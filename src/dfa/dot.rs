//! Facilities to generate a DOT representation of a DFA.

use super::{Dfa, StateId};

impl<'a> dot::Labeller<'a, StateId, (StateId, char, StateId)> for Dfa {
    fn graph_id(&'a self) -> dot::Id<'a> {
        dot::Id::new("dfa").unwrap()
    }

    fn node_id(&'a self, n: &StateId) -> dot::Id<'a> {
        dot::Id::new(format!("q{}", n)).unwrap()
    }

    fn node_shape(&'a self, node: &StateId) -> Option<dot::LabelText<'a>> {
        if self.accepting.contains(*node) {
            return Some(dot::LabelText::LabelStr("doublecircle".into()));
        }

        None
    }

    fn node_label(&'a self, n: &StateId) -> dot::LabelText<'a> {
        if self.start == *n {
            return dot::LabelText::LabelStr(format!("{} (start)", self.node_id(n).name()).into());
        }
        dot::LabelText::LabelStr(self.node_id(n).name())
    }

    fn edge_label(&'a self, e: &(StateId, char, StateId)) -> dot::LabelText<'a> {
        dot::LabelText::LabelStr(e.1.to_string().into())
    }

    fn kind(&self) -> dot::Kind {
        dot::Kind::Digraph
    }
}

impl<'a> dot::GraphWalk<'a, StateId, (StateId, char, StateId)> for Dfa {
    fn nodes(&'a self) -> dot::Nodes<'a, StateId> {
        self.states().collect::<Vec<_>>().into()
    }

    fn edges(&'a self) -> dot::Edges<'a, (StateId, char, StateId)> {
        let mut edges: Vec<(StateId, char, StateId)> = vec![];
        for q in self.states() {
            for (a, sym) in self.alphabet.iter().enumerate() {
                edges.push((q, sym, self.step(q, a)));
            }
        }
        edges.into()
    }

    fn source(&'a self, edge: &(StateId, char, StateId)) -> StateId {
        edge.0
    }

    fn target(&'a self, edge: &(StateId, char, StateId)) -> StateId {
        edge.2
    }
}
