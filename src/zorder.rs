//! Stacking order shared by every floating window of a service.
//!
//! A single counter only ever grows, so whichever window was raised last
//! renders above the rest. Before the counter would pass its ceiling, every
//! shell collapses to the baseline and counting starts over.

use crate::constants::CLASS_WINDOW;
use crate::dom::{Document, NodeId};
use crate::error::DomError;

#[derive(Debug, Clone)]
pub struct ZOrder {
    counter: i64,
    baseline: i64,
    ceiling: i64,
}

impl ZOrder {
    pub fn new(baseline: i64, ceiling: i64) -> Self {
        Self {
            counter: baseline,
            baseline,
            ceiling: ceiling.max(baseline.saturating_add(1)),
        }
    }

    /// Last stacking value handed out.
    pub fn current(&self) -> i64 {
        self.counter
    }

    pub fn baseline(&self) -> i64 {
        self.baseline
    }

    /// Give `shell` a stacking value above every value assigned before.
    pub fn bring_to_front(&mut self, doc: &mut Document, shell: NodeId) -> Result<i64, DomError> {
        if self.counter.saturating_add(1) > self.ceiling {
            self.reset(doc)?;
        }
        self.counter += 1;
        doc.set_style(shell, "z-index", self.counter.to_string())?;
        tracing::trace!(shell = ?shell, z_index = self.counter, "raised window");
        Ok(self.counter)
    }

    fn reset(&mut self, doc: &mut Document) -> Result<(), DomError> {
        let shells = doc.get_elements_by_class_name(CLASS_WINDOW);
        tracing::debug!(
            windows = shells.len(),
            baseline = self.baseline,
            "z-order counter reached ceiling; normalizing"
        );
        for shell in shells {
            doc.set_style(shell, "z-index", self.baseline.to_string())?;
        }
        self.counter = self.baseline;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{Z_INDEX_BASELINE, Z_INDEX_CEILING};

    fn shells(doc: &mut Document, n: usize) -> Vec<NodeId> {
        (0..n)
            .map(|_| {
                let shell = doc.create_element("div");
                doc.set_class_name(shell, CLASS_WINDOW).unwrap();
                doc.append_child(doc.body(), shell).unwrap();
                shell
            })
            .collect()
    }

    #[test]
    fn last_raised_is_highest() {
        let mut doc = Document::new();
        let ws = shells(&mut doc, 3);
        let mut z = ZOrder::new(Z_INDEX_BASELINE, Z_INDEX_CEILING);
        for &w in [ws[0], ws[1], ws[2], ws[0], ws[2], ws[1]].iter() {
            z.bring_to_front(&mut doc, w).unwrap();
            let top = doc.z_index(w);
            assert!(ws.iter().all(|&other| doc.z_index(other) <= top));
        }
        assert_eq!(z.current(), Z_INDEX_BASELINE + 6);
    }

    #[test]
    fn reset_normalizes_before_raising() {
        let mut doc = Document::new();
        let ws = shells(&mut doc, 3);
        let mut z = ZOrder::new(10, 13);
        for &w in &ws {
            z.bring_to_front(&mut doc, w).unwrap();
        }
        assert_eq!(z.current(), 13);

        let raised = z.bring_to_front(&mut doc, ws[1]).unwrap();
        assert_eq!(raised, 11);
        assert_eq!(doc.z_index(ws[0]), 10);
        assert_eq!(doc.z_index(ws[2]), 10);
        assert_eq!(doc.z_index(ws[1]), 11);
    }

    #[test]
    fn detached_shells_are_not_normalized() {
        let mut doc = Document::new();
        let ws = shells(&mut doc, 2);
        let mut z = ZOrder::new(0, 2);
        z.bring_to_front(&mut doc, ws[0]).unwrap();
        z.bring_to_front(&mut doc, ws[1]).unwrap();
        doc.remove(ws[0]).unwrap();
        z.bring_to_front(&mut doc, ws[1]).unwrap();
        assert_eq!(doc.z_index(ws[0]), 1);
        assert_eq!(doc.z_index(ws[1]), 1);
    }
}
