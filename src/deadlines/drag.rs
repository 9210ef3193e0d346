use super::list::DeadlineRow;

/// Vertical extent of a rendered row, in the same units as the pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeBox {
    pub top: f64,
    pub height: f64,
}

impl NodeBox {
    pub fn center(&self) -> f64 {
        self.top + self.height / 2.0
    }
}

/// Picks the row the dragged one should be inserted before: the first row,
/// by nearest center, that the pointer has not yet passed. `None` means the
/// pointer is below every row in `nodes`.
pub fn insertion_target(nodes: &[(i64, NodeBox)], pointer_y: f64, dragged: i64) -> Option<i64> {
    nodes
        .iter()
        .filter(|(id, _)| *id != dragged)
        .map(|(id, b)| (*id, pointer_y - b.center()))
        .filter(|(_, offset)| *offset < 0.0)
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(id, _)| id)
}

/// Pointer-driven reordering of visible rows. Only one row is dragged at a
/// time, and the new order lives only in the row list passed in.
#[derive(Debug, Clone, Default)]
pub struct DragReorder {
    dragging: Option<i64>,
}

impl DragReorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, id: i64) {
        tracing::debug!(id, "drag start");
        self.dragging = Some(id);
    }

    pub fn dragging(&self) -> Option<i64> {
        self.dragging
    }

    pub fn is_dragging(&self, id: i64) -> bool {
        self.dragging == Some(id)
    }

    /// Moves the dragged row to the insertion point under `pointer_y`.
    /// `nodes` covers only the rows on screen; below all of them the row
    /// lands right after the last one, ahead of any rows scrolled out of
    /// view. Returns whether the order changed.
    pub fn drag_over(
        &self,
        rows: &mut Vec<DeadlineRow>,
        nodes: &[(i64, NodeBox)],
        pointer_y: f64,
    ) -> bool {
        let Some(id) = self.dragging else {
            return false;
        };
        let Some(from) = rows.iter().position(|r| r.id == id) else {
            return false;
        };

        let target = insertion_target(nodes, pointer_y, id);
        let row = rows.remove(from);
        let to = match target {
            Some(t) => rows.iter().position(|r| r.id == t),
            None => nodes
                .iter()
                .rev()
                .find(|(nid, _)| *nid != id)
                .and_then(|(last, _)| rows.iter().position(|r| r.id == *last))
                .map(|i| i + 1),
        }
        .unwrap_or(rows.len());
        rows.insert(to, row);
        to != from
    }

    pub fn end(&mut self) -> Option<i64> {
        let id = self.dragging.take();
        if let Some(id) = id {
            tracing::debug!(id, "drag end");
        }
        id
    }
}
