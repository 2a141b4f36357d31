use crate::domain::task::ListItem;

/// Items shown in one list view together with the selected row.
#[derive(Clone, Debug)]
pub struct SelectableList<T> {
    items: Vec<T>,
    selected: Option<usize>,
}

impl<T> Default for SelectableList<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            selected: None,
        }
    }
}

impl<T: ListItem> SelectableList<T> {
    /// Returns every item in display order.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns the selected row index, if any.
    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    /// Returns the selected item, if any.
    pub fn selected(&self) -> Option<&T> {
        self.selected.and_then(|index| self.items.get(index))
    }

    /// Replaces the items, keeping the current selection on the same item
    /// when it is still present.
    pub fn replace(&mut self, items: Vec<T>) {
        let focus_id = self.selected().map(ListItem::item_id);
        self.replace_focusing(items, focus_id);
    }

    /// Replaces the items and selects `focus_id` when present, falling back to
    /// the previous row position.
    pub fn replace_focusing(&mut self, items: Vec<T>, focus_id: Option<i64>) {
        let previous_index = self.selected;
        self.items = items;

        if let Some(focus_id) = focus_id
            && self.select_id(focus_id)
        {
            return;
        }

        self.selected = if self.items.is_empty() {
            None
        } else {
            Some(previous_index.unwrap_or(0).min(self.items.len() - 1))
        };
    }

    /// Inserts `item` at the top and selects it.
    pub fn prepend(&mut self, item: T) {
        self.items.insert(0, item);
        self.selected = Some(0);
    }

    /// Selects the item with `id`. Returns whether it was found.
    pub fn select_id(&mut self, id: i64) -> bool {
        match self.items.iter().position(|item| item.item_id() == id) {
            Some(index) => {
                self.selected = Some(index);

                true
            }
            None => false,
        }
    }

    /// Moves the selection one row down, stopping at the last row.
    pub fn select_next(&mut self) {
        if self.items.is_empty() {
            return;
        }

        self.selected = Some(match self.selected {
            Some(index) => (index + 1).min(self.items.len() - 1),
            None => 0,
        });
    }

    /// Moves the selection one row up, stopping at the first row.
    pub fn select_previous(&mut self) {
        if self.items.is_empty() {
            return;
        }

        self.selected = Some(self.selected.map_or(0, |index| index.saturating_sub(1)));
    }

    pub fn select_first(&mut self) {
        if !self.items.is_empty() {
            self.selected = Some(0);
        }
    }

    /// Replaces the item sharing `item`'s identity. Returns whether one was
    /// found.
    pub fn update_item(&mut self, item: T) -> bool {
        let id = item.item_id();
        match self.items.iter_mut().find(|existing| existing.item_id() == id) {
            Some(existing) => {
                *existing = item;

                true
            }
            None => false,
        }
    }

    /// Applies `change` to the item with `id`. Returns whether one was found.
    pub fn update_by_id(&mut self, id: i64, change: impl FnOnce(&mut T)) -> bool {
        match self.items.iter_mut().find(|item| item.item_id() == id) {
            Some(item) => {
                change(item);

                true
            }
            None => false,
        }
    }
}
