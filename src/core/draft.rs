//! Order draft: the editable list of items behind the order form
//!
//! Owned by whoever drives the form (a session, a CLI run, a test) and passed
//! by reference. There is no process-wide store.

use crate::core::pricing;
use crate::core::validation;
use crate::types::LineItem;

/// One editable field of a line item, with its typed value
#[derive(Debug, Clone, PartialEq)]
pub enum ItemField {
    Url(String),
    Photo(Option<String>),
    Quantity(u32),
    Color(String),
    Size(String),
    Price(f64),
}

#[derive(Debug, Clone)]
pub struct OrderDraft {
    items: Vec<LineItem>,
    next_id: u64,
}

impl Default for OrderDraft {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderDraft {
    /// A draft with one blank item, like a freshly opened form
    pub fn new() -> Self {
        Self {
            items: vec![LineItem::blank("1")],
            next_id: 2,
        }
    }

    /// Resume editing a previously saved list of items.
    ///
    /// An empty list still yields one blank item.
    pub fn from_items(items: Vec<LineItem>) -> Self {
        if items.is_empty() {
            return Self::new();
        }
        let next_id = items
            .iter()
            .filter_map(|item| item.id.parse::<u64>().ok())
            .max()
            .unwrap_or(0)
            + 1;
        Self { items, next_id }
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&LineItem> {
        self.items.iter().find(|item| item.id == id)
    }

    fn fresh_id(&mut self) -> String {
        loop {
            let id = self.next_id.to_string();
            self.next_id += 1;
            if self.get(&id).is_none() {
                return id;
            }
        }
    }

    /// Append a blank item and return it
    pub fn add_item(&mut self) -> &LineItem {
        let id = self.fresh_id();
        self.items.push(LineItem::blank(id));
        &self.items[self.items.len() - 1]
    }

    /// Set one field of the item with `id`. Returns false if no such item.
    pub fn update_item(&mut self, id: &str, field: ItemField) -> bool {
        let Some(item) = self.items.iter_mut().find(|item| item.id == id) else {
            return false;
        };
        match field {
            ItemField::Url(url) => item.url = url,
            ItemField::Photo(photo) => item.photo = photo,
            ItemField::Quantity(quantity) => item.quantity = quantity,
            ItemField::Color(color) => item.color = color,
            ItemField::Size(size) => item.size = size,
            ItemField::Price(price) => item.price = price,
        }
        true
    }

    /// Remove the item with `id`. The last remaining item is never removed.
    pub fn remove_item(&mut self, id: &str) -> bool {
        if self.items.len() <= 1 {
            return false;
        }
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        self.items.len() != before
    }

    /// Append a copy of the item with `id` under a new id
    pub fn duplicate_item(&mut self, id: &str) -> Option<&LineItem> {
        let mut copy = self.get(id)?.clone();
        copy.id = self.fresh_id();
        self.items.push(copy);
        self.items.last()
    }

    /// Reset to a single blank item
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    /// Σ price × quantity over all items
    pub fn total_amount(&self) -> f64 {
        pricing::subtotal(&self.items)
    }

    pub fn valid_count(&self) -> usize {
        self.items
            .iter()
            .filter(|item| validation::is_item_valid(item))
            .count()
    }

    pub fn is_valid(&self) -> bool {
        validation::is_order_valid(&self.items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_draft_has_one_blank_item() {
        let draft = OrderDraft::new();
        assert_eq!(draft.len(), 1);
        assert_eq!(draft.items()[0].id, "1");
        assert_eq!(draft.items()[0].quantity, 1);
        assert!(!draft.is_valid());
    }

    #[test]
    fn test_add_and_update() {
        let mut draft = OrderDraft::new();
        let id = draft.add_item().id.clone();
        assert_eq!(draft.len(), 2);

        assert!(draft.update_item(&id, ItemField::Url("https://1688.com/a".into())));
        assert!(draft.update_item(&id, ItemField::Price(10.0)));
        assert!(draft.update_item(&id, ItemField::Quantity(3)));
        assert!(!draft.update_item("missing", ItemField::Price(1.0)));

        assert_eq!(draft.valid_count(), 1);
        assert!(draft.is_valid());
        assert!((draft.total_amount() - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_remove_keeps_last_item() {
        let mut draft = OrderDraft::new();
        assert!(!draft.remove_item("1"));
        assert_eq!(draft.len(), 1);

        let id = draft.add_item().id.clone();
        assert!(draft.remove_item(&id));
        assert_eq!(draft.len(), 1);
        assert!(!draft.remove_item("nope"));
    }

    #[test]
    fn test_duplicate_copies_fields_with_new_id() {
        let mut draft = OrderDraft::new();
        draft.update_item("1", ItemField::Color("red".into()));
        draft.update_item("1", ItemField::Price(5.0));

        let copy = draft.duplicate_item("1").cloned().unwrap();
        assert_ne!(copy.id, "1");
        assert_eq!(copy.color, "red");
        assert_eq!(copy.price, 5.0);
        assert_eq!(draft.len(), 2);
        assert!(draft.duplicate_item("missing").is_none());
    }

    #[test]
    fn test_clear_resets() {
        let mut draft = OrderDraft::new();
        draft.add_item();
        draft.add_item();
        draft.clear();
        assert_eq!(draft.len(), 1);
        assert_eq!(draft.items()[0].id, "1");
    }

    #[test]
    fn test_from_items_continues_ids() {
        let items = vec![LineItem::blank("4"), LineItem::blank("abc")];
        let mut draft = OrderDraft::from_items(items);
        assert_eq!(draft.add_item().id, "5");

        let empty = OrderDraft::from_items(Vec::new());
        assert_eq!(empty.len(), 1);
    }
}
