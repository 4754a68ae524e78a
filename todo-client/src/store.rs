use uuid::Uuid;

use todo_core::models::Todo;

/// Authoritative in-memory collection for the active session. Mutated only
/// through the coordinator, as whole-collection replacement or targeted
/// by-id rebuild.
#[derive(Debug, Default)]
pub struct ItemStore {
    items: Vec<Todo>,
}

impl ItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[Todo] {
        &self.items
    }

    pub fn snapshot(&self) -> Vec<Todo> {
        self.items.clone()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &Uuid) -> Option<&Todo> {
        self.items.iter().find(|t| t.id == *id)
    }

    /// Replace the whole collection (last fetch wins).
    pub fn replace_all(&mut self, items: Vec<Todo>) {
        self.items = items;
    }

    /// New items go to the front, matching the newest-first gateway order.
    pub fn prepend(&mut self, todo: Todo) {
        self.items.insert(0, todo);
    }

    /// Mutate the item with the given id in place; false when absent.
    pub fn apply<F>(&mut self, id: &Uuid, f: F) -> bool
    where
        F: FnOnce(&mut Todo),
    {
        match self.items.iter_mut().find(|t| t.id == *id) {
            Some(todo) => {
                f(todo);
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: &Uuid) -> bool {
        let before = self.items.len();
        self.items.retain(|t| t.id != *id);
        self.items.len() != before
    }

    pub fn retain<F>(&mut self, f: F)
    where
        F: FnMut(&Todo) -> bool,
    {
        self.items.retain(f);
    }
}
