use uuid::Uuid;

use crate::core::error::{ColonyError, ColonyResult};

/// Anything kept in a `Repository`.
pub trait Entity: Clone {
    const KIND: &'static str;

    fn entity_id(&self) -> Uuid;
}

/// Ordered in-memory collection keyed by entity id.
#[derive(Debug, Clone)]
pub struct Repository<T> {
    items: Vec<T>,
}

impl<T> Default for Repository<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Entity> Repository<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_vec(items: Vec<T>) -> Self {
        Self { items }
    }

    pub fn list(&self) -> &[T] {
        &self.items
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: Uuid) -> Option<&T> {
        self.items.iter().find(|item| item.entity_id() == id)
    }

    pub fn require(&self, id: Uuid) -> ColonyResult<&T> {
        self.get(id)
            .ok_or_else(|| ColonyError::NotFound(format!("{} {id}", T::KIND)))
    }

    /// Appends; ids must be unique.
    pub fn create(&mut self, item: T) -> ColonyResult<T> {
        self.check_unique(&item)?;
        self.items.push(item.clone());
        Ok(item)
    }

    /// Inserts at the head, for collections shown newest first.
    pub fn push_front(&mut self, item: T) -> ColonyResult<T> {
        self.check_unique(&item)?;
        self.items.insert(0, item.clone());
        Ok(item)
    }

    pub fn update<F>(&mut self, id: Uuid, apply: F) -> ColonyResult<T>
    where
        F: FnOnce(&mut T),
    {
        let item = self
            .items
            .iter_mut()
            .find(|item| item.entity_id() == id)
            .ok_or_else(|| ColonyError::NotFound(format!("{} {id}", T::KIND)))?;
        apply(item);
        Ok(item.clone())
    }

    pub fn delete(&mut self, id: Uuid) -> ColonyResult<T> {
        let index = self
            .items
            .iter()
            .position(|item| item.entity_id() == id)
            .ok_or_else(|| ColonyError::NotFound(format!("{} {id}", T::KIND)))?;
        Ok(self.items.remove(index))
    }

    fn check_unique(&self, item: &T) -> ColonyResult<()> {
        if self.get(item.entity_id()).is_some() {
            return Err(ColonyError::InvalidInput(format!(
                "{} {} already exists",
                T::KIND,
                item.entity_id()
            )));
        }
        Ok(())
    }
}
