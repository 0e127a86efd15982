use crate::error::ModelError;

use ndarray::Array2;
use std::fmt::Debug;

/// A node of the interaction graph: something that carries interaction values with other nodes
/// of the same kind, addressed by their identities
pub trait MatrixItem {
    type Id: Copy + Ord + Debug;
    type Interaction: Clone;

    fn id(&self) -> Self::Id;

    /// Interaction with the node `other`, the default value if none was recorded
    fn interaction(&self, other: Self::Id) -> Self::Interaction;

    fn set_interaction(&mut self, other: Self::Id, value: Self::Interaction);
}

/// Ordered collection of interacting nodes viewed as a square matrix
///
/// The order of [Matrix::items] defines the integer indices. Element `(i, j)` is the interaction
/// `items[i]` records for `items[j]`: the effect species `j` has on the growth of species `i`.
/// Nothing is cached, every read reflects the latest assignment.
pub trait Matrix {
    type Item: MatrixItem;

    fn items(&self) -> &[Self::Item];

    fn items_mut(&mut self) -> &mut [Self::Item];

    fn len(&self) -> usize {
        self.items().len()
    }

    fn is_empty(&self) -> bool {
        self.items().is_empty()
    }

    fn get_item(&self, i: usize) -> Option<&Self::Item> {
        self.items().get(i)
    }

    /// Put `item` at position `i`
    ///
    /// Interactions other items record for the replaced one are left untouched, they keep
    /// pointing to its identity.
    fn set_item(&mut self, i: usize, item: Self::Item) -> Result<Self::Item, ModelError> {
        let len = self.len();
        let slot = self
            .items_mut()
            .get_mut(i)
            .ok_or(ModelError::IndexOutOfBounds { index: i, len })?;
        Ok(std::mem::replace(slot, item))
    }

    fn get_interaction(
        &self,
        i: usize,
        j: usize,
    ) -> Option<<Self::Item as MatrixItem>::Interaction> {
        let target = self.items().get(j)?.id();
        Some(self.items().get(i)?.interaction(target))
    }

    fn set_interaction(
        &mut self,
        i: usize,
        j: usize,
        value: impl Into<<Self::Item as MatrixItem>::Interaction>,
    ) -> Result<(), ModelError> {
        let len = self.len();
        let target = self
            .items()
            .get(j)
            .ok_or(ModelError::IndexOutOfBounds { index: j, len })?
            .id();
        self.items_mut()
            .get_mut(i)
            .ok_or(ModelError::IndexOutOfBounds { index: i, len })?
            .set_interaction(target, value.into());
        Ok(())
    }

    /// Square matrix of all interactions, the diagonal holds self-interactions
    fn interaction_matrix(&self) -> Array2<f64>
    where
        Self::Item: MatrixItem<Interaction = f64>,
    {
        let items = self.items();
        Array2::from_shape_fn((items.len(), items.len()), |(i, j)| {
            items[i].interaction(items[j].id())
        })
    }
}
