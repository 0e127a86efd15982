use crate::error::ModelError;
use crate::observable::CompoundObservable;
use crate::species::Species;

use std::collections::BTreeSet;

/// Abundance of each species bound to the observables of that species
#[derive(Clone, Debug)]
pub struct SpeciesObservables<'a> {
    abundances: Vec<f64>,
    species: &'a [Species],
}

impl<'a> SpeciesObservables<'a> {
    /// Fails if the number of abundances differs from the number of species
    pub fn new(
        abundances: impl Into<Vec<f64>>,
        species: &'a [Species],
    ) -> Result<Self, ModelError> {
        let abundances = abundances.into();
        ModelError::check_lengths("abundances and species", abundances.len(), species.len())?;
        Ok(Self {
            abundances,
            species,
        })
    }

    pub fn abundances(&self) -> &[f64] {
        &self.abundances
    }

    /// Names of observables defined by any of the species
    pub fn observable_names(&self) -> BTreeSet<&'a str> {
        self.species
            .iter()
            .flat_map(|species| species.observables.keys().map(String::as_str))
            .collect()
    }

    /// Compound of the `name` observables of all species weighted by their abundances
    ///
    /// Every species must define `name`.
    pub fn get(&self, name: &str) -> Result<CompoundObservable, ModelError> {
        let observables = self
            .species
            .iter()
            .map(|species| {
                species
                    .observables
                    .get(name)
                    .copied()
                    .ok_or_else(|| ModelError::MissingObservable(name.to_owned()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        CompoundObservable::new(self.abundances.clone(), observables)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::observable::{Observable, ObservableTrait};
    use std::collections::BTreeMap;

    fn species_pair() -> (Vec<Species>, [Observable; 4]) {
        let (a_0, a_1) = (Observable::new(3.0, 2.0), Observable::new(15.0, 4.0));
        let (b_0, b_1) = (Observable::new(13.0, 2.0), Observable::new(7.0, 1.0));
        let species = vec![
            Species::with_observables(
                1.0,
                BTreeMap::from([("a".to_owned(), a_0), ("b".to_owned(), b_0)]),
            ),
            Species::with_observables(
                1.0,
                BTreeMap::from([("a".to_owned(), a_1), ("b".to_owned(), b_1)]),
            ),
        ];
        (species, [a_0, a_1, b_0, b_1])
    }

    #[test]
    fn compound_by_name() {
        let (species, [a_0, a_1, _, _]) = species_pair();
        let species_observables = SpeciesObservables::new([1.0, 1.0], &species).unwrap();
        assert_eq!(
            species_observables.observable_names(),
            BTreeSet::from(["a", "b"])
        );

        let compound = species_observables.get("a").unwrap();
        assert_eq!(
            compound.pdf(0.0, 20.0, 400),
            a_0.pdf(0.0, 20.0, 400) + a_1.pdf(0.0, 20.0, 400)
        );
    }

    #[test]
    fn missing_name_is_an_error() {
        let (mut species, _) = species_pair();
        species[1].observables.remove("b");
        let species_observables = SpeciesObservables::new([1.0, 1.0], &species).unwrap();
        assert_eq!(
            species_observables.observable_names(),
            BTreeSet::from(["a", "b"])
        );
        assert_eq!(
            species_observables.get("b"),
            Err(ModelError::MissingObservable("b".to_owned()))
        );
        assert_eq!(
            species_observables.get("c"),
            Err(ModelError::MissingObservable("c".to_owned()))
        );
    }

    #[test]
    fn length_mismatch() {
        let (species, _) = species_pair();
        for abundances in [vec![], vec![1.0], vec![1.0, 1.0, 1.0]] {
            let n = abundances.len();
            assert_eq!(
                SpeciesObservables::new(abundances, &species).unwrap_err(),
                ModelError::LengthMismatch {
                    what: "abundances and species",
                    first: n,
                    second: 2,
                }
            );
        }
        assert!(SpeciesObservables::new([1.0], &[]).is_err());
    }
}
