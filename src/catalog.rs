use std::collections::BTreeSet;

use array_macro::array;

use crate::{
    geometry::{Position, Rotation},
    shape::{ShapeError, ShapeMatrix},
};

/// Translate `atoms` so the minimal bounding box starts at the origin.
///
/// Input order is kept, so the index of an atom survives normalization.
pub fn normalize_atoms(
    atoms: impl IntoIterator<Item = (i32, i32)>,
) -> Result<Vec<Position>, ShapeError> {
    let atoms = atoms.into_iter().collect::<Vec<_>>();
    let min_row = atoms.iter().map(|(row, _)| *row).min().ok_or(ShapeError::NoAtoms)?;
    let min_col = atoms.iter().map(|(_, col)| *col).min().ok_or(ShapeError::NoAtoms)?;
    let mut seen = BTreeSet::new();
    atoms
        .into_iter()
        .map(|(row, col)| {
            if !seen.insert((row, col)) {
                return Err(ShapeError::DuplicateAtom(row, col));
            }
            Ok(Position::new(
                row.abs_diff(min_row) as usize,
                col.abs_diff(min_col) as usize,
            ))
        })
        .collect()
}

/// The four rotations of one atom layout, indexed by [`Rotation::index`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShapeCatalog {
    shapes: [ShapeMatrix; 4],
}

impl ShapeCatalog {
    pub fn from_atoms(atoms: impl IntoIterator<Item = (i32, i32)>) -> Result<Self, ShapeError> {
        Self::rasterize(&normalize_atoms(atoms)?)
    }

    /// `atoms` must already be normalized.
    pub fn rasterize(atoms: &[Position]) -> Result<Self, ShapeError> {
        let rows = atoms.iter().map(|atom| atom.row + 1).max().ok_or(ShapeError::NoAtoms)?;
        let cols = atoms.iter().map(|atom| atom.col + 1).max().ok_or(ShapeError::NoAtoms)?;
        Ok(Self::from_base(ShapeMatrix::from_cells(
            rows,
            cols,
            atoms.iter().copied(),
        )?))
    }

    pub fn from_base(base: ShapeMatrix) -> Self {
        Self {
            shapes: array![ix => base.rotated(Rotation::from_index(ix)); 4],
        }
    }

    pub fn base(&self) -> &ShapeMatrix {
        self.shape(Rotation::R0)
    }

    pub fn shape(&self, rotation: Rotation) -> &ShapeMatrix {
        &self.shapes[rotation.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Rotation, &ShapeMatrix)> {
        Rotation::ALL.into_iter().zip(self.shapes.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape;

    #[test]
    fn normalizes_to_origin() -> anyhow::Result<()> {
        assert_eq!(
            normalize_atoms([(3, -1), (4, -1), (4, 0)])?,
            vec![
                Position::new(0, 0),
                Position::new(1, 0),
                Position::new(1, 1)
            ]
        );
        Ok(())
    }

    #[test]
    fn rejects_degenerate_layouts() {
        assert_eq!(
            normalize_atoms(Vec::<(i32, i32)>::new()),
            Err(ShapeError::NoAtoms)
        );
        assert_eq!(
            normalize_atoms([(0, 0), (0, 1), (0, 0)]),
            Err(ShapeError::DuplicateAtom(0, 0))
        );
    }

    #[test]
    fn sparse_atoms_too_far_apart() {
        assert!(matches!(
            ShapeCatalog::from_atoms([(i32::MIN, i32::MIN), (i32::MAX, i32::MAX)]),
            Err(ShapeError::TooLarge { .. })
        ));
    }

    #[test]
    fn l_rotations() -> anyhow::Result<()> {
        let catalog = ShapeCatalog::from_atoms([(0, 0), (1, 0), (2, 0), (2, 1)])?;
        assert_eq!(
            catalog.shape(Rotation::R0),
            &shape![
                [# .],
                [# .],
                [# #],
            ]
        );
        assert_eq!(
            catalog.shape(Rotation::R90),
            &shape![
                [# # #],
                [# . .],
            ]
        );
        assert_eq!(
            catalog.shape(Rotation::R180),
            &shape![
                [# #],
                [. #],
                [. #],
            ]
        );
        assert_eq!(
            catalog.shape(Rotation::R270),
            &shape![
                [. . #],
                [# # #],
            ]
        );
        Ok(())
    }

    #[test]
    fn single_atom_rotations_are_identical() -> anyhow::Result<()> {
        let catalog = ShapeCatalog::from_atoms([(7, 7)])?;
        for (_, shape) in catalog.iter() {
            assert_eq!(shape, &shape![[#]]);
        }
        Ok(())
    }

    #[test]
    fn regenerating_is_bit_identical() -> anyhow::Result<()> {
        let atoms = [(0, 1), (0, 2), (1, 0), (1, 1)];
        assert_eq!(
            ShapeCatalog::from_atoms(atoms)?,
            ShapeCatalog::from_atoms(atoms)?
        );
        // translation doesn't matter either
        assert_eq!(
            ShapeCatalog::from_atoms(atoms.map(|(row, col)| (row - 5, col + 9)))?,
            ShapeCatalog::from_atoms(atoms)?
        );
        Ok(())
    }
}
