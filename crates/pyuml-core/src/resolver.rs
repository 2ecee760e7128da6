//! Inheritance relationship resolution

use crate::model::{ClassModel, InheritanceEdge};

/// One edge per declared base, grouped by child in model order.
///
/// Parents are not checked against the model set and self-inheritance is
/// passed through unchanged.
pub fn resolve_inheritance<'a, I>(models: I) -> Vec<InheritanceEdge>
where
    I: IntoIterator<Item = &'a ClassModel>,
{
    models
        .into_iter()
        .flat_map(|model| {
            model.bases.iter().map(move |base| InheritanceEdge {
                child: model.name.clone(),
                parent: base.clone(),
            })
        })
        .collect()
}
