use graph_core::{ParseNode, PrimitiveKind, Result, StoreValue};

/// Reads a string array, dropping `null` elements.
pub(crate) fn strings(node: &dyn ParseNode) -> Result<Option<Vec<String>>> {
    Ok(node
        .get_collection_of_primitive_values(PrimitiveKind::String)?
        .map(|values| {
            values
                .into_iter()
                .filter_map(|v| match v {
                    StoreValue::String(s) => Some(s),
                    _ => None,
                })
                .collect()
        }))
}

/// Reads an enum member by wire name.
pub(crate) fn enumeration<E>(node: &dyn ParseNode) -> Result<Option<E>>
where
    E: for<'s> From<&'s str>,
{
    Ok(node.get_enum_value()?.as_deref().map(E::from))
}
