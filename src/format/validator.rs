use super::parser::tag_names;
use super::tags::Tag;
use crate::errors::StructuralError;

/// Check a raw format: blocks balanced and one level deep, every tag known.
/// Does not look at any song.
pub fn validate(format: &str) -> Result<(), StructuralError> {
    let mut in_block = false;
    for (pos, c) in format.char_indices() {
        match (c, in_block) {
            ('{', false) => in_block = true,
            ('{', true) => return Err(StructuralError::NestedBlock { pos }),
            ('}', true) => in_block = false,
            ('}', false) => return Err(StructuralError::UnmatchedClose { pos }),
            _ => {}
        }
    }
    if in_block {
        return Err(StructuralError::UnclosedBlock);
    }

    for (pos, name) in tag_names(format) {
        if Tag::from_name(name).is_none() {
            return Err(StructuralError::UnknownTag { name: name.to_string(), pos });
        }
    }
    Ok(())
}
