use strum_macros::{Display, EnumString};

/// Which statement produced a sink. Downstream rules pick write semantics from it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum DmlCommandType {
    #[default]
    None,
    Insert,
    Update,
    Delete,
    Load,
}
