use crate::handles::Handle;

/// GPU vertex buffer owned by a resource backend.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BufferId(pub Handle);

/// GPU texture owned by a resource backend.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(pub Handle);
