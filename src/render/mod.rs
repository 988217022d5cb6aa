pub(crate) mod background;
pub(crate) mod chrome;
pub(crate) mod image;
pub(crate) mod mesh;
pub(crate) mod scene;
pub(crate) mod shadow;
pub(crate) mod text;
