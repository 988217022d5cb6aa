pub(crate) mod bitmap;
