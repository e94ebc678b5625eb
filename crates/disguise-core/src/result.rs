use crate::error::DisguiseError;

pub type Result<T> = std::result::Result<T, DisguiseError>;
