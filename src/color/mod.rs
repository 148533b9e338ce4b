//! Color tags carried alongside decoded images.

/// CICP tag validation.
pub mod cicp;
/// Transfer functions used to bring linear float images into the encoded working space.
pub mod transfer;
