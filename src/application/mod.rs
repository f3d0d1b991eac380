pub mod identity;
pub mod keystore;
pub mod round;
pub mod selection;
pub mod stdio;
