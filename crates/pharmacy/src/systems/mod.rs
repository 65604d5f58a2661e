macro_rules! newtype {
    ($name:ident, $inner:ty) => {
        #[derive(
            Copy,
            Clone,
            Debug,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            serde::Serialize,
            serde::Deserialize,
            Default,
        )]
        pub struct $name(pub $inner);
    };
}

pub mod atomic;
pub mod catalog;
pub mod errors;
pub mod pharmacy;
pub mod prices;
pub mod production;
pub mod profile;
pub mod workbench;

pub use errors::{CalcError, ConfigError, NotFound, ValidationError};
