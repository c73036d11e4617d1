pub mod convert;
pub mod docx;
pub mod fingerprint;
pub mod history;
pub mod incipit;
pub mod matchers;
pub mod normalize;
pub mod restructure;
pub mod types;
