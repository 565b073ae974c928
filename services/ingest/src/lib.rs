pub mod fields;
pub mod sync;
pub mod typeform;
