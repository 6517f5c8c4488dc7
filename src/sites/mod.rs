pub mod inspectlet;

pub use inspectlet::Inspectlet;
