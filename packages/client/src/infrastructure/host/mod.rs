//! HostContainerSdk の実装

pub mod local;

pub use local::LocalHostContainer;
