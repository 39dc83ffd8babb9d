pub mod content;
pub mod event;
pub mod loading;
pub mod registry;
pub mod worker;
