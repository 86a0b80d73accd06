pub mod clock;
pub mod controller;
pub mod fetch;
pub mod filter;
pub mod load;
pub mod model;
pub mod output;
pub mod scale;
pub mod traffic;
