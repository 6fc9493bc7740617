pub mod capture;
pub mod detection;
pub mod drawing;
pub mod pipeline;
pub mod shared;
