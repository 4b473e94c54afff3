pub mod context;
pub mod doctor;
pub mod history;
pub mod onboard;
pub mod session;
pub mod status;
pub mod tools;
