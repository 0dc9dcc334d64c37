pub mod guidance;
pub mod phases;
pub mod planet;
pub mod propulsion;
pub mod rocket;
