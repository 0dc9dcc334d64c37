pub mod collision;
pub mod gravity;
pub mod kinematics;
pub mod orbit;
