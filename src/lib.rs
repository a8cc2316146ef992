pub mod csv_loader;
pub mod decision_table;
pub mod engine;
pub mod finger_pose;
pub mod gesture_classifier;
pub mod stabilizer;
pub mod types;
